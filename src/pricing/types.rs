// Enums stored on pricing rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// How a rule's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// `value` is a percentage off the original price
    Percentage,
    /// `value` is an absolute target price
    FixedPrice,
    /// `value` is an absolute amount off the original price
    FixedDiscount,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Percentage => "percentage",
            RuleType::FixedPrice => "fixed_price",
            RuleType::FixedDiscount => "fixed_discount",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(RuleType::Percentage),
            "fixed_price" => Ok(RuleType::FixedPrice),
            "fixed_discount" => Ok(RuleType::FixedDiscount),
            _ => Err(format!("Invalid rule type: {}", s)),
        }
    }
}

/// Catalog scope of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    All,
    Products,
    Collections,
}

impl Default for AppliesTo {
    fn default() -> Self {
        AppliesTo::All
    }
}

impl AppliesTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppliesTo::All => "all",
            AppliesTo::Products => "products",
            AppliesTo::Collections => "collections",
        }
    }
}

impl fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppliesTo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AppliesTo::All),
            "products" => Ok(AppliesTo::Products),
            "collections" => Ok(AppliesTo::Collections),
            _ => Err(format!("Invalid rule scope: {}", s)),
        }
    }
}
