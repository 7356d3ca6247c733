// Shopify session token verification
//
// The embedded admin sends an HS256 JWT signed with the app's API secret on
// every request. `aud` is the app's API key and `dest` is the shop URL.

use std::sync::OnceLock;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Shop admin URL, e.g. `https://example.myshopify.com/admin`
    pub iss: String,
    /// Shop URL, e.g. `https://example.myshopify.com`
    pub dest: String,
    pub aud: String,
    /// Staff user id
    pub sub: Option<String>,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub jti: Option<String>,
    pub sid: Option<String>,
}

/// Verified admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSession {
    /// Shop domain, e.g. `example.myshopify.com`
    pub shop: String,
    pub user_id: Option<String>,
}

pub struct SessionTokenVerifier {
    api_key: String,
    decoding_key: DecodingKey,
    leeway_secs: u64,
}

impl SessionTokenVerifier {
    pub fn new(api_key: impl Into<String>, api_secret: &str) -> Self {
        Self {
            api_key: api_key.into(),
            decoding_key: DecodingKey::from_secret(api_secret.as_bytes()),
            leeway_secs: 5,
        }
    }

    pub fn verify(&self, token: &str) -> Result<ShopSession, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.api_key.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "aud", "iss"]);
        validation.validate_nbf = true;
        validation.leeway = self.leeway_secs;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;

        let shop = shop_from_dest(&claims.dest)?;
        let issuer_shop = claims
            .iss
            .strip_prefix("https://")
            .and_then(|iss| iss.strip_suffix("/admin"))
            .map(str::to_lowercase);
        if issuer_shop.as_deref() != Some(shop.as_str()) {
            return Err(AuthError::InvalidShop(claims.iss));
        }

        Ok(ShopSession {
            shop,
            user_id: claims.sub,
        })
    }
}

fn shop_domain_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-]*\.myshopify\.com$").ok())
        .as_ref()
}

/// Extract the shop domain from `dest` (`https://<shop>.myshopify.com`).
fn shop_from_dest(dest: &str) -> Result<String, AuthError> {
    let domain = dest
        .strip_prefix("https://")
        .ok_or_else(|| AuthError::InvalidShop(dest.to_string()))?;
    if shop_domain_pattern().is_some_and(|pattern| pattern.is_match(domain)) {
        Ok(domain.to_lowercase())
    } else {
        Err(AuthError::InvalidShop(dest.to_string()))
    }
}
