// Admin authentication
// Verifies Shopify session tokens sent by the embedded admin

pub mod error;
pub mod middleware;
pub mod token;

pub use error::AuthError;
pub use token::{SessionClaims, SessionTokenVerifier, ShopSession};
