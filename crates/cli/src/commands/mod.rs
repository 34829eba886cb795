//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod sync;

use secrecy::SecretString;

/// Read the storefront database URL, with the generic `DATABASE_URL`
/// fallback the server uses.
pub(crate) fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "STOREFRONT_DATABASE_URL not set".into())
}
