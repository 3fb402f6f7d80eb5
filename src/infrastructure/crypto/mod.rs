//! Cryptographic primitives: tokens, password hashes and one-time codes

pub mod jwt;
pub mod password;
pub mod totp;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
