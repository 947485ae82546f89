// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session tokens.
//!
//! Tokens are HMAC-signed JWTs carrying only the username, issue and expiry
//! times, the issuer and a unique id. Nothing about a token is stored at
//! issue time.

mod claims;
mod jwt;

use thiserror::Error;

use crate::error::AuthError;

pub use claims::Claims;
pub use jsonwebtoken::Algorithm;
pub use jwt::{TokenConfig, TokenManager, RECOMMENDED_SECRET_LEN};

/// Why a presented token was rejected by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Tampered, malformed, wrong key or wrong issuer.
    #[error("bad token signature")]
    BadSignature,
    /// Intact signature, past expiry.
    #[error("token expired")]
    Expired,
}

impl From<VerifyError> for AuthError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::BadSignature => AuthError::TokenInvalid,
            VerifyError::Expired => AuthError::TokenExpired,
        }
    }
}
