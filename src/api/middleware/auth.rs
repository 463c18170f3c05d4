//! JWT authentication extractor.
//!
//! `AuthUser` validates the bearer token and exposes the caller's identity
//! to handlers. Extracting `AuthUser` makes a route require authentication;
//! `Option<AuthUser>` admits guests while still rejecting invalid tokens.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::UserRole;
use crate::services::Requester;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// The authenticated caller, extracted from a validated access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID from JWT claims
    pub user_id: i32,
    /// User email from JWT claims
    pub email: String,
    /// Role from JWT claims
    pub role: UserRole,
}

impl AuthUser {
    pub fn requester(&self) -> Requester {
        Requester {
            user_id: self.user_id,
            role: self.role,
        }
    }

    /// Fails with Forbidden unless the user is a barber or admin.
    pub fn require_staff(&self) -> AppResult<()> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::forbidden("Barber or admin role required"))
        }
    }

    /// Fails with Forbidden unless the user is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin role required"))
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        })
    }
}

fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}

/// Extracting `AuthUser` requires a valid bearer token.
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token validation fails
/// - Token has expired
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let token = bearer_token(parts)?;
        let claims = validate_access_token(token, &state.jwt_config.secret)?;
        AuthUser::try_from(claims)
    }
}

/// `Option<AuthUser>` admits requests without an Authorization header.
///
/// A header that is present but invalid is still rejected with 401, so a
/// customer with an expired token notices instead of silently booking as a
/// guest.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Option<Self>> {
        if parts.headers.get(header::AUTHORIZATION).is_none() {
            return Ok(None);
        }

        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenType;

    fn claims(sub: &str, role: UserRole) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "test@example.com".to_string(),
            role,
            token_type: TokenType::Access,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let auth_user = AuthUser::try_from(claims("123", UserRole::Barber)).unwrap();
        assert_eq!(auth_user.user_id, 123);
        assert_eq!(auth_user.email, "test@example.com");
        assert_eq!(auth_user.role, UserRole::Barber);
    }

    #[test]
    fn test_auth_user_from_claims_invalid_id() {
        let result = AuthUser::try_from(claims("not-a-number", UserRole::Customer));
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_role_gates() {
        let customer = AuthUser::try_from(claims("1", UserRole::Customer)).unwrap();
        let barber = AuthUser::try_from(claims("2", UserRole::Barber)).unwrap();
        let admin = AuthUser::try_from(claims("3", UserRole::Admin)).unwrap();

        assert!(customer.require_staff().is_err());
        assert!(barber.require_staff().is_ok());
        assert!(admin.require_staff().is_ok());

        assert!(barber.require_admin().is_err());
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let request = axum::http::Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");

        let request = axum::http::Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
            .body(())
            .unwrap();
        let (parts, _) = request.into_parts();
        assert!(matches!(
            bearer_token(&parts),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
