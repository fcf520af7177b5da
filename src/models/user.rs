//! Authenticated identity types
//!
//! The identity provider itself is external; this server only verifies the
//! bearer token it issued and reads the claims. There is no ambient
//! "current user" — every state-changing operation receives the claims
//! explicitly.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Role claim carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Supervisor,
    Secretary,
    Client,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Client)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Admin => "Admin",
            Role::Supervisor => "Supervisor",
            Role::Secretary => "Secretary",
            Role::Client => "Client",
        };
        write!(f, "{}", label)
    }
}

/// Claims decoded from the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Stable user id from the identity provider
    pub sub: String,
    /// Display name, used as the reservation agent field
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Reservation status changes, inspections and staff bookings
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Staff role required for this operation".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "uid-1".to_string(),
            name: "Test User".to_string(),
            role,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let c = claims(Role::Secretary);
        let token = c.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "uid-1");
        assert_eq!(decoded.role, Role::Secretary);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = claims(Role::Admin).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn clients_are_not_staff() {
        assert!(claims(Role::Client).require_staff().is_err());
        assert!(claims(Role::Supervisor).require_staff().is_ok());
    }
}
