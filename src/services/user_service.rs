//! Account service: registration, authentication, and profile management.

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserRole};
use crate::repositories::UserRepository;
use crate::utils::jwt;
use crate::utils::password::{hash_password, verify_password};

/// Access and refresh tokens issued to a user.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repo: UserRepository, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    /// Registers a new account and signs it in: the password is hashed before
    /// it touches the database and a token pair is issued for the created
    /// user. Duplicate email or username surfaces as `Duplicate` via the
    /// unique constraints.
    pub async fn register(
        &self,
        username: String,
        email: String,
        plain_password: &str,
        phone: Option<String>,
        role: UserRole,
    ) -> AppResult<(User, TokenPair)> {
        let hashed = hash_password(plain_password)?;

        let user = self
            .repo
            .create(NewUser {
                username,
                email,
                password: hashed,
                role,
                phone,
            })
            .await?;

        let tokens = issue_tokens(&user, &self.jwt_config)?;
        Ok((user, tokens))
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// A missing account and a wrong password produce the same error so the
    /// response does not reveal which emails are registered.
    pub async fn authenticate(
        &self,
        email: &str,
        plain_password: &str,
    ) -> AppResult<(User, TokenPair)> {
        let invalid = || AppError::Unauthorized {
            message: "Invalid email or password".to_string(),
        };

        let user = self.repo.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(plain_password, &user.password)? {
            return Err(invalid());
        }

        let tokens = issue_tokens(&user, &self.jwt_config)?;
        Ok((user, tokens))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The user is reloaded so a role change since issue time is reflected in
    /// the new tokens.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(User, TokenPair)> {
        let claims = jwt::validate_refresh_token(refresh_token, &self.jwt_config.secret)?;
        let user_id = claims.user_id()?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Account no longer exists".to_string(),
            })?;

        let tokens = issue_tokens(&user, &self.jwt_config)?;
        Ok((user, tokens))
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    /// Updates profile fields. A new password is hashed here so the repository
    /// only ever sees hashes.
    pub async fn update_profile(&self, id: i32, mut update_data: UpdateUser) -> AppResult<User> {
        self.get_user(id).await?;

        if let Some(ref plain) = update_data.password {
            update_data.password = Some(hash_password(plain)?);
        }

        self.repo.update(id, update_data).await
    }

    /// Changes an account's role. The handler layer restricts this to admins.
    pub async fn set_role(&self, id: i32, role: UserRole) -> AppResult<User> {
        self.get_user(id).await?;
        self.repo.set_role(id, role).await
    }
}

fn issue_tokens(user: &User, jwt_config: &JwtConfig) -> AppResult<TokenPair> {
    let (access_token, refresh_token) = jwt::generate_token_pair(
        user.id,
        user.email.clone(),
        user.role,
        &jwt_config.secret,
        jwt_config.access_token_expiration,
        jwt_config.refresh_token_expiration,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(role: UserRole) -> User {
        let now = Utc::now().naive_utc();
        User {
            id: 42,
            username: "tony".to_string(),
            email: "tony@example.com".to_string(),
            password: "$argon2id$placeholder".to_string(),
            role,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_account_tokens".to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        }
    }

    #[test]
    fn issued_pair_carries_the_account_identity() {
        let config = config();
        let pair = issue_tokens(&account(UserRole::Customer), &config).unwrap();

        let access = jwt::validate_access_token(&pair.access_token, &config.secret).unwrap();
        assert_eq!(access.user_id().unwrap(), 42);
        assert_eq!(access.email, "tony@example.com");
        assert_eq!(access.role, UserRole::Customer);

        let refresh = jwt::validate_refresh_token(&pair.refresh_token, &config.secret).unwrap();
        assert_eq!(refresh.user_id().unwrap(), 42);
        assert_eq!(refresh.role, UserRole::Customer);
    }

    #[test]
    fn pair_tokens_are_not_interchangeable() {
        let config = config();
        let pair = issue_tokens(&account(UserRole::Barber), &config).unwrap();

        assert!(jwt::validate_refresh_token(&pair.access_token, &config.secret).is_err());
        assert!(jwt::validate_access_token(&pair.refresh_token, &config.secret).is_err());
    }
}
