use crate::{
    auth::TokenService,
    error::{AppError, AppResult},
    models::{LoginRequest, NewUser, RegisterRequest, UpdateUserRequest, User},
    password::{hash_password, verify_password},
    repository::RepositoryState,
};

use super::ownership::{provided, require_non_empty};

const WRONG_CREDENTIALS: &str = "email/password is wrong";

/// IdentityService
///
/// Registration, login and self-service profile management.
#[derive(Clone)]
pub struct IdentityService {
    repo: RepositoryState,
    tokens: TokenService,
}

impl IdentityService {
    pub fn new(repo: RepositoryState, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    /// register
    ///
    /// Creates an identity after checking that email and username are free among live
    /// identities. Nothing is written when either is taken.
    pub async fn register(&self, input: RegisterRequest) -> AppResult<User> {
        require_non_empty(&[
            ("full_name", input.full_name.as_str()),
            ("username", input.username.as_str()),
            ("email", input.email.as_str()),
            ("password", input.password.as_str()),
        ])?;

        self.ensure_available(None, &input.email, &input.username)
            .await?;

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                full_name: input.full_name,
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "registered new user");
        Ok(user)
    }

    /// login
    ///
    /// Exchanges valid credentials for a one-hour token. Unknown email and wrong password fail
    /// the same way.
    pub async fn login(&self, input: LoginRequest) -> AppResult<String> {
        let user = match self.repo.find_user_by_email(&input.email).await? {
            Some(user) if verify_password(&input.password, &user.password_hash) => user,
            _ => {
                tracing::warn!("failed login attempt");
                return Err(AppError::Unauthenticated(WRONG_CREDENTIALS.to_string()));
            }
        };

        self.tokens.issue(user.id)
    }

    /// Loads a live identity by id.
    pub async fn get_credential(&self, user_id: i64) -> AppResult<User> {
        self.repo
            .find_user(user_id)
            .await?
            .ok_or(AppError::UnknownIdentity)
    }

    /// update_profile
    ///
    /// Partial update of the caller's own profile. Empty fields keep their value; a new
    /// password is hashed before it is stored.
    pub async fn update_profile(&self, user_id: i64, input: UpdateUserRequest) -> AppResult<User> {
        let mut user = self.get_credential(user_id).await?;

        let email = provided(&input.email).unwrap_or(&user.email).to_string();
        let username = provided(&input.username)
            .unwrap_or(&user.username)
            .to_string();
        self.ensure_available(Some(user_id), &email, &username)
            .await?;

        user.email = email;
        user.username = username;
        if let Some(full_name) = provided(&input.full_name) {
            user.full_name = full_name.to_string();
        }
        if let Some(password) = provided(&input.password) {
            user.password_hash = hash_password(password)?;
        }

        let updated = self.repo.update_user(&user).await?;
        tracing::info!(user_id, "updated profile");
        Ok(updated)
    }

    /// delete_account
    ///
    /// Soft-deletes the caller. Tokens already issued stop resolving to a user.
    pub async fn delete_account(&self, user_id: i64) -> AppResult<()> {
        if !self.repo.soft_delete_user(user_id).await? {
            return Err(AppError::UnknownIdentity);
        }
        tracing::info!(user_id, "deleted account");
        Ok(())
    }

    // `except` excludes the caller's own row when checking a profile update.
    async fn ensure_available(
        &self,
        except: Option<i64>,
        email: &str,
        username: &str,
    ) -> AppResult<()> {
        let taken = |found: Option<User>| found.is_some_and(|u| Some(u.id) != except);

        if taken(self.repo.find_user_by_email(email).await?) {
            return Err(AppError::Conflict("email already used".to_string()));
        }
        if taken(self.repo.find_user_by_username(username).await?) {
            return Err(AppError::Conflict("username already used".to_string()));
        }
        Ok(())
    }
}
