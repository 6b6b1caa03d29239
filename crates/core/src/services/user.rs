//! User account service.

use std::sync::Arc;

use chrono::Utc;
use festa_common::{AppError, AppResult};
use festa_db::{
    entities::user,
    repositories::UserRepository,
};
use sea_orm::{ActiveModelTrait, Set};

/// Seam for credential verification.
///
/// The stored credential is compared by equality, a defect inherited from
/// earlier deployments and kept for compatibility. Swapping this
/// implementation for a hashing scheme does not touch any caller.
pub trait PasswordVerifier: Send + Sync {
    /// Returns true when the supplied credential matches the stored one.
    fn verify(&self, stored: &str, supplied: &str) -> bool;
}

/// Plain equality comparison against the stored credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextVerifier;

impl PasswordVerifier for PlainTextVerifier {
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        stored == supplied
    }
}

/// Signup input.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub interests: Vec<String>,
}

/// Partial account update input.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub password: Option<String>,
    pub interests: Option<Vec<String>>,
}

/// User service for accounts and login.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    verifier: Arc<dyn PasswordVerifier>,
}

impl UserService {
    /// Create a new user service with the default verifier.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self::with_verifier(user_repo, Arc::new(PlainTextVerifier))
    }

    /// Create a new user service with a custom credential verifier.
    #[must_use]
    pub fn with_verifier(user_repo: UserRepository, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self {
            user_repo,
            verifier,
        }
    }

    /// Register a new account.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let model = user::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            password: Set(input.password),
            interest: Set(user::join_interests(&input.interests)),
            admin: Set(0),
            join_date: Set(Utc::now().into()),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Log in with email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !self.verifier.verify(&user.password, password) {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: i64) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get all users.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Partially update an account.
    ///
    /// An empty password in the input leaves the stored one unchanged.
    pub async fn update(&self, user_id: i64, input: UpdateUserInput) -> AppResult<user::Model> {
        let existing = self.get(user_id).await?;
        let mut active: user::ActiveModel = existing.clone().into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(password) = input.password
            && !password.is_empty()
        {
            active.password = Set(password);
        }
        if let Some(interests) = input.interests {
            active.interest = Set(user::join_interests(&interests));
        }

        if !active.is_changed() {
            return Ok(existing);
        }

        self.user_repo.update(active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: i64, email: &str, password: &str) -> user::Model {
        user::Model {
            id,
            name: "tester".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            interest: Some("음식".to_string()),
            admin: 0,
            join_date: Utc::now().into(),
        }
    }

    #[test]
    fn test_plain_text_verifier() {
        let verifier = PlainTextVerifier;
        assert!(verifier.verify("secret", "secret"));
        assert!(!verifier.verify("secret", "Secret"));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let existing = create_test_user(1, "a@example.com", "pw");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .signup(SignupInput {
                name: "dup".to_string(),
                email: "a@example.com".to_string(),
                password: "pw".to_string(),
                interests: vec![],
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = create_test_user(1, "a@example.com", "right");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.login("a@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.login("nobody@example.com", "pw").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_ok() {
        let user = create_test_user(1, "a@example.com", "pw");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.login("a@example.com", "pw").await.unwrap();

        assert_eq!(result.id, 1);
    }
}
