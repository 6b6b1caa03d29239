//! Wishlist service.
//!
//! A single toggle endpoint flips a festival in and out of a user's
//! wishlist; removal is an idempotent no-op when the entry is absent.

use festa_common::{AppError, AppResult};
use festa_db::{
    entities::wishlist,
    repositories::{FestivalRepository, UserRepository, WishlistRepository},
};
use sea_orm::Set;

/// Outcome of a wishlist operation, carrying enough festival context to
/// render a card without another round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistStatus {
    pub wishlist_id: i64,
    pub user_id: i64,
    pub festival_id: i64,
    pub festival_name: Option<String>,
    pub festival_image_url: Option<String>,
    /// True when the toggle added the entry, false when it removed it.
    pub added: bool,
}

/// Wishlist service.
#[derive(Clone)]
pub struct WishlistService {
    wishlist_repo: WishlistRepository,
    user_repo: UserRepository,
    festival_repo: FestivalRepository,
}

impl WishlistService {
    /// Create a new wishlist service.
    #[must_use]
    pub const fn new(
        wishlist_repo: WishlistRepository,
        user_repo: UserRepository,
        festival_repo: FestivalRepository,
    ) -> Self {
        Self {
            wishlist_repo,
            user_repo,
            festival_repo,
        }
    }

    /// Flip the wishlist entry for a (user, festival) pair.
    ///
    /// Reports `added = true` when the entry was created, `added = false`
    /// when an existing entry was removed.
    pub async fn toggle(&self, user_id: i64, festival_id: i64) -> AppResult<WishlistStatus> {
        let festival = self
            .festival_repo
            .find_by_id(festival_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))?;

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(existing) = self
            .wishlist_repo
            .find_by_user_and_festival(user_id, festival_id)
            .await?
        {
            self.wishlist_repo.delete(existing.clone()).await?;
            return Ok(WishlistStatus {
                wishlist_id: existing.id,
                user_id,
                festival_id,
                festival_name: Some(festival.name),
                festival_image_url: festival.image_url,
                added: false,
            });
        }

        let saved = self
            .wishlist_repo
            .create(wishlist::ActiveModel {
                user_id: Set(user_id),
                festival_id: Set(festival_id),
                ..Default::default()
            })
            .await?;

        Ok(WishlistStatus {
            wishlist_id: saved.id,
            user_id: saved.user_id,
            festival_id: saved.festival_id,
            festival_name: Some(festival.name),
            festival_image_url: festival.image_url,
            added: true,
        })
    }

    /// Remove the entry for a (user, festival) pair. Absence is not an
    /// error.
    pub async fn remove(&self, user_id: i64, festival_id: i64) -> AppResult<()> {
        self.wishlist_repo
            .delete_by_user_and_festival(user_id, festival_id)
            .await
    }

    /// Get a user's wishlist with festival context.
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<WishlistStatus>> {
        let entries = self.wishlist_repo.find_by_user(user_id).await?;
        let with_festivals = self.wishlist_repo.with_festivals(entries).await?;

        Ok(with_festivals
            .into_iter()
            .map(|(entry, festival)| WishlistStatus {
                wishlist_id: entry.id,
                user_id: entry.user_id,
                festival_id: entry.festival_id,
                festival_name: festival.as_ref().map(|f| f.name.clone()),
                festival_image_url: festival.and_then(|f| f.image_url),
                added: true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use festa_db::entities::{festival, user};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_festival(id: i64) -> festival::Model {
        festival::Model {
            id,
            name: format!("festival-{id}"),
            description: "desc".to_string(),
            location: "Seoul".to_string(),
            categories: None,
            lat: None,
            lng: None,
            image_url: Some("https://img.example/f.jpg".to_string()),
            region: "서울".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
        }
    }

    fn create_test_user(id: i64) -> user::Model {
        user::Model {
            id,
            name: "tester".to_string(),
            email: format!("u{id}@example.com"),
            password: "pw".to_string(),
            interest: None,
            admin: 0,
            join_date: Utc::now().into(),
        }
    }

    fn create_test_entry(id: i64, user_id: i64, festival_id: i64) -> wishlist::Model {
        wishlist::Model {
            id,
            user_id,
            festival_id,
        }
    }

    #[tokio::test]
    async fn test_toggle_sequence_add_remove_add() {
        let festival = create_test_festival(7);
        let user = create_test_user(10);
        let entry = create_test_entry(1, 10, 7);
        let entry2 = create_test_entry(2, 10, 7);

        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![festival.clone()],
                    vec![festival.clone()],
                    vec![festival.clone()],
                ])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![user.clone()],
                    vec![user.clone()],
                    vec![user.clone()],
                ])
                .into_connection(),
        );
        // Queries, in order: lookup (absent), insert, lookup (present),
        // lookup (absent), insert. The middle delete is an exec.
        let wishlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<wishlist::Model>::new(),
                    vec![entry.clone()],
                    vec![entry.clone()],
                    Vec::<wishlist::Model>::new(),
                    vec![entry2.clone()],
                ])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = WishlistService::new(
            WishlistRepository::new(wishlist_db),
            UserRepository::new(user_db),
            FestivalRepository::new(festival_db),
        );

        let first = service.toggle(10, 7).await.unwrap();
        let second = service.toggle(10, 7).await.unwrap();
        let third = service.toggle(10, 7).await.unwrap();

        assert!(first.added);
        assert!(!second.added);
        assert!(third.added);
        assert_eq!(second.wishlist_id, first.wishlist_id);
        assert_eq!(first.festival_name.as_deref(), Some("festival-7"));
    }

    #[tokio::test]
    async fn test_toggle_unknown_festival() {
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<festival::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let wishlist_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = WishlistService::new(
            WishlistRepository::new(wishlist_db),
            UserRepository::new(user_db),
            FestivalRepository::new(festival_db),
        );

        let result = service.toggle(10, 99).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_absent_entry_is_silent() {
        let festival_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let wishlist_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = WishlistService::new(
            WishlistRepository::new(wishlist_db),
            UserRepository::new(user_db),
            FestivalRepository::new(festival_db),
        );

        service.remove(10, 99).await.unwrap();
    }
}
