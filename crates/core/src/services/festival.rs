//! Festival service.
//!
//! Owns the festival listing (ranked by rating), recommendations, and the
//! cascading deletion of a festival's dependents.

use chrono::{NaiveDate, Utc};
use festa_common::{AppError, AppResult};
use festa_db::{
    entities::festival,
    repositories::{FestivalRating, FestivalRepository, ReviewRepository, UserRepository},
};
use sea_orm::{ActiveModelTrait, Set};

/// A festival paired with its review average. `None` means the festival has
/// no reviews - distinct from the ranked listing, which reports 0 instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FestivalWithRating {
    pub festival: festival::Model,
    pub average_rating: Option<f64>,
}

/// Input for creating a festival.
#[derive(Debug, Clone)]
pub struct CreateFestivalInput {
    pub name: String,
    pub description: String,
    pub location: String,
    pub region: String,
    pub categories: Vec<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Partial update input for a festival.
#[derive(Debug, Clone, Default)]
pub struct UpdateFestivalInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub region: Option<String>,
    pub categories: Option<Vec<String>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Festival service.
#[derive(Clone)]
pub struct FestivalService {
    festival_repo: FestivalRepository,
    user_repo: UserRepository,
    review_repo: ReviewRepository,
}

impl FestivalService {
    /// Create a new festival service.
    #[must_use]
    pub const fn new(
        festival_repo: FestivalRepository,
        user_repo: UserRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            festival_repo,
            user_repo,
            review_repo,
        }
    }

    /// All festivals ranked by average rating, best first.
    pub async fn list_ranked(&self) -> AppResult<Vec<FestivalRating>> {
        self.review_repo.ranked_festivals().await
    }

    /// Get one festival with its review average.
    pub async fn get(&self, festival_id: i64) -> AppResult<FestivalWithRating> {
        let festival = self
            .festival_repo
            .find_by_id(festival_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))?;

        self.with_rating(festival).await
    }

    /// Festivals reordered for a user: those matching the user's interest
    /// first, everything else after, each side keeping store order.
    pub async fn recommended(&self, user_id: i64) -> AppResult<Vec<FestivalWithRating>> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let all = self.festival_repo.find_all().await?;
        let (preferred, others): (Vec<_>, Vec<_>) = all
            .into_iter()
            .partition(|f| matches_interest(f, user.interest.as_deref()));

        let mut ordered = preferred;
        ordered.extend(others);

        let mut result = Vec::with_capacity(ordered.len());
        for festival in ordered {
            result.push(self.with_rating(festival).await?);
        }
        Ok(result)
    }

    /// Festivals that have not ended yet, soonest start first.
    pub async fn upcoming(&self) -> AppResult<Vec<FestivalWithRating>> {
        let today = Utc::now().date_naive();
        let festivals = self.festival_repo.find_ending_on_or_after(today).await?;

        let mut result = Vec::with_capacity(festivals.len());
        for festival in festivals {
            result.push(self.with_rating(festival).await?);
        }
        Ok(result)
    }

    /// Create a festival. `start_date > end_date` is accepted as-is.
    pub async fn create(&self, input: CreateFestivalInput) -> AppResult<FestivalWithRating> {
        let model = festival::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            location: Set(input.location),
            region: Set(input.region),
            categories: Set(festival::join_categories(&input.categories)),
            lat: Set(input.lat),
            lng: Set(input.lng),
            image_url: Set(input.image_url),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            ..Default::default()
        };

        let saved = self.festival_repo.create(model).await?;
        self.with_rating(saved).await
    }

    /// Partially update a festival.
    pub async fn update(
        &self,
        festival_id: i64,
        input: UpdateFestivalInput,
    ) -> AppResult<FestivalWithRating> {
        let existing = self
            .festival_repo
            .find_by_id(festival_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))?;

        let mut active: festival::ActiveModel = existing.clone().into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(region) = input.region {
            active.region = Set(region);
        }
        if let Some(categories) = input.categories {
            active.categories = Set(festival::join_categories(&categories));
        }
        if let Some(lat) = input.lat {
            active.lat = Set(Some(lat));
        }
        if let Some(lng) = input.lng {
            active.lng = Set(Some(lng));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }

        if !active.is_changed() {
            return self.with_rating(existing).await;
        }

        let saved = self.festival_repo.update(active).await?;
        self.with_rating(saved).await
    }

    /// Delete a festival and everything referencing it.
    pub async fn delete(&self, festival_id: i64) -> AppResult<()> {
        if !self.festival_repo.exists(festival_id).await? {
            return Err(AppError::NotFound("Festival not found".to_string()));
        }
        self.festival_repo.delete_with_dependents(festival_id).await
    }

    async fn with_rating(&self, festival: festival::Model) -> AppResult<FestivalWithRating> {
        let average_rating = self.review_repo.average_rating(festival.id).await?;
        Ok(FestivalWithRating {
            festival,
            average_rating,
        })
    }
}

/// Whether a festival's category list matches a user's interest.
///
/// The interest holds a single token; the match is whole-token equality
/// against each category, case-insensitive. A blank or absent interest
/// matches nothing.
fn matches_interest(festival: &festival::Model, interest: Option<&str>) -> bool {
    let Some(interest) = interest else {
        return false;
    };
    let interest = interest.trim();
    if interest.is_empty() {
        return false;
    }
    let interest = interest.to_lowercase();

    festival
        .category_list()
        .iter()
        .any(|category| category.to_lowercase() == interest)
}
