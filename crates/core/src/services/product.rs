//! Product service.
//!
//! Every product belongs to a festival; the reference is re-resolved on
//! create and update so a dangling festival id is rejected up front.

use festa_common::{AppError, AppResult};
use festa_db::{
    entities::{festival, product, product::ProductType},
    repositories::{FestivalRepository, ProductRepository},
};
use sea_orm::Set;

/// A product with its owning festival.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: product::Model,
    pub festival: Option<festival::Model>,
}

/// Input for creating or overwriting a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub festival_id: i64,
    pub name: String,
    pub price: i32,
    pub original_price: Option<i32>,
    pub stock: i32,
    pub product_type: ProductType,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Product service.
#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    festival_repo: FestivalRepository,
}

impl ProductService {
    /// Create a new product service.
    #[must_use]
    pub const fn new(product_repo: ProductRepository, festival_repo: FestivalRepository) -> Self {
        Self {
            product_repo,
            festival_repo,
        }
    }

    /// Create a product under an existing festival.
    pub async fn create(&self, input: CreateProductInput) -> AppResult<ProductDetail> {
        let festival = self.resolve_festival(input.festival_id).await?;

        let model = product::ActiveModel {
            festival_id: Set(festival.id),
            name: Set(input.name),
            price: Set(input.price),
            original_price: Set(input.original_price),
            stock: Set(input.stock),
            product_type: Set(input.product_type),
            image_url: Set(input.image_url),
            description: Set(input.description),
            ..Default::default()
        };

        let saved = self.product_repo.create(model).await?;
        Ok(ProductDetail {
            product: saved,
            festival: Some(festival),
        })
    }

    /// Get one product.
    pub async fn get(&self, product_id: i64) -> AppResult<ProductDetail> {
        let (product, festival) = self
            .product_repo
            .find_by_id_with_festival(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        Ok(ProductDetail { product, festival })
    }

    /// Get all products.
    pub async fn list(&self) -> AppResult<Vec<ProductDetail>> {
        let products = self.product_repo.find_all_with_festival().await?;
        Ok(products
            .into_iter()
            .map(|(product, festival)| ProductDetail { product, festival })
            .collect())
    }

    /// Get one festival's products.
    pub async fn list_by_festival(&self, festival_id: i64) -> AppResult<Vec<ProductDetail>> {
        let festival = self.festival_repo.find_by_id(festival_id).await?;
        let products = self.product_repo.find_by_festival(festival_id).await?;

        Ok(products
            .into_iter()
            .map(|product| ProductDetail {
                product,
                festival: festival.clone(),
            })
            .collect())
    }

    /// Overwrite a product, re-resolving its festival reference.
    pub async fn update(
        &self,
        product_id: i64,
        input: CreateProductInput,
    ) -> AppResult<ProductDetail> {
        let existing = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let festival = self.resolve_festival(input.festival_id).await?;

        let mut active: product::ActiveModel = existing.into();
        active.festival_id = Set(festival.id);
        active.name = Set(input.name);
        active.price = Set(input.price);
        active.original_price = Set(input.original_price);
        active.stock = Set(input.stock);
        active.product_type = Set(input.product_type);
        active.image_url = Set(input.image_url);
        active.description = Set(input.description);

        let saved = self.product_repo.update(active).await?;
        Ok(ProductDetail {
            product: saved,
            festival: Some(festival),
        })
    }

    /// Delete a product. Deleting an absent id is a no-op.
    pub async fn delete(&self, product_id: i64) -> AppResult<()> {
        self.product_repo.delete_by_id(product_id).await
    }

    async fn resolve_festival(&self, festival_id: i64) -> AppResult<festival::Model> {
        self.festival_repo
            .find_by_id(festival_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
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
            image_url: None,
            region: "서울".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
        }
    }

    fn create_test_product(id: i64, festival_id: i64) -> product::Model {
        product::Model {
            id,
            festival_id,
            name: "떡볶이 세트".to_string(),
            price: 8000,
            original_price: None,
            stock: 50,
            product_type: ProductType::Food,
            image_url: None,
            description: None,
        }
    }

    fn input(festival_id: i64) -> CreateProductInput {
        CreateProductInput {
            festival_id,
            name: "떡볶이 세트".to_string(),
            price: 8000,
            original_price: None,
            stock: 50,
            product_type: ProductType::Food,
            image_url: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_unknown_festival_rejected() {
        let product_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<festival::Model>::new()])
                .into_connection(),
        );

        let service = ProductService::new(
            ProductRepository::new(product_db),
            FestivalRepository::new(festival_db),
        );

        let result = service.create(input(99)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_resolves_festival() {
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_product(1, 7)]])
                .into_connection(),
        );
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_festival(7)]])
                .into_connection(),
        );

        let service = ProductService::new(
            ProductRepository::new(product_db),
            FestivalRepository::new(festival_db),
        );

        let result = service.create(input(7)).await.unwrap();
        assert_eq!(result.product.festival_id, 7);
        assert_eq!(result.festival.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let festival_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ProductService::new(
            ProductRepository::new(product_db),
            FestivalRepository::new(festival_db),
        );

        service.delete(99).await.unwrap();
    }
}
