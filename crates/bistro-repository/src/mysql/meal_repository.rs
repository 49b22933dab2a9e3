//! MySQL meal repository implementation.

use crate::{traits::MealRepository, DatabasePoolInterface};
use async_trait::async_trait;
use bistro_core::{
    BistroError, BistroResult, Comment, Meal, MealChanges, MealId, MealOrderDetail, NewMeal,
    Rating,
};
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const MEAL_COLUMNS: &str =
    "id, title, price, available_quantity, image, description, created_at, updated_at";

/// MySQL meal repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = MealRepository)]
pub struct MySqlMealRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlMealRepository {
    /// Creates a new MySQL meal repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn load_ratings(&self, id: MealId) -> BistroResult<Vec<Rating>> {
        let rows = sqlx::query_as::<_, RatingRow>(
            "SELECT id, meal_id, user_id, score, created_at FROM ratings WHERE meal_id = ? ORDER BY id",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Rating::from).collect())
    }

    async fn load_comments(&self, id: MealId) -> BistroResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, meal_id, user_id, content, created_at FROM comments WHERE meal_id = ? ORDER BY id",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn load_order_details(&self, id: MealId) -> BistroResult<Vec<MealOrderDetail>> {
        let rows = sqlx::query_as::<_, MealOrderDetailRow>(
            "SELECT id, meal_id, order_id, quantity, price FROM meal_order_details WHERE meal_id = ? ORDER BY id",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(MealOrderDetail::from).collect())
    }
}

/// Database row representation of a meal.
#[derive(Debug, FromRow)]
struct MealRow {
    id: i64,
    title: String,
    price: f64,
    available_quantity: i32,
    image: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MealRow> for Meal {
    fn from(row: MealRow) -> Self {
        Self {
            id: MealId::new(row.id),
            title: row.title,
            price: row.price,
            available_quantity: row.available_quantity,
            image: row.image,
            description: row.description,
            ratings: Vec::new(),
            comments: Vec::new(),
            meal_order_details: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RatingRow {
    id: i64,
    meal_id: i64,
    user_id: i64,
    score: i32,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Self {
            id: row.id,
            meal_id: MealId::new(row.meal_id),
            user_id: row.user_id,
            score: row.score,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    meal_id: i64,
    user_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            meal_id: MealId::new(row.meal_id),
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MealOrderDetailRow {
    id: i64,
    meal_id: i64,
    order_id: i64,
    quantity: i32,
    price: f64,
}

impl From<MealOrderDetailRow> for MealOrderDetail {
    fn from(row: MealOrderDetailRow) -> Self {
        Self {
            id: row.id,
            meal_id: MealId::new(row.meal_id),
            order_id: row.order_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Groups ratings onto their meals, preserving meal order.
fn attach_ratings(meals: Vec<Meal>, ratings: Vec<Rating>) -> Vec<Meal> {
    let mut by_meal: HashMap<MealId, Vec<Rating>> = HashMap::new();
    for rating in ratings {
        by_meal.entry(rating.meal_id).or_default().push(rating);
    }

    meals
        .into_iter()
        .map(|mut meal| {
            meal.ratings = by_meal.remove(&meal.id).unwrap_or_default();
            meal
        })
        .collect()
}

#[async_trait]
impl MealRepository for MySqlMealRepository {
    async fn find_by_id(&self, id: MealId, with_associations: bool) -> BistroResult<Option<Meal>> {
        debug!("Finding meal by id: {} (associations: {})", id, with_associations);

        let row = sqlx::query_as::<_, MealRow>(&format!(
            "SELECT {} FROM meals WHERE id = ?",
            MEAL_COLUMNS
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut meal = Meal::from(row);
        if with_associations {
            meal.ratings = self.load_ratings(id).await?;
            meal.comments = self.load_comments(id).await?;
            meal.meal_order_details = self.load_order_details(id).await?;
        }

        Ok(Some(meal))
    }

    async fn find_all_with_ratings(&self) -> BistroResult<Vec<Meal>> {
        debug!("Listing meals with ratings");

        let rows = sqlx::query_as::<_, MealRow>(&format!(
            "SELECT {} FROM meals ORDER BY id",
            MEAL_COLUMNS
        ))
        .fetch_all(self.pool.inner())
        .await?;

        let ratings = sqlx::query_as::<_, RatingRow>(
            "SELECT id, meal_id, user_id, score, created_at FROM ratings ORDER BY id",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(attach_ratings(
            rows.into_iter().map(Meal::from).collect(),
            ratings.into_iter().map(Rating::from).collect(),
        ))
    }

    async fn save(&self, meal: &NewMeal) -> BistroResult<Meal> {
        debug!("Saving meal: {}", meal.title);

        let result = sqlx::query(
            r#"
            INSERT INTO meals (title, price, available_quantity, image, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meal.title)
        .bind(meal.price)
        .bind(meal.available_quantity)
        .bind(&meal.image)
        .bind(&meal.description)
        .execute(self.pool.inner())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map(MealId::new)
            .map_err(|_| BistroError::internal("Meal ID out of range"))?;

        self.find_by_id(id, false)
            .await?
            .ok_or_else(|| BistroError::internal(format!("Meal {} vanished after insert", id)))
    }

    async fn update(&self, id: MealId, changes: &MealChanges) -> BistroResult<Meal> {
        debug!("Updating meal: {}", id);

        sqlx::query(
            r#"
            UPDATE meals SET
                title = COALESCE(?, title),
                price = COALESCE(?, price),
                available_quantity = COALESCE(?, available_quantity),
                image = COALESCE(?, image),
                description = COALESCE(?, description),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(changes.price)
        .bind(changes.available_quantity)
        .bind(&changes.image)
        .bind(&changes.description)
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        // MySQL reports only changed rows, so existence is checked by reloading.
        self.find_by_id(id, true)
            .await?
            .ok_or_else(|| BistroError::not_found("Meal", id))
    }

    async fn delete(&self, id: MealId) -> BistroResult<bool> {
        debug!("Deleting meal: {}", id);

        let result = sqlx::query("DELETE FROM meals WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> BistroResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
