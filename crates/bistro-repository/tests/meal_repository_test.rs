//! Integration tests for MySqlMealRepository.
//!
//! These tests run against a real MySQL database using testcontainers and
//! need Docker, so they are ignored by default.

mod common;

use bistro_core::{BistroError, MealChanges, MealId, NewMeal};
use bistro_repository::{MealRepository, MySqlMealRepository};
use common::TestDatabase;

fn new_meal(title: &str, price: f64) -> NewMeal {
    NewMeal {
        title: title.to_string(),
        price,
        available_quantity: 10,
        image: None,
        description: Some(format!("{} of the day", title)),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let saved = repo.save(&new_meal("Soup", 5.0)).await.expect("Failed to save meal");
    assert!(saved.id.into_inner() > 0);
    assert_eq!(saved.title, "Soup");

    let found = repo
        .find_by_id(saved.id, false)
        .await
        .expect("Query failed")
        .expect("Meal not found");

    assert_eq!(found.id, saved.id);
    assert_eq!(found.price, 5.0);
    assert_eq!(found.description.as_deref(), Some("Soup of the day"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let result = repo.find_by_id(MealId::new(999), true).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_with_associations() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let meal = repo.save(&new_meal("Stew", 8.0)).await.unwrap();
    let id = meal.id.into_inner();
    db.execute(&format!(
        "INSERT INTO ratings (meal_id, user_id, score) VALUES ({id}, 1, 4), ({id}, 2, 5)"
    ))
    .await;
    db.execute(&format!(
        "INSERT INTO comments (meal_id, user_id, content) VALUES ({id}, 1, 'Hearty')"
    ))
    .await;
    db.execute(&format!(
        "INSERT INTO meal_order_details (meal_id, order_id, quantity, price) VALUES ({id}, 30, 2, 8.0)"
    ))
    .await;

    let bare = repo.find_by_id(meal.id, false).await.unwrap().unwrap();
    assert!(bare.ratings.is_empty());

    let full = repo.find_by_id(meal.id, true).await.unwrap().unwrap();
    assert_eq!(full.ratings.len(), 2);
    assert_eq!(full.comments[0].content, "Hearty");
    assert_eq!(full.meal_order_details[0].quantity, 2);
    assert_eq!(full.average_rating(), Some(4.5));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_with_ratings() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let soup = repo.save(&new_meal("Soup", 5.0)).await.unwrap();
    repo.save(&new_meal("Salad", 4.0)).await.unwrap();
    db.execute(&format!(
        "INSERT INTO ratings (meal_id, user_id, score) VALUES ({}, 1, 3)",
        soup.id
    ))
    .await;

    let meals = repo.find_all_with_ratings().await.unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0].ratings.len(), 1);
    assert!(meals[1].ratings.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_merges_fields() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let meal = repo.save(&new_meal("Soup", 5.0)).await.unwrap();
    let changes = MealChanges {
        price: Some(6.0),
        ..MealChanges::default()
    };

    let updated = repo.update(meal.id, &changes).await.unwrap();
    assert_eq!(updated.price, 6.0);
    assert_eq!(updated.title, "Soup");
    assert_eq!(updated.available_quantity, 10);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_meal() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let result = repo
        .update(MealId::new(4242), &MealChanges::default())
        .await;
    assert!(matches!(result, Err(BistroError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_and_count() {
    let db = TestDatabase::new().await;
    let repo = MySqlMealRepository::new(db.pool());

    let meal = repo.save(&new_meal("Soup", 5.0)).await.unwrap();
    repo.save(&new_meal("Salad", 4.0)).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 2);

    assert!(repo.delete(meal.id).await.unwrap());
    assert!(!repo.delete(meal.id).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);
}
