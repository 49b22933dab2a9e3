//! Cached meal entry and its string encoding.

use bistro_core::{BistroError, BistroResult, Meal};
use serde::{Deserialize, Serialize};

/// The cache's projection of a meal: the full record plus a read counter.
///
/// Encoded as a single JSON object holding every meal field alongside
/// `access_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// The meal as loaded from the persistent store.
    #[serde(flatten)]
    pub meal: Meal,

    /// Reads served from the cache since the entry was seeded.
    pub access_count: u32,
}

impl CachedEntry {
    /// Builds a fresh entry with a zero access count.
    #[must_use]
    pub const fn seed(meal: Meal) -> Self {
        Self {
            meal,
            access_count: 0,
        }
    }

    /// Builds an entry that keeps a previously recorded access count.
    #[must_use]
    pub const fn with_count(meal: Meal, access_count: u32) -> Self {
        Self { meal, access_count }
    }

    /// Serializes the entry to the string stored in the cache.
    pub fn encode(&self) -> BistroResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an entry read from the cache.
    ///
    /// Malformed text is a cache integrity failure and maps to
    /// `BistroError::Cache`.
    pub fn decode(raw: &str) -> BistroResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| BistroError::cache(format!("Corrupt cache entry: {}", e)))
    }

    /// Returns a copy with the access count incremented by one.
    #[must_use]
    pub fn touched(&self) -> Self {
        Self {
            meal: self.meal.clone(),
            access_count: self.access_count.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{Comment, MealId, MealOrderDetail, Rating};
    use chrono::{TimeZone, Utc};

    fn soup() -> Meal {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Meal {
            id: MealId::new(7),
            title: "Soup".to_string(),
            price: 5.0,
            available_quantity: 10,
            image: None,
            description: None,
            ratings: vec![Rating {
                id: 1,
                meal_id: MealId::new(7),
                user_id: 3,
                score: 4,
                created_at: at,
            }],
            comments: vec![Comment {
                id: 2,
                meal_id: MealId::new(7),
                user_id: 3,
                content: "Warm".to_string(),
                created_at: at,
            }],
            meal_order_details: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_encoding_is_a_flat_object() {
        let raw = CachedEntry::seed(soup()).encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "Soup");
        assert_eq!(value["price"], 5.0);
        assert_eq!(value["access_count"], 0);
        assert_eq!(value["ratings"][0]["score"], 4);
        assert!(value.get("meal").is_none());
    }

    #[test]
    fn test_decode_restores_associations() {
        let entry = CachedEntry::with_count(soup(), 2);
        let decoded = CachedEntry::decode(&entry.encode().unwrap()).unwrap();

        assert_eq!(decoded, entry);
        assert_eq!(decoded.meal.comments[0].content, "Warm");
    }

    #[test]
    fn test_decode_preserves_prices_exactly() {
        let mut meal = soup();
        meal.meal_order_details.push(MealOrderDetail {
            id: 9,
            meal_id: meal.id,
            order_id: 40,
            quantity: 2,
            price: 0.1 + 0.2,
        });

        let mut prices = vec![1416.289_709_127_382, 19.99, 0.1 + 0.2, 1e-7 / 3.0];
        prices.extend((1..2_000_u32).map(|k| f64::from(k) * 12_345.678_9 / 997.0));

        for price in prices {
            meal.price = price;
            meal.meal_order_details[0].price = price / 7.0;
            let entry = CachedEntry::with_count(meal.clone(), 3);

            let decoded = CachedEntry::decode(&entry.encode().unwrap()).unwrap();

            assert_eq!(decoded.meal.price.to_bits(), price.to_bits(), "price {}", price);
            assert_eq!(
                decoded.meal.meal_order_details[0].price.to_bits(),
                (price / 7.0).to_bits()
            );
            assert_eq!(decoded, entry);
        }
    }

    #[test]
    fn test_encoding_is_stable() {
        let entry = CachedEntry::with_count(soup(), 1);
        assert_eq!(entry.encode().unwrap(), entry.clone().encode().unwrap());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = CachedEntry::decode("{\"id\":").unwrap_err();
        assert!(matches!(err, BistroError::Cache(_)));

        let err = CachedEntry::decode("{\"title\":\"Soup\"}").unwrap_err();
        assert_eq!(err.error_code(), "CACHE_ERROR");
    }

    #[test]
    fn test_touched_increments() {
        let entry = CachedEntry::seed(soup());
        assert_eq!(entry.touched().access_count, 1);
        assert_eq!(entry.touched().touched().access_count, 2);
        assert_eq!(entry.access_count, 0);
    }
}
