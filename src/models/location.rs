use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

use crate::models::Review;

/// An "explore" destination (waterfall, temple, hill station, ...).
/// Reviewable content, same derived-field rule as hotels.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Location {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub district: String,
    pub category: Option<String>,
    pub best_season: Option<String>,
    pub rating: f64,
    pub num_reviews: i32,
    pub reviews: Vec<Review>,
    pub is_approved: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateLocationDto {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub district: String,
    pub category: Option<String>,
    pub best_season: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateLocationDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub district: Option<String>,
    pub category: Option<String>,
    pub best_season: Option<String>,
}
