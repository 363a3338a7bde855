use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

use crate::models::Review;

/// Reviewable content: `rating` and `num_reviews` are derived from `reviews`
/// by the review aggregator and must not be written by any other code path.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Hotel {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub district: String,
    pub address: Option<String>,
    pub price_per_night: Option<f64>,
    pub rating: f64,
    pub num_reviews: i32,
    pub reviews: Vec<Review>,
    pub is_approved: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHotelDto {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub district: String,
    pub address: Option<String>,
    pub price_per_night: Option<f64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHotelDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub price_per_night: Option<f64>,
}
