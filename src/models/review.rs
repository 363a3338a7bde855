use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

/// One review embedded in a reviewable content document (hotel or location).
/// `user_id` may be absent on anonymous legacy rows. The parent document's
/// `rating` and `num_reviews` are derived from the full review set and are
/// only ever written by the review aggregator.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    pub user_name: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateReviewDto {
    pub rating: f64,
    pub comment: String,
}
