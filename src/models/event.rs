use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

/// A ticketed event. `price` is the per-person ticket price snapshotted into
/// event bookings at creation; later price edits never touch old bookings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub venue: String,
    pub district: String,
    pub date: String, // ISO date string
    pub price: f64,
    pub is_approved: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateEventDto {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub venue: String,
    pub district: String,
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub venue: Option<String>,
    pub district: Option<String>,
    pub date: Option<String>,
    pub price: Option<f64>,
}
