use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

/// A curated multi-day tour. Packages carry a free-text `location`, not a
/// district, and have no review flow.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Package {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub location: String,
    pub price: f64,
    pub duration_days: i32,
    pub is_approved: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePackageDto {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub location: String,
    pub price: f64,
    pub duration_days: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdatePackageDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub duration_days: Option<i32>,
}
