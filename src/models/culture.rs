use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CultureCategory {
    Culture,
    Handicraft,
}

/// Culture and handicraft listings share one collection, split by category.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CultureItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub category: CultureCategory,
    pub description: String,
    pub images: Vec<String>,
    pub district: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCultureItemDto {
    pub title: String,
    pub category: String, // "culture" or "handicraft"
    pub description: String,
    pub images: Vec<String>,
    pub district: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateCultureItemDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub district: Option<String>,
}
