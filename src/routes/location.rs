use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{CreateLocationDto, Location, UpdateLocationDto};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Location")]
#[get("/location/all")]
pub async fn get_all_locations(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let locations: Vec<Location> = db.collection::<Location>("locations")
        .find(doc! { "is_approved": true }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    let data = serde_json::to_value(&locations)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Location")]
#[get("/location/<location_id>")]
pub async fn get_location_by_id(
    db: &State<DbConn>,
    location_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&location_id)
        .map_err(|_| ApiError::bad_request("Invalid location ID"))?;

    let location = db.collection::<Location>("locations")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Location not found"))?;

    let data = serde_json::to_value(&location)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Location")]
#[post("/location/create", data = "<dto>")]
pub async fn create_location(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreateLocationDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.name.trim().is_empty() || dto.district.trim().is_empty() {
        return Err(ApiError::bad_request("Name and district are required"));
    }

    let now = DateTime::now();
    let location = Location {
        id: None,
        name: dto.name.trim().to_string(),
        description: dto.description.clone(),
        images: dto.images.clone(),
        district: dto.district.trim().to_string(),
        category: dto.category.clone(),
        best_season: dto.best_season.clone(),
        rating: 0.0,
        num_reviews: 0,
        reviews: Vec::new(),
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<Location>("locations")
        .insert_one(&location, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create location: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Location created successfully".to_string(),
        serde_json::json!({
            "location_id": result.inserted_id.as_object_id().map(|id| id.to_hex())
        }),
    )))
}

#[openapi(tag = "Location")]
#[put("/location/<location_id>", data = "<dto>")]
pub async fn update_location(
    db: &State<DbConn>,
    _admin: AdminGuard,
    location_id: String,
    dto: Json<UpdateLocationDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&location_id)
        .map_err(|_| ApiError::bad_request("Invalid location ID"))?;

    // Derived review fields are excluded by construction
    let mut update_doc = doc! {
        "updated_at": DateTime::now()
    };

    if let Some(ref name) = dto.name {
        update_doc.insert("name", name.trim());
    }
    if let Some(ref description) = dto.description {
        update_doc.insert("description", description);
    }
    if let Some(ref images) = dto.images {
        update_doc.insert("images", images.clone());
    }
    if let Some(ref district) = dto.district {
        update_doc.insert("district", district.trim());
    }
    if let Some(ref category) = dto.category {
        update_doc.insert("category", category);
    }
    if let Some(ref best_season) = dto.best_season {
        update_doc.insert("best_season", best_season);
    }

    let result = db.collection::<Location>("locations")
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update location: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Location not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Location updated successfully"
    }))))
}

#[openapi(tag = "Location")]
#[delete("/location/<location_id>")]
pub async fn delete_location(
    db: &State<DbConn>,
    _admin: AdminGuard,
    location_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&location_id)
        .map_err(|_| ApiError::bad_request("Invalid location ID"))?;

    let result = db.collection::<Location>("locations")
        .delete_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete location: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Location not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Location deleted successfully"
    }))))
}
