use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{CreatePackageDto, Package, UpdatePackageDto};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Package")]
#[get("/package/all")]
pub async fn get_all_packages(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let packages: Vec<Package> = db.collection::<Package>("packages")
        .find(doc! { "is_approved": true }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    let data = serde_json::to_value(&packages)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Package")]
#[get("/package/<package_id>")]
pub async fn get_package_by_id(
    db: &State<DbConn>,
    package_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::bad_request("Invalid package ID"))?;

    let package = db.collection::<Package>("packages")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Package not found"))?;

    let data = serde_json::to_value(&package)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Package")]
#[post("/package/create", data = "<dto>")]
pub async fn create_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreatePackageDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if dto.price < 0.0 {
        return Err(ApiError::bad_request("Price cannot be negative"));
    }
    if dto.duration_days < 1 {
        return Err(ApiError::bad_request("duration_days must be at least 1"));
    }

    let now = DateTime::now();
    let package = Package {
        id: None,
        title: dto.title.trim().to_string(),
        description: dto.description.clone(),
        images: dto.images.clone(),
        location: dto.location.clone(),
        price: dto.price,
        duration_days: dto.duration_days,
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<Package>("packages")
        .insert_one(&package, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create package: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Package created successfully".to_string(),
        serde_json::json!({
            "package_id": result.inserted_id.as_object_id().map(|id| id.to_hex())
        }),
    )))
}

#[openapi(tag = "Package")]
#[put("/package/<package_id>", data = "<dto>")]
pub async fn update_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    package_id: String,
    dto: Json<UpdatePackageDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::bad_request("Invalid package ID"))?;

    let mut update_doc = doc! {
        "updated_at": DateTime::now()
    };

    if let Some(ref title) = dto.title {
        update_doc.insert("title", title.trim());
    }
    if let Some(ref description) = dto.description {
        update_doc.insert("description", description);
    }
    if let Some(ref images) = dto.images {
        update_doc.insert("images", images.clone());
    }
    if let Some(ref location) = dto.location {
        update_doc.insert("location", location);
    }
    if let Some(price) = dto.price {
        if price < 0.0 {
            return Err(ApiError::bad_request("Price cannot be negative"));
        }
        update_doc.insert("price", price);
    }
    if let Some(duration_days) = dto.duration_days {
        update_doc.insert("duration_days", duration_days);
    }

    let result = db.collection::<Package>("packages")
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update package: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Package not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Package updated successfully"
    }))))
}

#[openapi(tag = "Package")]
#[delete("/package/<package_id>")]
pub async fn delete_package(
    db: &State<DbConn>,
    _admin: AdminGuard,
    package_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&package_id)
        .map_err(|_| ApiError::bad_request("Invalid package ID"))?;

    let result = db.collection::<Package>("packages")
        .delete_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete package: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Package not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Package deleted successfully"
    }))))
}
