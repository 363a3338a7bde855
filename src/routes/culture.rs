use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{CreateCultureItemDto, CultureCategory, CultureItem, UpdateCultureItemDto};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[derive(FromForm, serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct CultureQuery {
    pub category: Option<String>,
}

#[openapi(tag = "Culture")]
#[get("/culture/all?<query..>")]
pub async fn get_all_culture_items(
    db: &State<DbConn>,
    query: CultureQuery,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut filter = doc! { "is_approved": true };
    if let Some(ref category) = query.category {
        match category.as_str() {
            "culture" | "handicraft" => {
                filter.insert("category", category);
            }
            _ => return Err(ApiError::bad_request("Invalid category. Use 'culture' or 'handicraft'")),
        }
    }

    let items: Vec<CultureItem> = db.collection::<CultureItem>("culture_items")
        .find(filter, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    let data = serde_json::to_value(&items)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Culture")]
#[get("/culture/<item_id>")]
pub async fn get_culture_item_by_id(
    db: &State<DbConn>,
    item_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&item_id)
        .map_err(|_| ApiError::bad_request("Invalid item ID"))?;

    let item = db.collection::<CultureItem>("culture_items")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    let data = serde_json::to_value(&item)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Culture")]
#[post("/culture/create", data = "<dto>")]
pub async fn create_culture_item(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreateCultureItemDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    let category = match dto.category.as_str() {
        "culture" => CultureCategory::Culture,
        "handicraft" => CultureCategory::Handicraft,
        _ => return Err(ApiError::bad_request("Invalid category. Use 'culture' or 'handicraft'")),
    };

    let now = DateTime::now();
    let item = CultureItem {
        id: None,
        title: dto.title.trim().to_string(),
        category,
        description: dto.description.clone(),
        images: dto.images.clone(),
        district: dto.district.clone(),
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<CultureItem>("culture_items")
        .insert_one(&item, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create listing: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Listing created successfully".to_string(),
        serde_json::json!({
            "item_id": result.inserted_id.as_object_id().map(|id| id.to_hex())
        }),
    )))
}

#[openapi(tag = "Culture")]
#[put("/culture/<item_id>", data = "<dto>")]
pub async fn update_culture_item(
    db: &State<DbConn>,
    _admin: AdminGuard,
    item_id: String,
    dto: Json<UpdateCultureItemDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&item_id)
        .map_err(|_| ApiError::bad_request("Invalid item ID"))?;

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
    if let Some(ref district) = dto.district {
        update_doc.insert("district", district);
    }

    let result = db.collection::<CultureItem>("culture_items")
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update listing: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Listing not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Listing updated successfully"
    }))))
}

#[openapi(tag = "Culture")]
#[delete("/culture/<item_id>")]
pub async fn delete_culture_item(
    db: &State<DbConn>,
    _admin: AdminGuard,
    item_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&item_id)
        .map_err(|_| ApiError::bad_request("Invalid item ID"))?;

    let result = db.collection::<CultureItem>("culture_items")
        .delete_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete listing: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Listing not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Listing deleted successfully"
    }))))
}
