use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use crate::db::DbConn;
use crate::models::{CreateHotelDto, Hotel, UpdateHotelDto};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Hotel")]
#[get("/hotel/all")]
pub async fn get_all_hotels(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut cursor = db.collection::<Hotel>("hotels")
        .find(doc! { "is_approved": true }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    let mut hotels = Vec::new();
    while cursor.advance().await.map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))? {
        let hotel = cursor.deserialize_current()
            .map_err(|e| ApiError::internal_error(format!("Deserialization error: {}", e)))?;
        hotels.push(hotel);
    }

    let data = serde_json::to_value(&hotels)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Hotel")]
#[get("/hotel/<hotel_id>")]
pub async fn get_hotel_by_id(
    db: &State<DbConn>,
    hotel_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&hotel_id)
        .map_err(|_| ApiError::bad_request("Invalid hotel ID"))?;

    let hotel = db.collection::<Hotel>("hotels")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Hotel not found"))?;

    let data = serde_json::to_value(&hotel)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Hotel")]
#[post("/hotel/create", data = "<dto>")]
pub async fn create_hotel(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreateHotelDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.name.trim().is_empty() || dto.district.trim().is_empty() {
        return Err(ApiError::bad_request("Name and district are required"));
    }

    let now = DateTime::now();
    let hotel = Hotel {
        id: None,
        name: dto.name.trim().to_string(),
        description: dto.description.clone(),
        images: dto.images.clone(),
        district: dto.district.trim().to_string(),
        address: dto.address.clone(),
        price_per_night: dto.price_per_night,
        rating: 0.0,
        num_reviews: 0,
        reviews: Vec::new(),
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<Hotel>("hotels")
        .insert_one(&hotel, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create hotel: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Hotel created successfully".to_string(),
        serde_json::json!({
            "hotel_id": result.inserted_id.as_object_id().map(|id| id.to_hex())
        }),
    )))
}

#[openapi(tag = "Hotel")]
#[put("/hotel/<hotel_id>", data = "<dto>")]
pub async fn update_hotel(
    db: &State<DbConn>,
    _admin: AdminGuard,
    hotel_id: String,
    dto: Json<UpdateHotelDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&hotel_id)
        .map_err(|_| ApiError::bad_request("Invalid hotel ID"))?;

    // rating/num_reviews/reviews are derived and owned by the review flow;
    // they are never part of this update
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
    if let Some(ref address) = dto.address {
        update_doc.insert("address", address);
    }
    if let Some(price) = dto.price_per_night {
        update_doc.insert("price_per_night", price);
    }

    let result = db.collection::<Hotel>("hotels")
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update hotel: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Hotel not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Hotel updated successfully"
    }))))
}

#[openapi(tag = "Hotel")]
#[delete("/hotel/<hotel_id>")]
pub async fn delete_hotel(
    db: &State<DbConn>,
    _admin: AdminGuard,
    hotel_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&hotel_id)
        .map_err(|_| ApiError::bad_request("Invalid hotel ID"))?;

    let result = db.collection::<Hotel>("hotels")
        .delete_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete hotel: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Hotel not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Hotel deleted successfully"
    }))))
}
