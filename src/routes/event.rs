use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{CreateEventDto, Event, UpdateEventDto};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Event")]
#[get("/event/all")]
pub async fn get_all_events(
    db: &State<DbConn>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let events: Vec<Event> = db.collection::<Event>("events")
        .find(doc! { "is_approved": true }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    let data = serde_json::to_value(&events)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Event")]
#[get("/event/<event_id>")]
pub async fn get_event_by_id(
    db: &State<DbConn>,
    event_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&event_id)
        .map_err(|_| ApiError::bad_request("Invalid event ID"))?;

    let event = db.collection::<Event>("events")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;

    let data = serde_json::to_value(&event)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;
    Ok(Json(ApiResponse::success(data)))
}

#[openapi(tag = "Event")]
#[post("/event/create", data = "<dto>")]
pub async fn create_event(
    db: &State<DbConn>,
    _admin: AdminGuard,
    dto: Json<CreateEventDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.title.trim().is_empty() || dto.date.trim().is_empty() {
        return Err(ApiError::bad_request("Title and date are required"));
    }
    if dto.price < 0.0 {
        return Err(ApiError::bad_request("Price cannot be negative"));
    }

    let now = DateTime::now();
    let event = Event {
        id: None,
        title: dto.title.trim().to_string(),
        description: dto.description.clone(),
        images: dto.images.clone(),
        venue: dto.venue.clone(),
        district: dto.district.clone(),
        date: dto.date.clone(),
        price: dto.price,
        is_approved: false,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<Event>("events")
        .insert_one(&event, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create event: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        "Event created successfully".to_string(),
        serde_json::json!({
            "event_id": result.inserted_id.as_object_id().map(|id| id.to_hex())
        }),
    )))
}

#[openapi(tag = "Event")]
#[put("/event/<event_id>", data = "<dto>")]
pub async fn update_event(
    db: &State<DbConn>,
    _admin: AdminGuard,
    event_id: String,
    dto: Json<UpdateEventDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&event_id)
        .map_err(|_| ApiError::bad_request("Invalid event ID"))?;

    // Price edits apply to new bookings only; existing bookings keep the
    // price snapshotted at creation
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
    if let Some(ref venue) = dto.venue {
        update_doc.insert("venue", venue);
    }
    if let Some(ref district) = dto.district {
        update_doc.insert("district", district);
    }
    if let Some(ref date) = dto.date {
        update_doc.insert("date", date);
    }
    if let Some(price) = dto.price {
        if price < 0.0 {
            return Err(ApiError::bad_request("Price cannot be negative"));
        }
        update_doc.insert("price", price);
    }

    let result = db.collection::<Event>("events")
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update event: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Event not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Event updated successfully"
    }))))
}

#[openapi(tag = "Event")]
#[delete("/event/<event_id>")]
pub async fn delete_event(
    db: &State<DbConn>,
    _admin: AdminGuard,
    event_id: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let object_id = ObjectId::parse_str(&event_id)
        .map_err(|_| ApiError::bad_request("Invalid event ID"))?;

    let result = db.collection::<Event>("events")
        .delete_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to delete event: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(ApiError::not_found("Event not found"));
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Event deleted successfully"
    }))))
}
