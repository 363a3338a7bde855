use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::bson::oid::ObjectId;
use mongodb::options::FindOptions;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{Booking, BookingResponse, User, UserResponse};
use crate::guards::AdminGuard;
use crate::utils::{ApiError, ApiResponse};

#[derive(serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct SetApprovalDto {
    pub approved: bool,
}

fn collection_for(kind: &str) -> Option<&'static str> {
    match kind {
        "hotel" => Some("hotels"),
        "location" => Some("locations"),
        "package" => Some("packages"),
        "event" => Some("events"),
        "culture" => Some("culture_items"),
        _ => None,
    }
}

/// Publication toggle for any content collection.
#[openapi(tag = "Admin")]
#[put("/admin/<kind>/<content_id>/approval", data = "<dto>")]
pub async fn set_approval(
    db: &State<DbConn>,
    _admin: AdminGuard,
    kind: String,
    content_id: String,
    dto: Json<SetApprovalDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let collection = collection_for(&kind)
        .ok_or_else(|| ApiError::bad_request("Unknown content kind"))?;

    let object_id = ObjectId::parse_str(&content_id)
        .map_err(|_| ApiError::bad_request("Invalid content ID"))?;

    let result = db.collection::<Document>(collection)
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": { "is_approved": dto.approved, "updated_at": DateTime::now() } },
            None,
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update approval: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("Content not found"));
    }

    let message = if dto.approved {
        "Content approved"
    } else {
        "Content unapproved"
    };

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": message
    }))))
}

#[openapi(tag = "Admin")]
#[get("/admin/users")]
pub async fn get_all_users(
    db: &State<DbConn>,
    _admin: AdminGuard,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users: Vec<User> = db.collection::<User>("users")
        .find(None, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

#[openapi(tag = "Admin")]
#[get("/admin/bookings")]
pub async fn get_all_bookings(
    db: &State<DbConn>,
    _admin: AdminGuard,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let bookings: Vec<Booking> = db.collection::<Booking>("bookings")
        .find(None, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingResponse::from).collect(),
    )))
}
