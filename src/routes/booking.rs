use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use mongodb::options::FindOptions;
use rocket::futures::TryStreamExt;
use crate::db::DbConn;
use crate::models::{
    allowed_next_states, Booking, BookingKind, BookingResponse, BookingStatus, CreateBookingDto,
    Event, UpdateBookingStatusDto, User,
};
use crate::guards::AuthGuard;
use crate::utils::{ApiError, ApiResponse};

#[openapi(tag = "Booking")]
#[post("/booking/create", data = "<dto>")]
pub async fn create_booking(
    db: &State<DbConn>,
    auth: AuthGuard,
    dto: Json<CreateBookingDto>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    // Validate before touching the store
    if dto.people_count < 1 {
        return Err(ApiError::bad_request("people_count must be at least 1"));
    }
    if dto.date.trim().is_empty() {
        return Err(ApiError::bad_request("Booking date is required"));
    }

    let target_id = ObjectId::parse_str(&dto.target_id)
        .map_err(|_| ApiError::bad_request("Invalid target ID"))?;

    let now = DateTime::now();
    let booking = match dto.kind.as_str() {
        "event" => {
            let event = db.collection::<Event>("events")
                .find_one(doc! { "_id": target_id }, None)
                .await
                .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
                .ok_or_else(|| ApiError::not_found("Event not found"))?;

            Booking::for_event(
                auth.user_id,
                &event,
                dto.date.clone(),
                dto.people_count,
                dto.message.clone(),
                now,
            )
        }
        "guide" => {
            let guide = db.collection::<User>("users")
                .find_one(doc! { "_id": target_id }, None)
                .await
                .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
                .ok_or_else(|| ApiError::not_found("Guide not found"))?;

            let guide_id = guide.id
                .ok_or_else(|| ApiError::internal_error("Guide document missing _id"))?;

            Booking::for_guide(
                auth.user_id,
                guide_id,
                dto.date.clone(),
                dto.people_count,
                dto.message.clone(),
                now,
            )
        }
        _ => return Err(ApiError::bad_request("Invalid kind. Use 'event' or 'guide'")),
    };

    let result = db.collection::<Booking>("bookings")
        .insert_one(&booking, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create booking: {}", e)))?;

    let booking_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid booking ID"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Booking created successfully".to_string(),
        BookingResponse::from(Booking { id: Some(booking_id), ..booking }),
    )))
}

#[openapi(tag = "Booking")]
#[get("/booking/my")]
pub async fn get_my_bookings(
    db: &State<DbConn>,
    auth: AuthGuard,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let bookings = find_bookings(db, doc! { "user_id": auth.user_id }).await?;
    Ok(Json(ApiResponse::success(with_targets(db, bookings).await)))
}

/// Bookings where the caller is the target guide.
#[openapi(tag = "Booking")]
#[get("/booking/assigned")]
pub async fn get_guide_bookings(
    db: &State<DbConn>,
    auth: AuthGuard,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let bookings = find_bookings(db, doc! { "guide_id": auth.user_id }).await?;
    Ok(Json(ApiResponse::success(with_targets(db, bookings).await)))
}

#[openapi(tag = "Booking")]
#[patch("/booking/<booking_id>/status", data = "<dto>")]
pub async fn transition_booking(
    db: &State<DbConn>,
    auth: AuthGuard,
    booking_id: String,
    dto: Json<UpdateBookingStatusDto>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let object_id = ObjectId::parse_str(&booking_id)
        .map_err(|_| ApiError::bad_request("Invalid booking ID"))?;

    let new_status = BookingStatus::from_tag(&dto.status)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

    let booking = db.collection::<Booking>("bookings")
        .find_one(doc! { "_id": object_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    // Unreachable target state is a conflict even for an authorized actor;
    // an actor without the relationship/role gets forbidden instead.
    if !booking.status.can_transition_to(new_status) {
        return Err(ApiError::conflict(format!(
            "Cannot move booking from '{}' to '{}'",
            booking.status.as_tag(),
            new_status.as_tag()
        )));
    }
    if !allowed_next_states(&booking, &auth.user_id, &auth.role).contains(&new_status) {
        return Err(ApiError::forbidden("Not authorized to update this booking"));
    }

    // Compare-and-swap on the status read above, so two concurrent
    // transitions cannot both win
    let now = DateTime::now();
    let result = db.collection::<Booking>("bookings")
        .update_one(
            doc! { "_id": object_id, "status": booking.status.as_tag() },
            doc! { "$set": { "status": new_status.as_tag(), "updated_at": now } },
            None,
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update booking: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::conflict("Booking was updated concurrently, retry"));
    }

    let updated = Booking {
        status: new_status,
        updated_at: now,
        ..booking
    };

    Ok(Json(ApiResponse::success_with_message(
        "Booking updated successfully".to_string(),
        BookingResponse::from(updated),
    )))
}

async fn find_bookings(
    db: &DbConn,
    filter: mongodb::bson::Document,
) -> Result<Vec<Booking>, ApiError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    db.collection::<Booking>("bookings")
        .find(filter, find_options)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .try_collect()
        .await
        .map_err(|e| ApiError::internal_error(format!("Cursor error: {}", e)))
}

/// Joins the target's display fields (event title / guide name) onto each
/// booking. A missing target just leaves `target` empty.
async fn with_targets(db: &DbConn, bookings: Vec<Booking>) -> Vec<BookingResponse> {
    let mut responses = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let target = join_target(db, &booking).await;
        let mut response = BookingResponse::from(booking);
        response.target = target;
        responses.push(response);
    }
    responses
}

async fn join_target(db: &DbConn, booking: &Booking) -> Option<serde_json::Value> {
    match booking.kind {
        BookingKind::Event => {
            let event_id = booking.event_id?;
            let event = db.collection::<Event>("events")
                .find_one(doc! { "_id": event_id }, None)
                .await
                .ok()??;
            Some(serde_json::json!({
                "title": event.title,
                "venue": event.venue,
                "district": event.district,
                "date": event.date
            }))
        }
        BookingKind::Guide => {
            let guide_id = booking.guide_id?;
            let guide = db.collection::<User>("users")
                .find_one(doc! { "_id": guide_id }, None)
                .await
                .ok()??;
            Some(serde_json::json!({
                "name": guide.name,
                "avatar": guide.avatar
            }))
        }
    }
}
