use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, to_bson, DateTime, Document};
use mongodb::bson::oid::ObjectId;
use crate::db::DbConn;
use crate::models::{CreateReviewDto, Hotel, Location, Review, User};
use crate::guards::AuthGuard;
use crate::services::reviews::{append_review, ReviewError};
use crate::utils::{ApiError, ApiResponse, validate_rating};

/// Appends a review to a reviewable content document. Hotels and locations
/// share the same aggregation rule; packages and events have no review flow.
#[openapi(tag = "Review")]
#[post("/review/<kind>/<content_id>", data = "<dto>")]
pub async fn create_review(
    db: &State<DbConn>,
    auth: AuthGuard,
    kind: String,
    content_id: String,
    dto: Json<CreateReviewDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    // Validate rating
    if !validate_rating(dto.rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 5"));
    }

    let object_id = ObjectId::parse_str(&content_id)
        .map_err(|_| ApiError::bad_request("Invalid content ID"))?;

    // Reviewer name is snapshotted onto the review at append time
    let reviewer = db.collection::<User>("users")
        .find_one(doc! { "_id": auth.user_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let (collection, mut reviews, num_reviews) = match kind.as_str() {
        "hotel" => {
            let hotel = db.collection::<Hotel>("hotels")
                .find_one(doc! { "_id": object_id }, None)
                .await
                .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
                .ok_or_else(|| ApiError::not_found("Hotel not found"))?;
            ("hotels", hotel.reviews, hotel.num_reviews)
        }
        "location" => {
            let location = db.collection::<Location>("locations")
                .find_one(doc! { "_id": object_id }, None)
                .await
                .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
                .ok_or_else(|| ApiError::not_found("Location not found"))?;
            ("locations", location.reviews, location.num_reviews)
        }
        _ => {
            return Err(ApiError::bad_request(
                "Reviews are supported for 'hotel' and 'location' only",
            ))
        }
    };

    let (review, totals) =
        append_review(&mut reviews, auth.user_id, &reviewer.name, dto.rating, &dto.comment)
            .map_err(|err| match err {
                ReviewError::Duplicate => ApiError::conflict("You have already reviewed this item"),
            })?;

    // One atomic write of reviews plus both derived fields, keyed on the
    // review count read above; a racing append loses the swap
    let reviews_bson = to_bson(&reviews)
        .map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))?;

    let result = db.collection::<Document>(collection)
        .update_one(
            doc! { "_id": object_id, "num_reviews": num_reviews },
            doc! {
                "$set": {
                    "reviews": reviews_bson,
                    "rating": totals.rating,
                    "num_reviews": totals.num_reviews,
                    "updated_at": DateTime::now()
                }
            },
            None,
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to save review: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::conflict("Reviews changed concurrently, retry"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "Review submitted successfully".to_string(),
        serde_json::json!({
            "review": review_json(&review),
            "rating": totals.rating,
            "num_reviews": totals.num_reviews
        }),
    )))
}

fn review_json(review: &Review) -> serde_json::Value {
    serde_json::json!({
        "user_id": review.user_id.map(|id| id.to_hex()),
        "user_name": review.user_name,
        "rating": review.rating,
        "comment": review.comment,
        "created_at": review.created_at
    })
}
