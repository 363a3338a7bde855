use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, to_bson, DateTime};
use rocket::futures::future::join_all;
use crate::db::DbConn;
use crate::models::{
    add_to_wishlist, push_history, remove_from_wishlist, HistoryEntry, TaggedRef, User,
};
use crate::guards::AuthGuard;
use crate::services::resolver::{self, ResolverSettings};
use crate::utils::{ApiError, ApiResponse};

#[derive(serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct AddHistoryDto {
    pub item_type: String,
    pub item_id: String,
}

#[derive(serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct ToggleWishlistDto {
    pub item_type: String,
    pub item_id: String,
    pub action: String, // "add" or "remove"
}

#[openapi(tag = "Engagement")]
#[post("/engagement/history", data = "<dto>")]
pub async fn add_history(
    db: &State<DbConn>,
    auth: AuthGuard,
    dto: Json<AddHistoryDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if dto.item_type.trim().is_empty() || dto.item_id.trim().is_empty() {
        return Err(ApiError::bad_request("item_type and item_id are required"));
    }

    let user = load_user(db, &auth).await?;

    let mut history = user.history;
    push_history(
        &mut history,
        HistoryEntry {
            item_type: dto.item_type.clone(),
            item_id: dto.item_id.clone(),
            viewed_at: DateTime::now(),
        },
    );

    write_ledger(db, &auth, user.updated_at, doc! { "history": to_ledger_bson(&history)? }).await?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "History recorded"
    }))))
}

#[openapi(tag = "Engagement")]
#[post("/engagement/wishlist", data = "<dto>")]
pub async fn toggle_wishlist(
    db: &State<DbConn>,
    auth: AuthGuard,
    dto: Json<ToggleWishlistDto>,
) -> Result<Json<ApiResponse<Vec<TaggedRef>>>, ApiError> {
    if dto.item_type.trim().is_empty() || dto.item_id.trim().is_empty() {
        return Err(ApiError::bad_request("item_type and item_id are required"));
    }

    let user = load_user(db, &auth).await?;

    let mut wishlist = user.wishlist;
    let changed = match dto.action.as_str() {
        "add" => add_to_wishlist(
            &mut wishlist,
            TaggedRef {
                item_type: dto.item_type.clone(),
                item_id: dto.item_id.clone(),
            },
        ),
        "remove" => remove_from_wishlist(&mut wishlist, &dto.item_id),
        _ => return Err(ApiError::bad_request("Invalid action. Use 'add' or 'remove'")),
    };

    // Re-adding an existing item or removing an absent one is a no-op,
    // not an error
    if changed {
        write_ledger(db, &auth, user.updated_at, doc! { "wishlist": to_ledger_bson(&wishlist)? })
            .await?;
    }

    Ok(Json(ApiResponse::success(wishlist)))
}

/// The caller's wishlist and history, each entry enriched with its target's
/// display projection (`details` is null for stale references). Lookups are
/// independent and run concurrently.
#[openapi(tag = "Engagement")]
#[get("/engagement")]
pub async fn get_engagement(
    db: &State<DbConn>,
    settings: &State<ResolverSettings>,
    auth: AuthGuard,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let user = load_user(db, &auth).await?;
    let deadline = settings.deadline;

    let wishlist_details = join_all(
        user.wishlist
            .iter()
            .map(|r| resolver::resolve_with_deadline(db, &r.item_type, &r.item_id, deadline)),
    )
    .await;

    let history_details = join_all(
        user.history
            .iter()
            .map(|r| resolver::resolve_with_deadline(db, &r.item_type, &r.item_id, deadline)),
    )
    .await;

    let wishlist: Vec<serde_json::Value> = user
        .wishlist
        .iter()
        .zip(wishlist_details)
        .map(|(entry, resolved)| {
            serde_json::json!({
                "item_type": entry.item_type,
                "item_id": entry.item_id,
                "details": resolved.into_option()
            })
        })
        .collect();

    let history: Vec<serde_json::Value> = user
        .history
        .iter()
        .zip(history_details)
        .map(|(entry, resolved)| {
            serde_json::json!({
                "item_type": entry.item_type,
                "item_id": entry.item_id,
                "viewed_at": entry.viewed_at,
                "details": resolved.into_option()
            })
        })
        .collect();

    Ok(Json(ApiResponse::success(serde_json::json!({
        "wishlist": wishlist,
        "history": history
    }))))
}

async fn load_user(db: &DbConn, auth: &AuthGuard) -> Result<User, ApiError> {
    db.collection::<User>("users")
        .find_one(doc! { "_id": auth.user_id }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

fn to_ledger_bson<T: serde::Serialize>(list: &T) -> Result<mongodb::bson::Bson, ApiError> {
    to_bson(list).map_err(|e| ApiError::internal_error(format!("Serialization error: {}", e)))
}

/// Writes a ledger list back with a compare-and-swap on the snapshot's
/// `updated_at`, so concurrent ledger writes for the same user cannot lose
/// updates to a blind overwrite.
async fn write_ledger(
    db: &DbConn,
    auth: &AuthGuard,
    snapshot_updated_at: DateTime,
    fields: mongodb::bson::Document,
) -> Result<(), ApiError> {
    let mut update_doc = fields;
    update_doc.insert("updated_at", DateTime::now());

    let result = db.collection::<User>("users")
        .update_one(
            doc! { "_id": auth.user_id, "updated_at": snapshot_updated_at },
            doc! { "$set": update_doc },
            None,
        )
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to update ledger: {}", e)))?;

    if result.matched_count == 0 {
        return Err(ApiError::conflict("Profile was updated concurrently, retry"));
    }

    Ok(())
}
