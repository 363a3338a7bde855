use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use mongodb::bson::{doc, DateTime};
use mongodb::bson::oid::ObjectId;
use crate::db::DbConn;
use crate::models::{LoginDto, RegisterDto, Role, User, UserResponse};
use crate::services::JwtService;
use crate::utils::{ApiError, ApiResponse, validate_email};

#[openapi(tag = "Auth")]
#[post("/auth/register", data = "<dto>")]
pub async fn register(
    db: &State<DbConn>,
    dto: Json<RegisterDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    // Validate inputs
    if !validate_email(&dto.email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if dto.password.len() < 6 {
        return Err(ApiError::bad_request("Password must be at least 6 characters"));
    }
    if dto.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    // Self-registration only grants user or guide; admin roles are assigned
    // out of band
    let role = match dto.role.as_deref().unwrap_or("user") {
        "user" => Role::User,
        "guide" => Role::Guide,
        _ => return Err(ApiError::bad_request("Invalid role. Use 'user' or 'guide'")),
    };

    let existing = db.collection::<User>("users")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?;

    if existing.is_some() {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let password_hash = bcrypt::hash(&dto.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal_error(format!("Failed to hash password: {}", e)))?;

    let now = DateTime::now();
    let user = User {
        id: None,
        name: dto.name.trim().to_string(),
        email: dto.email.clone(),
        password_hash,
        role,
        avatar: None,
        wishlist: Vec::new(),
        history: Vec::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let result = db.collection::<User>("users")
        .insert_one(&user, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to create user: {}", e)))?;

    let user_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal_error("Invalid user ID"))?;

    let access_token = JwtService::generate_access_token(&user_id, role)
        .map_err(|e| ApiError::internal_error(format!("Failed to issue token: {}", e)))?;
    let refresh_token = JwtService::generate_refresh_token(&user_id, role)
        .map_err(|e| ApiError::internal_error(format!("Failed to issue token: {}", e)))?;

    let user_response = UserResponse::from(User { id: Some(user_id), ..user });

    Ok(Json(ApiResponse::success_with_message(
        "Account created successfully".to_string(),
        serde_json::json!({
            "user": user_response,
            "access_token": access_token,
            "refresh_token": refresh_token
        }),
    )))
}

#[openapi(tag = "Auth")]
#[post("/auth/login", data = "<dto>")]
pub async fn login(
    db: &State<DbConn>,
    dto: Json<LoginDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let user = db.collection::<User>("users")
        .find_one(doc! { "email": &dto.email }, None)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = bcrypt::verify(&dto.password, &user.password_hash)
        .map_err(|e| ApiError::internal_error(format!("Failed to verify password: {}", e)))?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    if !user.is_active {
        return Err(ApiError::forbidden("Account is deactivated"));
    }

    let user_id = user.id
        .ok_or_else(|| ApiError::internal_error("User document missing _id"))?;
    let role = user.role;

    let access_token = JwtService::generate_access_token(&user_id, role)
        .map_err(|e| ApiError::internal_error(format!("Failed to issue token: {}", e)))?;
    let refresh_token = JwtService::generate_refresh_token(&user_id, role)
        .map_err(|e| ApiError::internal_error(format!("Failed to issue token: {}", e)))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "user": UserResponse::from(user),
        "access_token": access_token,
        "refresh_token": refresh_token
    }))))
}

#[derive(serde::Deserialize, rocket_okapi::okapi::schemars::JsonSchema)]
pub struct RefreshTokenDto {
    pub refresh_token: String,
}

#[openapi(tag = "Auth")]
#[post("/auth/refresh", data = "<dto>")]
pub async fn refresh_token(
    dto: Json<RefreshTokenDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let claims = JwtService::verify_token(&dto.refresh_token, true)
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;
    let role = Role::from_tag(&claims.role)
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    let access_token = JwtService::generate_access_token(&user_id, role)
        .map_err(|e| ApiError::internal_error(format!("Failed to issue token: {}", e)))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "access_token": access_token
    }))))
}
