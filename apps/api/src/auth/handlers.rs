use axum::{extract::State, Json};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::{
    normalize_email, AuthResponse, LoginRequest, SignupRequest, UpdateProfileRequest, User,
};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Name, email, and password are required".to_string(),
        ));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = User::new(&req.name, &req.email, password_hash);
    state.users.create(&user).await?;

    info!(user_id = %user.user_id, email = %user.email, "User created");
    Ok(Json(AuthResponse {
        message: "User created successfully".to_string(),
        user: user.profile(),
    }))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.trim().is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        info!(email = %normalize_email(&req.email), "Login rejected: unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(req.password, user.password_hash.clone()).await? {
        info!(user_id = %user.user_id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.user_id, "User logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: user.profile(),
    }))
}

/// PUT /auth/update-profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("UserId is required.".to_string()));
    }

    let mut user = state
        .users
        .get(&req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    let name = req.name.trim();
    if !name.is_empty() {
        user.name = name.to_string();
    }
    if let Some(url) = req.profile_image_url {
        let url = url.trim();
        user.profile_image_url = (!url.is_empty()).then(|| url.to_string());
    }

    state.users.update(&user).await?;
    info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(AuthResponse {
        message: "Profile updated successfully".to_string(),
        user: user.profile(),
    }))
}
