//! Authentication Handlers
//!
//! Handles registration, login and the current-user lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Serialize;

use shared::client::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

use crate::AppError;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, UserCreate};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
}

/// Register handler
///
/// Creates a CUSTOMER account with an empty cart and returns a session
/// token right away.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_required_text(&req.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "lastName", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let user = state
        .user_repository()
        .create(UserCreate {
            email: req.email.trim().to_lowercase(),
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            role: Role::Customer,
        })
        .await?;

    // The cart exists from the first moment, like the rest of the account
    if let Some(user_id) = user.id.clone() {
        if let Err(e) = state.cart_repository().get_or_create(&user_id).await {
            tracing::warn!(error = %e, "Failed to create cart for new user");
        }
    }

    let token = state
        .get_jwt_service()
        .generate_token(&user.id_string(), &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user.id_string(),
        email = %user.email,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.to_info(),
        }),
    ))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. The error is the
/// same for unknown emails and wrong passwords to prevent account
/// enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Missing credentials"));
    }

    let user = state
        .user_repository()
        .find_by_email(&req.email.trim().to_lowercase())
        .await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = verify_password(&req.password, &u.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .get_jwt_service()
        .generate_token(&user.id_string(), &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user.id_string(),
        email = %user.email,
        role = %user.role,
        "User logged in"
    );

    Ok(Json(AuthResponse {
        token,
        user: user.to_info(),
    }))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<MeResponse>, AppError> {
    // Query fresh data; loyalty points may have moved since the token
    // was issued
    let fresh = state
        .user_repository()
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(MeResponse {
        user: fresh.to_info(),
    }))
}
