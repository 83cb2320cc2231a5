use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::{
        ChangePasswordRequest, Claims, LoginRequest, LoginResponse, RegisterRequest,
        UpdateProfileRequest,
    },
    entity::{
        Customers,
        customers::{self, Column as CustomerCol},
        status::CustomerRole,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Customer,
    response::ApiResponse,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Signs an HS256 token for `customer` valid for the configured TTL.
pub fn issue_token(config: &AppConfig, customer_id: Uuid, role: CustomerRole) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.jwt_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: customer_id.to_string(),
        role: role.as_str().to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation("A valid email address is required"));
    }
    Ok(email)
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Customer>> {
    let email = normalize_email(&payload.email)?;
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }

    let exists = Customers::find()
        .filter(CustomerCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::validation("Email is already taken"));
    }

    let now = Utc::now().fixed_offset();
    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(CustomerRole::Customer),
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        phone_number: Set(payload.phone_number),
        address: Set(payload.address),
        city: Set(payload.city),
        country: Set(payload.country),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(customer_id = %customer.id, "customer registered");
    Ok(ApiResponse::single("Customer created", customer.into()))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let email = payload.email.trim().to_lowercase();
    let customer = Customers::find()
        .filter(CustomerCol::Email.eq(email))
        .one(&state.orm)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &customer.password_hash)? {
        return Err(invalid());
    }

    let token = issue_token(&state.config, customer.id, customer.role)?;
    Ok(ApiResponse::single(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {token}"),
        },
    ))
}

async fn find_customer(state: &AppState, user: &AuthUser) -> AppResult<customers::Model> {
    Customers::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Customer>> {
    let customer = find_customer(state, user).await?;
    Ok(ApiResponse::single("Profile", customer.into()))
}

/// Updates contact data for future orders; placed orders keep their copy.
pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Customer>> {
    let customer = find_customer(state, user).await?;

    let mut active: customers::ActiveModel = customer.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(country) = payload.country {
        active.country = Set(country);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let customer = active.update(&state.orm).await?;

    Ok(ApiResponse::single("Profile updated", customer.into()))
}

/// Replaces the caller's password after checking the current one.
///
/// Tokens already issued stay valid until they expire.
pub async fn change_password(
    state: &AppState,
    user: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let customer = find_customer(state, user).await?;

    if !verify_password(&payload.current_password, &customer.password_hash)? {
        return Err(AppError::validation("Current password is incorrect"));
    }
    if payload.new_password != payload.new_password_confirm {
        return Err(AppError::validation("New passwords do not match"));
    }
    if payload.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let mut active: customers::ActiveModel = customer.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    active.updated_at = Set(Utc::now().fixed_offset());
    let customer = active.update(&state.orm).await?;

    tracing::info!(customer_id = %customer.id, "password changed");
    Ok(ApiResponse::single(
        "Password changed successfully",
        serde_json::json!({}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Jane@Example.COM ").unwrap(),
            "jane@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let config = AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
            jwt_ttl_hours: 1,
            admin_email: "admin@localhost".into(),
            cart_retention_days: 30,
        };
        let id = Uuid::new_v4();
        let token = issue_token(&config, id, CustomerRole::Admin).unwrap();
        let user = crate::middleware::auth::decode_token(&token, "test-secret").unwrap();
        assert_eq!(user.user_id, id);
        assert!(user.is_admin());

        assert!(crate::middleware::auth::decode_token(&token, "other-secret").is_err());
    }
}
