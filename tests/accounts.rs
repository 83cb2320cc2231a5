mod common;

use common::*;
use storefront_api::{
    dto::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest},
    entity::status::CustomerRole,
    error::AppError,
    middleware::auth::decode_token,
    services::auth_service,
};

fn registration(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: password.into(),
        first_name: "Wanjiru".into(),
        last_name: "Kamau".into(),
        phone_number: "+254711000111".into(),
        address: "4 Tom Mboya Street".into(),
        city: "Nairobi".into(),
        country: "Kenya".into(),
    }
}

#[tokio::test]
async fn register_then_login_issues_a_customer_token() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;

    let created = auth_service::register_user(
        &state,
        registration(" Wanjiru@Example.com ", "correct-horse"),
    )
    .await?
    .data
    .expect("customer");
    assert_eq!(created.email, "wanjiru@example.com");
    assert_eq!(created.role, CustomerRole::Customer);

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "wanjiru@example.com".into(),
            password: "correct-horse".into(),
        },
    )
    .await?
    .data
    .expect("token");

    let token = login.token.strip_prefix("Bearer ").expect("bearer prefix");
    let user = decode_token(token, &state.config.jwt_secret)?;
    assert_eq!(user.user_id, created.id);
    assert!(!user.is_admin());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_and_duplicates_are_rejected() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    auth_service::register_user(&state, registration("dup@example.com", "long-enough")).await?;

    let err = auth_service::register_user(&state, registration("DUP@example.com", "long-enough"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = auth_service::register_user(&state, registration("short@example.com", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "dup@example.com".into(),
            password: "wrong-password".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "nobody@example.com".into(),
            password: "long-enough".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn profile_updates_are_partial() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;

    let updated = auth_service::update_profile(
        &state,
        &buyer,
        UpdateProfileRequest {
            city: Some("Eldoret".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("customer");
    assert_eq!(updated.city, "Eldoret");
    assert_eq!(updated.address, "12 Moi Avenue");

    let profile = auth_service::get_profile(&state, &buyer)
        .await?
        .data
        .expect("customer");
    assert_eq!(profile.city, "Eldoret");
    Ok(())
}

fn password_change(current: &str, new: &str, confirm: &str) -> ChangePasswordRequest {
    ChangePasswordRequest {
        current_password: current.into(),
        new_password: new.into(),
        new_password_confirm: confirm.into(),
    }
}

#[tokio::test]
async fn password_change_requires_the_current_password() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let created = auth_service::register_user(&state, registration("pw@example.com", "first-secret"))
        .await?
        .data
        .expect("customer");
    let user = storefront_api::middleware::auth::AuthUser {
        user_id: created.id,
        role: created.role,
    };

    let err = auth_service::change_password(
        &state,
        &user,
        password_change("wrong-secret", "second-secret", "second-secret"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Current password is incorrect"));

    let err = auth_service::change_password(
        &state,
        &user,
        password_change("first-secret", "second-secret", "second-secrex"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "New passwords do not match"));

    let err = auth_service::change_password(
        &state,
        &user,
        password_change("first-secret", "short", "short"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let changed = auth_service::change_password(
        &state,
        &user,
        password_change("first-secret", "second-secret", "second-secret"),
    )
    .await?;
    assert_eq!(changed.message, "Password changed successfully");

    let login = |password: &str| LoginRequest {
        email: "pw@example.com".into(),
        password: password.into(),
    };
    let err = auth_service::login_user(&state, login("first-secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    auth_service::login_user(&state, login("second-secret")).await?;
    Ok(())
}
