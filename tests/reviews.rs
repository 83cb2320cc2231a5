mod common;

use chrono::{Duration, Utc};
use common::*;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use storefront_api::{
    dto::reviews::{CreateReviewRequest, ModerateReviewRequest},
    entity::{ProductReviews, product_reviews},
    error::AppError,
    routes::params::ReviewQuery,
    services::review_service,
};
use uuid::Uuid;

fn review(product_id: Uuid, rating: i32, title: &str) -> CreateReviewRequest {
    CreateReviewRequest {
        product_id,
        rating,
        title: title.into(),
        comment: "Bought it for the office.".into(),
    }
}

#[tokio::test]
async fn reviews_are_validated_and_unique_per_customer() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let kettle = create_product(&state, "Kettle", dec!(45.00), 5).await?;

    for bad in [review(kettle.id, 0, "Meh"), review(kettle.id, 6, "Wow"), review(kettle.id, 3, "  ")] {
        let err = review_service::create_review(&state, &buyer, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err:?}");
    }
    let long_title = "x".repeat(101);
    let err = review_service::create_review(&state, &buyer, review(kettle.id, 3, &long_title))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = review_service::create_review(&state, &buyer, review(Uuid::new_v4(), 3, "Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let created = review_service::create_review(&state, &buyer, review(kettle.id, 4, " Boils fast "))
        .await?
        .data
        .expect("review");
    assert_eq!(created.customer_id, buyer.user_id);
    assert_eq!(created.customer_name, "Amina Otieno");
    assert_eq!(created.title, "Boils fast");
    assert!(!created.is_approved);

    let err = review_service::create_review(&state, &buyer, review(kettle.id, 5, "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn only_approved_reviews_are_listed_and_rated() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let admin = admin(&state).await?;
    let first = customer(&state, "first@example.com").await?;
    let second = customer(&state, "second@example.com").await?;
    let kettle = create_product(&state, "Kettle", dec!(45.00), 5).await?;
    let toaster = create_product(&state, "Toaster", dec!(60.00), 5).await?;

    let older = review_service::create_review(&state, &first, review(kettle.id, 4, "Solid"))
        .await?
        .data
        .expect("review");
    let newer = review_service::create_review(&state, &second, review(kettle.id, 5, "Great"))
        .await?
        .data
        .expect("review");
    review_service::create_review(&state, &first, review(toaster.id, 1, "Burnt"))
        .await?;

    let stored = ProductReviews::find_by_id(older.id)
        .one(&state.orm)
        .await?
        .expect("stored review");
    let mut active: product_reviews::ActiveModel = stored.into();
    active.created_at = Set((Utc::now() - Duration::hours(1)).fixed_offset());
    active.update(&state.orm).await?;

    let hidden = review_service::list_reviews(&state, ReviewQuery::default()).await?;
    assert!(hidden.data.expect("reviews").items.is_empty());
    let rating = review_service::product_rating(&state, kettle.id)
        .await?
        .data
        .expect("rating");
    assert_eq!(rating.average_rating, None);
    assert_eq!(rating.review_count, 0);

    let err = review_service::moderate_review(
        &state,
        &first,
        older.id,
        ModerateReviewRequest { is_approved: true },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    for id in [older.id, newer.id] {
        let approved = review_service::moderate_review(
            &state,
            &admin,
            id,
            ModerateReviewRequest { is_approved: true },
        )
        .await?
        .data
        .expect("review");
        assert!(approved.is_approved);
    }

    let listed = review_service::list_reviews(
        &state,
        ReviewQuery {
            product_id: Some(kettle.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.as_ref().and_then(|m| m.total), Some(2));
    let titles: Vec<_> = listed
        .data
        .expect("reviews")
        .items
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, ["Great", "Solid"]);

    let rating = review_service::product_rating(&state, kettle.id)
        .await?
        .data
        .expect("rating");
    assert_eq!(rating.average_rating, Some(dec!(4.5)));
    assert_eq!(rating.review_count, 2);

    let toaster_reviews = review_service::list_reviews(
        &state,
        ReviewQuery {
            product_id: Some(toaster.id),
            ..Default::default()
        },
    )
    .await?;
    assert!(toaster_reviews.data.expect("reviews").items.is_empty());

    let err = review_service::moderate_review(
        &state,
        &admin,
        Uuid::new_v4(),
        ModerateReviewRequest { is_approved: true },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = review_service::product_rating(&state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}
