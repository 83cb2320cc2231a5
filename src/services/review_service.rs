//! Product reviews: one per customer and product, published once approved.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, ModerateReviewRequest, ReviewList},
    entity::{
        Customers, ProductReviews,
        product_reviews::{self, Column as ReviewCol},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ProductRating, Review},
    response::{ApiResponse, Meta},
    routes::params::ReviewQuery,
    services::inventory_service,
    state::AppState,
};

const MAX_TITLE_LEN: usize = 100;

/// Mean of `ratings` to one decimal place, half away from zero.
fn average_rating(ratings: &[i32]) -> Option<Decimal> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = Decimal::from(sum) / Decimal::from(ratings.len());
    Some(mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Approved reviews, newest first, optionally for a single product.
pub async fn list_reviews(
    state: &AppState,
    query: ReviewQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = ProductReviews::find().filter(ReviewCol::IsApproved.eq(true));
    if let Some(product_id) = query.product_id {
        finder = finder.filter(ReviewCol::ProductId.eq(product_id));
    }
    let finder = finder
        .order_by_desc(ReviewCol::CreatedAt)
        .order_by_asc(ReviewCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .find_also_related(Customers)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(review, customer)| Review::new(review, customer.as_ref()))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

/// Records the caller's review. It stays hidden until approved.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }

    inventory_service::get_product(&state.orm, payload.product_id).await?;
    let customer = Customers::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    let now = Utc::now().fixed_offset();
    let inserted = product_reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        customer_id: Set(customer.id),
        rating: Set(payload.rating),
        title: Set(title.to_string()),
        comment: Set(payload.comment),
        is_approved: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await;

    let review = match inserted {
        Ok(review) => review,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::conflict("You have already reviewed this product"));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        review_id = %review.id,
        product_id = %review.product_id,
        rating = review.rating,
        "review submitted"
    );
    Ok(ApiResponse::single(
        "Review submitted for moderation",
        Review::new(review, Some(&customer)),
    ))
}

pub async fn moderate_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ModerateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    ensure_admin(user)?;

    let (review, customer) = ProductReviews::find_by_id(id)
        .find_also_related(Customers)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;

    let mut active: product_reviews::ActiveModel = review.into();
    active.is_approved = Set(payload.is_approved);
    active.updated_at = Set(Utc::now().fixed_offset());
    let review = active.update(&state.orm).await?;

    tracing::info!(
        review_id = %review.id,
        approved = review.is_approved,
        admin_id = %user.user_id,
        "review moderated"
    );
    Ok(ApiResponse::single(
        "Review updated",
        Review::new(review, customer.as_ref()),
    ))
}

/// Average rating and count over the product's approved reviews.
pub async fn product_rating(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<ProductRating>> {
    inventory_service::get_product(&state.orm, product_id).await?;

    let ratings: Vec<i32> = ProductReviews::find()
        .select_only()
        .column(ReviewCol::Rating)
        .filter(ReviewCol::ProductId.eq(product_id))
        .filter(ReviewCol::IsApproved.eq(true))
        .into_tuple()
        .all(&state.orm)
        .await?;

    let rating = ProductRating {
        product_id,
        average_rating: average_rating(&ratings),
        review_count: ratings.len() as i64,
    };
    Ok(ApiResponse::single("Product rating", rating))
}
