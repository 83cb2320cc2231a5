mod common;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::*;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use storefront_api::{
    dto::orders::{OrderItemRequest, PlaceOrderRequest},
    entity::{
        CartItems, Carts, Orders, carts, orders,
        status::{OrderStatus, ProductStatus},
    },
    error::AppError,
    routes::params::{LowStockQuery, SalesReportQuery},
    services::{admin_service, cart_service, housekeeping_service, order_service},
};
use uuid::Uuid;

#[tokio::test]
async fn stale_carts_are_removed_with_their_items() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let idle = customer(&state, "idle@example.com").await?;
    let busy = customer(&state, "busy@example.com").await?;
    let soap = create_product(&state, "Soap", dec!(2.00), 20).await?;

    add_to_cart(&state, &idle, soap.id, 2).await?;
    add_to_cart(&state, &busy, soap.id, 1).await?;

    let stale = cart_service::find_cart(&state.orm, idle.user_id)
        .await?
        .expect("cart");
    let mut active: carts::ActiveModel = stale.into();
    active.updated_at = Set((Utc::now() - Duration::days(45)).fixed_offset());
    active.update(&state.orm).await?;

    let removed = housekeeping_service::cleanup_abandoned_carts(&state.orm, 30).await?;
    assert_eq!(removed, 1);
    assert_eq!(Carts::find().count(&state.orm).await?, 1);
    assert_eq!(CartItems::find().count(&state.orm).await?, 1);
    assert!(cart_service::find_cart(&state.orm, idle.user_id).await?.is_none());
    assert_eq!(stock_of(&state, soap.id).await?, 20);

    let removed = housekeeping_service::cleanup_abandoned_carts(&state.orm, 30).await?;
    assert_eq!(removed, 0);
    Ok(())
}

#[tokio::test]
async fn low_stock_alerts_cover_active_products_at_minimum() -> anyhow::Result<()> {
    let (state, recorder) = setup_state().await?;
    let admin = admin(&state).await?;
    create_product_with(&state, "Batteries", dec!(5.00), 2, 5, ProductStatus::Active).await?;
    create_product_with(&state, "Bulbs", dec!(3.00), 5, 5, ProductStatus::Active).await?;
    create_product_with(&state, "Fuses", dec!(1.00), 9, 5, ProductStatus::Active).await?;
    create_product_with(&state, "Old Stock", dec!(1.00), 0, 5, ProductStatus::Discontinued).await?;

    let alerts = housekeeping_service::check_low_stock(&state).await?;
    let names: Vec<_> = alerts.iter().map(|a| a.product_name.as_str()).collect();
    assert_eq!(names, ["Batteries", "Bulbs"]);

    assert!(eventually(|| recorder.alerts().len() == 2).await);

    let listed = admin_service::list_low_stock(&state, &admin, LowStockQuery::default())
        .await?
        .data
        .expect("products");
    assert_eq!(listed.items.len(), 3);
    assert!(listed.items.iter().all(|p| p.is_low_stock));

    let below_three = admin_service::list_low_stock(
        &state,
        &admin,
        LowStockQuery {
            threshold: Some(3),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("products");
    let names: Vec<_> = below_three.items.into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Old Stock", "Batteries"]);
    Ok(())
}

#[tokio::test]
async fn out_of_range_retention_is_rejected() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let idle = customer(&state, "idle@example.com").await?;
    let soap = create_product(&state, "Soap", dec!(2.00), 20).await?;
    add_to_cart(&state, &idle, soap.id, 1).await?;

    for days in [i64::MAX, 0, -5] {
        let err = housekeeping_service::cleanup_abandoned_carts(&state.orm, days)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{days}: {err:?}");
    }
    assert_eq!(Carts::find().count(&state.orm).await?, 1);
    Ok(())
}

/// Places an order for `quantity` lamps, then backdates it with `status`.
async fn sold_order(
    state: &storefront_api::state::AppState,
    buyer: &storefront_api::middleware::auth::AuthUser,
    product_id: Uuid,
    quantity: i32,
    status: OrderStatus,
    created_at: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    let placed = order_service::place_order(
        state,
        buyer,
        PlaceOrderRequest::from_items(vec![OrderItemRequest {
            product_id,
            quantity,
        }]),
    )
    .await?
    .data
    .expect("order detail");
    let stored = Orders::find_by_id(placed.order.id)
        .one(&state.orm)
        .await?
        .expect("stored order");
    let mut active: orders::ActiveModel = stored.into();
    active.status = Set(status);
    active.created_at = Set(created_at.fixed_offset());
    active.update(&state.orm).await?;
    Ok(())
}

#[tokio::test]
async fn daily_sales_report_counts_sold_orders_of_that_day() -> anyhow::Result<()> {
    let (state, recorder) = setup_state().await?;
    let admin = admin(&state).await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let lamp = create_product(&state, "Lamp", dec!(100.00), 50).await?;

    let day = NaiveDate::from_ymd_opt(2025, 3, 14).expect("date");
    let morning = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2025, 3, 14, 21, 15, 0).unwrap();
    let night_before = Utc.with_ymd_and_hms(2025, 3, 13, 23, 59, 59).unwrap();

    sold_order(&state, &buyer, lamp.id, 1, OrderStatus::Confirmed, morning).await?;
    sold_order(&state, &buyer, lamp.id, 2, OrderStatus::Delivered, evening).await?;
    sold_order(&state, &buyer, lamp.id, 1, OrderStatus::Pending, morning).await?;
    sold_order(&state, &buyer, lamp.id, 3, OrderStatus::Cancelled, evening).await?;
    sold_order(&state, &buyer, lamp.id, 4, OrderStatus::Shipped, night_before).await?;

    let report = housekeeping_service::send_daily_sales_report(&state, day).await?;
    assert_eq!(report.date, day);
    assert_eq!(report.total_orders, 2);
    assert_eq!(cents(report.total_revenue), dec!(348.00));
    assert_eq!(cents(report.average_order_value), dec!(174.00));
    let breakdown: Vec<_> = report
        .status_breakdown
        .iter()
        .map(|entry| (entry.status, entry.count))
        .collect();
    assert_eq!(
        breakdown,
        [(OrderStatus::Confirmed, 1), (OrderStatus::Delivered, 1)]
    );
    assert!(eventually(|| recorder.reports().len() == 1).await);

    let quiet = housekeeping_service::daily_sales_report(&state.orm, day - Duration::days(2)).await?;
    assert_eq!(quiet.total_orders, 0);
    assert_eq!(quiet.average_order_value, dec!(0));
    assert!(quiet.status_breakdown.is_empty());

    let via_admin = admin_service::daily_sales_report(
        &state,
        &admin,
        SalesReportQuery { date: Some(day) },
    )
    .await?
    .data
    .expect("report");
    assert_eq!(via_admin.total_orders, 2);

    let err = admin_service::daily_sales_report(&state, &buyer, SalesReportQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}
