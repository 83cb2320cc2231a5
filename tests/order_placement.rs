mod common;

use std::sync::Arc;

use common::*;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
use storefront_api::{
    dto::{
        auth::UpdateProfileRequest,
        orders::{OrderItemRequest, PlaceOrderRequest, ShippingAddressOverride},
        products::UpdateProductRequest,
    },
    entity::{
        OrderItems, OrderStatusHistory, Orders, products,
        status::{OrderStatus, PaymentStatus, ProductStatus},
    },
    error::AppError,
    services::{auth_service, cart_service, order_service, product_service},
};

#[tokio::test]
async fn cart_checkout_computes_totals_and_reserves_stock() -> anyhow::Result<()> {
    let (state, recorder) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let keyboard = create_product(&state, "Keyboard", dec!(150.00), 10).await?;
    let mouse = create_product(&state, "Mouse", dec!(80.00), 5).await?;

    add_to_cart(&state, &buyer, keyboard.id, 2).await?;
    add_to_cart(&state, &buyer, mouse.id, 1).await?;

    let placed = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_cart())
        .await?
        .data
        .expect("order detail");

    let order = &placed.order;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(cents(order.subtotal), dec!(380.00));
    assert_eq!(cents(order.tax_amount), dec!(60.80));
    assert_eq!(cents(order.shipping_cost), dec!(0.00));
    assert_eq!(cents(order.discount_amount), dec!(0.00));
    assert_eq!(cents(order.total_amount), dec!(440.80));
    assert_eq!(placed.item_count, 3);
    assert_eq!(placed.items.len(), 2);

    assert_eq!(placed.status_history.len(), 1);
    assert_eq!(placed.status_history[0].status, OrderStatus::Pending);
    assert_eq!(placed.status_history[0].comment, "Order created");
    assert_eq!(placed.status_history[0].created_by, Some(buyer.user_id));

    assert_eq!(stock_of(&state, keyboard.id).await?, 8);
    assert_eq!(stock_of(&state, mouse.id).await?, 4);

    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.item_count, 0);

    assert!(eventually(|| recorder.placed().len() == 1).await);
    let snapshot = &recorder.placed()[0];
    assert_eq!(snapshot.order_number, order.order_number);
    assert_eq!(snapshot.customer_email, "buyer@example.com");
    assert_eq!(snapshot.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn explicit_items_leave_the_cart_alone() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let lamp = create_product(&state, "Lamp", dec!(25.50), 4).await?;
    let rug = create_product(&state, "Rug", dec!(99.99), 2).await?;
    add_to_cart(&state, &buyer, rug.id, 1).await?;

    let placed = order_service::place_order(
        &state,
        &buyer,
        PlaceOrderRequest::from_items(vec![OrderItemRequest {
            product_id: lamp.id,
            quantity: 3,
        }]),
    )
    .await?
    .data
    .expect("order detail");

    assert_eq!(cents(placed.order.subtotal), dec!(76.50));
    assert_eq!(cents(placed.order.tax_amount), dec!(12.24));
    assert_eq!(cents(placed.order.total_amount), dec!(88.74));
    assert_eq!(stock_of(&state, lamp.id).await?, 1);

    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product.id, rug.id);
    Ok(())
}

#[tokio::test]
async fn failed_checkout_changes_nothing() -> anyhow::Result<()> {
    let (state, recorder) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let plenty = create_product(&state, "Plenty", dec!(10.00), 10).await?;
    let scarce = create_product(&state, "Scarce", dec!(20.00), 3).await?;

    add_to_cart(&state, &buyer, plenty.id, 2).await?;
    add_to_cart(&state, &buyer, scarce.id, 3).await?;

    // Someone else buys the last units after they were carted.
    let mut active: products::ActiveModel = scarce.clone().into();
    active.stock_quantity = Set(1);
    active.update(&state.orm).await?;

    let err = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_cart())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("Scarce")));

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert_eq!(OrderItems::find().count(&state.orm).await?, 0);
    assert_eq!(OrderStatusHistory::find().count(&state.orm).await?, 0);
    assert_eq!(stock_of(&state, plenty.id).await?, 10);
    assert_eq!(stock_of(&state, scarce.id).await?, 1);

    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(recorder.placed().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_or_missing_cart_is_rejected() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;

    let err = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_cart())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    cart_service::get_cart(&state, &buyer).await?;
    let err = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_cart())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Cart is empty"));
    Ok(())
}

#[tokio::test]
async fn explicit_item_lists_are_validated() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let active = create_product(&state, "Active", dec!(5.00), 2).await?;
    let retired = create_product_with(
        &state,
        "Retired",
        dec!(5.00),
        10,
        0,
        ProductStatus::Discontinued,
    )
    .await?;

    let item = |product_id, quantity| OrderItemRequest {
        product_id,
        quantity,
    };
    let cases = vec![
        vec![],
        vec![item(active.id, 0)],
        vec![item(active.id, 1), item(active.id, 1)],
        vec![item(retired.id, 1)],
        vec![item(active.id, 3)],
        vec![item(uuid::Uuid::new_v4(), 1)],
    ];

    for items in cases {
        let err = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_items(items))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    }

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert_eq!(stock_of(&state, active.id).await?, 2);
    Ok(())
}

#[tokio::test]
async fn placed_orders_keep_their_prices_and_addresses() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let admin = admin(&state).await?;
    let kettle = create_product(&state, "Kettle", dec!(45.00), 10).await?;

    let mut request = PlaceOrderRequest::from_items(vec![OrderItemRequest {
        product_id: kettle.id,
        quantity: 2,
    }]);
    request.shipping_address = Some(ShippingAddressOverride {
        city: Some("Mombasa".into()),
        ..Default::default()
    });
    let placed = order_service::place_order(&state, &buyer, request)
        .await?
        .data
        .expect("order detail");

    assert_eq!(placed.order.billing.city, "Nairobi");
    assert_eq!(placed.order.shipping.city, "Mombasa");
    assert_eq!(placed.order.shipping.address, "12 Moi Avenue");

    product_service::update_product(
        &state,
        &admin,
        kettle.id,
        UpdateProductRequest {
            price: Some(dec!(60.00)),
            name: Some("Kettle Pro".into()),
            ..Default::default()
        },
    )
    .await?;
    auth_service::update_profile(
        &state,
        &buyer,
        UpdateProfileRequest {
            address: Some("99 Kenyatta Road".into()),
            city: Some("Kisumu".into()),
            ..Default::default()
        },
    )
    .await?;

    let reloaded = order_service::get_order(&state, &buyer, placed.order.id)
        .await?
        .data
        .expect("order detail");
    assert_eq!(reloaded.items[0].product_name, "Kettle");
    assert_eq!(cents(reloaded.items[0].unit_price), dec!(45.00));
    assert_eq!(cents(reloaded.items[0].total_price), dec!(90.00));
    assert_eq!(cents(reloaded.order.subtotal), dec!(90.00));
    assert_eq!(reloaded.order.billing.address, "12 Moi Avenue");
    assert_eq!(reloaded.order.billing.city, "Nairobi");
    assert_eq!(reloaded.order.shipping.city, "Mombasa");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn last_unit_is_sold_only_once() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let first = customer(&state, "first@example.com").await?;
    let second = customer(&state, "second@example.com").await?;
    let last = create_product(&state, "Last One", dec!(500.00), 1).await?;

    let mut handles = Vec::new();
    for buyer in [first, second] {
        let state = state.clone();
        let product_id = last.id;
        handles.push(tokio::spawn(async move {
            order_service::place_order(
                &state,
                &buyer,
                PlaceOrderRequest::from_items(vec![OrderItemRequest {
                    product_id,
                    quantity: 1,
                }]),
            )
            .await
        }));
    }

    let mut placed = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => placed += 1,
            Err(AppError::Validation(_) | AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(placed, 1);
    assert_eq!(stock_of(&state, last.id).await?, 0);
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn taken_order_number_is_retried() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let pen = create_product(&state, "Pen", dec!(2.50), 10).await?;
    let items = || {
        PlaceOrderRequest::from_items(vec![OrderItemRequest {
            product_id: pen.id,
            quantity: 1,
        }])
    };

    order_service::place_order_with_numbers(&state, &buyer, items(), || "ORD-1-AAAAAAAA".into())
        .await?;

    let mut candidates = vec!["ORD-1-BBBBBBBB", "ORD-1-AAAAAAAA"];
    let placed = order_service::place_order_with_numbers(&state, &buyer, items(), || {
        candidates.pop().unwrap_or("ORD-1-CCCCCCCC").to_string()
    })
    .await?
    .data
    .expect("order detail");

    assert_eq!(placed.order.order_number, "ORD-1-BBBBBBBB");
    assert_eq!(Orders::find().count(&state.orm).await?, 2);
    assert_eq!(stock_of(&state, pen.id).await?, 8);
    Ok(())
}

#[tokio::test]
async fn exhausted_order_numbers_report_conflict() -> anyhow::Result<()> {
    let (state, _) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let pen = create_product(&state, "Pen", dec!(2.50), 10).await?;

    order_service::place_order_with_numbers(
        &state,
        &buyer,
        PlaceOrderRequest::from_items(vec![OrderItemRequest {
            product_id: pen.id,
            quantity: 1,
        }]),
        || "ORD-1-AAAAAAAA".into(),
    )
    .await?;

    add_to_cart(&state, &buyer, pen.id, 2).await?;
    let mut calls = 0;
    let err = order_service::place_order_with_numbers(
        &state,
        &buyer,
        PlaceOrderRequest::from_cart(),
        || {
            calls += 1;
            "ORD-1-AAAAAAAA".into()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(calls, order_service::ORDER_NUMBER_ATTEMPTS);
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    assert_eq!(stock_of(&state, pen.id).await?, 9);
    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert_eq!(cart.item_count, 2);
    Ok(())
}

#[tokio::test]
async fn notifier_failure_does_not_fail_placement() -> anyhow::Result<()> {
    let state = setup_state_with(Arc::new(FailingNotifier)).await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let mug = create_product(&state, "Mug", dec!(12.00), 3).await?;

    let placed = order_service::place_order(
        &state,
        &buyer,
        PlaceOrderRequest::from_items(vec![OrderItemRequest {
            product_id: mug.id,
            quantity: 1,
        }]),
    )
    .await?;

    assert!(placed.data.is_some());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    assert_eq!(stock_of(&state, mug.id).await?, 2);
    Ok(())
}

#[tokio::test]
async fn stock_drained_mid_checkout_rolls_back_every_line() -> anyhow::Result<()> {
    let (state, recorder) = setup_state().await?;
    let buyer = customer(&state, "buyer@example.com").await?;
    let alpha = create_product(&state, "Alpha", dec!(10.00), 5).await?;
    let beta = create_product(&state, "Beta", dec!(20.00), 5).await?;

    add_to_cart(&state, &buyer, alpha.id, 2).await?;
    add_to_cart(&state, &buyer, beta.id, 1).await?;

    // A competing buyer empties Beta after validation but before its
    // conditional decrement runs.
    state
        .orm
        .execute_unprepared(
            "CREATE TRIGGER drain_beta AFTER INSERT ON order_items \
             WHEN NEW.product_name = 'Beta' \
             BEGIN UPDATE products SET stock_quantity = 0 WHERE name = 'Beta'; END",
        )
        .await?;

    let err = order_service::place_order(&state, &buyer, PlaceOrderRequest::from_cart())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert_eq!(OrderItems::find().count(&state.orm).await?, 0);
    assert_eq!(OrderStatusHistory::find().count(&state.orm).await?, 0);
    assert_eq!(stock_of(&state, alpha.id).await?, 5);
    assert_eq!(stock_of(&state, beta.id).await?, 5);

    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.item_count, 3);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(recorder.placed().is_empty());
    Ok(())
}
