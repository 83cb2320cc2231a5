//! Admin-driven order lifecycle changes.

use chrono::Utc;
use sea_orm::{EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    dto::orders::UpdateOrderStatusRequest,
    entity::{
        Orders, orders,
        status::{OrderStatus, PaymentStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderDetail,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

/// Decides which status, if any, `request` moves the order to.
///
/// Returns `Ok(None)` when only non-status fields change.
pub fn plan_transition(
    current: OrderStatus,
    payment_status: PaymentStatus,
    request: &UpdateOrderStatusRequest,
) -> AppResult<Option<OrderStatus>> {
    let has_other_fields = request.payment_status.is_some()
        || request.tracking_number.is_some()
        || request.notes.is_some();

    let next = match request.status {
        None if !has_other_fields => return Err(AppError::validation("Nothing to update")),
        None => return Ok(None),
        Some(next) if next == current && !has_other_fields => {
            return Err(AppError::validation(format!(
                "No change: order is already {current}"
            )));
        }
        Some(next) if next == current => return Ok(None),
        Some(next) => next,
    };

    let paid = request.payment_status.unwrap_or(payment_status) == PaymentStatus::Paid;
    if !current.can_transition_to(next, paid) {
        let reason = if next == OrderStatus::Refunded && !paid && !current.is_terminal() {
            " (order is not paid)"
        } else {
            ""
        };
        return Err(AppError::validation(format!(
            "Cannot change status from {current} to {next}{reason}"
        )));
    }
    Ok(Some(next))
}

/// Stamps the lifecycle timestamp belonging to `next`, keeping any value
/// already recorded.
fn stamp_timestamps(order: &orders::Model, next: OrderStatus, active: &mut orders::ActiveModel) {
    let now = Utc::now().fixed_offset();
    match next {
        OrderStatus::Confirmed if order.confirmed_at.is_none() => {
            active.confirmed_at = Set(Some(now));
        }
        OrderStatus::Shipped if order.shipped_at.is_none() => {
            active.shipped_at = Set(Some(now));
        }
        OrderStatus::Delivered if order.delivered_at.is_none() => {
            active.delivered_at = Set(Some(now));
        }
        _ => {}
    }
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    let previous = order.status;
    let next = plan_transition(previous, order.payment_status, &payload)?;

    let mut active: orders::ActiveModel = order.clone().into();
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(tracking_number) = payload.tracking_number {
        active.tracking_number = Set(Some(tracking_number));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(notes);
    }
    if let Some(next) = next {
        active.status = Set(next);
        stamp_timestamps(&order, next, &mut active);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = order_service::update_guarded(&txn, previous, active).await?;

    if let Some(next) = next {
        if next == OrderStatus::Cancelled {
            order_service::restore_stock(&txn, id).await?;
        }
        let comment = payload
            .status_comment
            .filter(|comment| !comment.trim().is_empty())
            .unwrap_or_else(|| format!("Status changed to {next}"));
        order_service::append_status_history(&txn, id, next, &comment, Some(user.user_id))
            .await?;
    }

    let change = order_service::status_change(&updated);
    let detail = order_service::load_detail(&txn, updated).await?;
    txn.commit().await?;

    if let Some(next) = next {
        tracing::info!(
            order_number = %change.order_number,
            from = %previous,
            to = %next,
            admin_id = %user.user_id,
            "order status changed"
        );
        state.notifications.status_changed(change);
    }

    Ok(ApiResponse::single("Order updated", detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: Option<OrderStatus>) -> UpdateOrderStatusRequest {
        UpdateOrderStatusRequest {
            status,
            ..Default::default()
        }
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = plan_transition(OrderStatus::Pending, PaymentStatus::Pending, &request(None))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn same_status_alone_is_a_no_op_error() {
        let err = plan_transition(
            OrderStatus::Confirmed,
            PaymentStatus::Pending,
            &request(Some(OrderStatus::Confirmed)),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("No change")));
    }

    #[test]
    fn same_status_with_other_fields_changes_nothing_in_the_lifecycle() {
        let req = UpdateOrderStatusRequest {
            status: Some(OrderStatus::Shipped),
            tracking_number: Some("TRK-1".into()),
            ..Default::default()
        };
        let next = plan_transition(OrderStatus::Shipped, PaymentStatus::Paid, &req).unwrap();
        assert_eq!(next, None);
    }

    #[test]
    fn illegal_jump_is_rejected() {
        let err = plan_transition(
            OrderStatus::Pending,
            PaymentStatus::Pending,
            &request(Some(OrderStatus::Delivered)),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn refund_may_be_paid_in_the_same_request() {
        let unpaid = plan_transition(
            OrderStatus::Processing,
            PaymentStatus::Pending,
            &request(Some(OrderStatus::Refunded)),
        );
        assert!(unpaid.is_err());

        let req = UpdateOrderStatusRequest {
            status: Some(OrderStatus::Refunded),
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        let next = plan_transition(OrderStatus::Processing, PaymentStatus::Pending, &req).unwrap();
        assert_eq!(next, Some(OrderStatus::Refunded));
    }
}
