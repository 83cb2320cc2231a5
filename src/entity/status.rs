//! Stored enumerations for products and orders.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "discontinued")]
    Discontinued,
}

/// Lifecycle of an order.
///
/// ```text
/// pending ──► confirmed ──► processing ──► shipped ──► delivered
///    │            │              │            │
///    ├────────────┴──────────────┴──► cancelled
///    └──────── (paid) ───────────────────────┴──► refunded
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl OrderStatus {
    /// Statuses from which a customer may still cancel.
    pub const CANCELLABLE: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Confirmed];

    pub fn can_be_cancelled(self) -> bool {
        Self::CANCELLABLE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    ///
    /// Refunds additionally require the order to be paid; `paid` is the
    /// payment state the order will have once the change is applied.
    pub fn can_transition_to(self, next: OrderStatus, paid: bool) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Processing) | (Confirmed, Cancelled) => true,
            (Processing, Shipped) | (Processing, Cancelled) => true,
            (Shipped, Delivered) => true,
            (from, Refunded) => paid && !from.is_terminal(),
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CustomerRole {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl CustomerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerRole::Customer => "customer",
            CustomerRole::Admin => "admin",
        }
    }

    /// Parses the role claim of a bearer token.
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(CustomerRole::Customer),
            "admin" => Some(CustomerRole::Admin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn only_pending_and_confirmed_can_be_cancelled() {
        assert!(Pending.can_be_cancelled());
        assert!(Confirmed.can_be_cancelled());
        for status in [Processing, Shipped, Delivered, Cancelled, Refunded] {
            assert!(!status.can_be_cancelled(), "{status} should not be cancellable");
        }
    }

    #[test]
    fn forward_path_is_allowed() {
        assert!(Pending.can_transition_to(Confirmed, false));
        assert!(Confirmed.can_transition_to(Processing, false));
        assert!(Processing.can_transition_to(Shipped, false));
        assert!(Shipped.can_transition_to(Delivered, false));
    }

    #[test]
    fn skipping_and_going_back_is_rejected() {
        assert!(!Pending.can_transition_to(Shipped, false));
        assert!(!Delivered.can_transition_to(Pending, true));
        assert!(!Shipped.can_transition_to(Cancelled, false));
        assert!(!Cancelled.can_transition_to(Confirmed, false));
    }

    #[test]
    fn refund_requires_payment_and_non_terminal_source() {
        assert!(!Confirmed.can_transition_to(Refunded, false));
        assert!(Confirmed.can_transition_to(Refunded, true));
        assert!(Shipped.can_transition_to(Refunded, true));
        assert!(!Delivered.can_transition_to(Refunded, true));
        assert!(!Cancelled.can_transition_to(Refunded, true));
        assert!(!Refunded.can_transition_to(Refunded, true));
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&Processing).expect("serialize");
        assert_eq!(json, "\"processing\"");
        let parsed: OrderStatus = serde_json::from_str("\"shipped\"").expect("deserialize");
        assert_eq!(parsed, Shipped);
    }
}
