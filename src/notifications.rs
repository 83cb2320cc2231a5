//! Post-commit customer and admin notifications.
//!
//! The dispatcher is fire-and-forget: every call spawns a task, failures are
//! logged and never reach the request that triggered them.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::{customers, status::OrderStatus},
    models::{OrderDetail, SalesReport},
};

/// Plain-data view of a freshly placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<SnapshotLine>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub billing_address: String,
    pub shipping_address: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotLine {
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl OrderSnapshot {
    pub fn new(detail: &OrderDetail, customer: &customers::Model) -> Self {
        let order = &detail.order;
        Self {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_name: customer.full_name(),
            customer_email: customer.email.clone(),
            customer_phone: customer.phone_number.clone(),
            items: detail
                .items
                .iter()
                .map(|item| SnapshotLine {
                    product_name: item.product_name.clone(),
                    product_sku: item.product_sku.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                })
                .collect(),
            subtotal: order.subtotal,
            tax_amount: order.tax_amount,
            shipping_cost: order.shipping_cost,
            discount_amount: order.discount_amount,
            total_amount: order.total_amount,
            billing_address: join_address(
                &order.billing.address,
                &order.billing.city,
                &order.billing.country,
            ),
            shipping_address: join_address(
                &order.shipping.address,
                &order.shipping.city,
                &order.shipping.country,
            ),
            notes: order.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowStockAlert {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
}

fn join_address(address: &str, city: &str, country: &str) -> String {
    [address, city, country]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_placed(&self, order: &OrderSnapshot) -> anyhow::Result<()>;

    async fn status_changed(&self, change: &StatusChange) -> anyhow::Result<()>;

    async fn low_stock(&self, alert: &LowStockAlert) -> anyhow::Result<()>;

    async fn sales_report(&self, report: &SalesReport) -> anyhow::Result<()>;
}

pub fn order_confirmation_sms(order_number: &str, total_amount: Decimal) -> String {
    format!(
        "Order Confirmed! Your order #{order_number} totaling KES {total_amount} has been \
         received and is being processed. Thank you for shopping with us!"
    )
}

pub fn status_update_sms(
    order_number: &str,
    status: OrderStatus,
    tracking_number: Option<&str>,
) -> String {
    match status {
        OrderStatus::Confirmed => {
            format!("Your order #{order_number} has been confirmed and is being prepared.")
        }
        OrderStatus::Processing => format!("Your order #{order_number} is now being processed."),
        OrderStatus::Shipped => match tracking_number {
            Some(tracking) => format!(
                "Great news! Your order #{order_number} has been shipped. Tracking: {tracking}"
            ),
            None => format!("Great news! Your order #{order_number} has been shipped."),
        },
        OrderStatus::Delivered => format!(
            "Your order #{order_number} has been delivered. Thank you for shopping with us!"
        ),
        OrderStatus::Cancelled => format!(
            "Your order #{order_number} has been cancelled. Please contact us if you have questions."
        ),
        other => format!(
            "Order #{order_number} status updated to: {}",
            other.label().to_lowercase()
        ),
    }
}

pub fn low_stock_message(alert: &LowStockAlert) -> String {
    format!(
        "STOCK ALERT: {} is running low with only {} units remaining. Please restock soon.",
        alert.product_name, alert.stock_quantity
    )
}

pub fn sales_report_message(report: &SalesReport) -> String {
    let mut text = format!(
        "Daily Sales Report - {}\n\n\
         Total Orders: {}\n\
         Total Revenue: KES {:.2}\n\
         Average Order Value: KES {:.2}\n\n\
         Orders by Status:\n",
        report.date.format("%Y-%m-%d"),
        report.total_orders,
        report.total_revenue,
        report.average_order_value,
    );
    for entry in &report.status_breakdown {
        text.push_str(&format!("- {}: {}\n", entry.status.label(), entry.count));
    }
    text
}

/// Renders every message and writes it to the log instead of a provider.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    admin_email: String,
}

impl LogNotifier {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_placed(&self, order: &OrderSnapshot) -> anyhow::Result<()> {
        if !order.customer_phone.is_empty() {
            tracing::info!(
                to = %order.customer_phone,
                message = %order_confirmation_sms(&order.order_number, order.total_amount),
                "sms"
            );
        }
        tracing::info!(
            to = %order.customer_email,
            order_number = %order.order_number,
            items = order.items.len(),
            total = %order.total_amount,
            "customer order confirmation email"
        );
        tracing::info!(
            to = %self.admin_email,
            order_number = %order.order_number,
            customer = %order.customer_name,
            total = %order.total_amount,
            "admin new order email"
        );
        Ok(())
    }

    async fn status_changed(&self, change: &StatusChange) -> anyhow::Result<()> {
        if !change.customer_phone.is_empty() {
            let message = status_update_sms(
                &change.order_number,
                change.status,
                change.tracking_number.as_deref(),
            );
            tracing::info!(to = %change.customer_phone, message = %message, "sms");
        }
        Ok(())
    }

    async fn low_stock(&self, alert: &LowStockAlert) -> anyhow::Result<()> {
        tracing::info!(
            to = %self.admin_email,
            sku = %alert.sku,
            message = %low_stock_message(alert),
            "stock alert email"
        );
        Ok(())
    }

    async fn sales_report(&self, report: &SalesReport) -> anyhow::Result<()> {
        tracing::info!(
            to = %self.admin_email,
            subject = %format!("Daily Sales Report - {}", report.date),
            message = %sales_report_message(report),
            "sales report email"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn order_placed(&self, snapshot: OrderSnapshot) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.order_placed(&snapshot).await {
                tracing::warn!(
                    error = %err,
                    order_number = %snapshot.order_number,
                    "order placed notification failed"
                );
            }
        });
    }

    pub fn status_changed(&self, change: StatusChange) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.status_changed(&change).await {
                tracing::warn!(
                    error = %err,
                    order_number = %change.order_number,
                    "status change notification failed"
                );
            }
        });
    }

    pub fn low_stock(&self, alert: LowStockAlert) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.low_stock(&alert).await {
                tracing::warn!(error = %err, sku = %alert.sku, "low stock alert failed");
            }
        });
    }

    pub fn sales_report(&self, report: SalesReport) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.sales_report(&report).await {
                tracing::warn!(error = %err, date = %report.date, "sales report delivery failed");
            }
        });
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}
