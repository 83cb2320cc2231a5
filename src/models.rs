//! Response shapes returned by the services and serialized by the routes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    categories, customers, order_items, order_status_history, orders, product_reviews, products,
    status::{CustomerRole, OrderStatus, PaymentStatus, ProductStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub role: CustomerRole,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            address: model.address,
            city: model.city,
            country: model.country,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub is_in_stock: bool,
    pub is_low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            is_in_stock: model.is_in_stock(),
            is_low_stock: model.is_low_stock(),
            id: model.id,
            name: model.name,
            sku: model.sku,
            description: model.description,
            price: model.price,
            stock_quantity: model.stock_quantity,
            minimum_stock: model.minimum_stock,
            status: model.status,
            is_featured: model.is_featured,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(model: product_reviews::Model, customer: Option<&customers::Model>) -> Self {
        Self {
            customer_name: customer.map(customers::Model::full_name).unwrap_or_default(),
            id: model.id,
            product_id: model.product_id,
            customer_id: model.customer_id,
            rating: model.rating,
            title: model.title,
            comment: model.comment,
            is_approved: model.is_approved,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Aggregate over a product's approved reviews.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductRating {
    pub product_id: Uuid,
    /// Mean star rating to one decimal place; absent without reviews.
    pub average_rating: Option<Decimal>,
    pub review_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            parent_id: model.parent_id,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// A category with its (recursively nested) children.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub total_price: Decimal,
    pub is_available: bool,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BillingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub billing: BillingInfo,
    pub shipping: ShippingInfo,
    pub notes: String,
    pub tracking_number: Option<String>,
    pub can_be_cancelled: bool,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            can_be_cancelled: model.status.can_be_cancelled(),
            is_paid: model.payment_status == PaymentStatus::Paid,
            id: model.id,
            order_number: model.order_number,
            customer_id: model.customer_id,
            status: model.status,
            payment_status: model.payment_status,
            subtotal: model.subtotal,
            tax_amount: model.tax_amount,
            shipping_cost: model.shipping_cost,
            discount_amount: model.discount_amount,
            total_amount: model.total_amount,
            billing: BillingInfo {
                first_name: model.billing_first_name,
                last_name: model.billing_last_name,
                email: model.billing_email,
                phone: model.billing_phone,
                address: model.billing_address,
                city: model.billing_city,
                country: model.billing_country,
            },
            shipping: ShippingInfo {
                first_name: model.shipping_first_name,
                last_name: model.shipping_last_name,
                phone: model.shipping_phone,
                address: model.shipping_address,
                city: model.shipping_city,
                country: model.shipping_country,
            },
            notes: model.notes,
            tracking_number: model.tracking_number,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            confirmed_at: model.confirmed_at.map(|dt| dt.with_timezone(&Utc)),
            shipped_at: model.shipped_at.map(|dt| dt.with_timezone(&Utc)),
            delivered_at: model.delivered_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            product_name: model.product_name,
            product_sku: model.product_sku,
            unit_price: model.unit_price,
            quantity: model.quantity,
            total_price: model.total_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub id: i32,
    pub status: OrderStatus,
    pub status_display: String,
    pub comment: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<order_status_history::Model> for StatusHistoryEntry {
    fn from(model: order_status_history::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            status_display: model.status.label().to_string(),
            comment: model.comment,
            created_by: model.created_by,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// An order with its line items and audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub item_count: i64,
}

impl OrderDetail {
    pub fn new(
        order: orders::Model,
        items: Vec<order_items::Model>,
        history: Vec<order_status_history::Model>,
    ) -> Self {
        let item_count = items.iter().map(|item| i64::from(item.quantity)).sum();
        Self {
            order: order.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
            status_history: history.into_iter().map(StatusHistoryEntry::from).collect(),
            item_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderTracking {
    pub order_number: String,
    pub status: OrderStatus,
    pub status_display: String,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status_history: Vec<StatusHistoryEntry>,
}

impl From<OrderDetail> for OrderTracking {
    fn from(detail: OrderDetail) -> Self {
        let order = detail.order;
        Self {
            order_number: order.order_number,
            status_display: order.status.label().to_string(),
            status: order.status,
            tracking_number: order.tracking_number,
            created_at: order.created_at,
            confirmed_at: order.confirmed_at,
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
            status_history: detail.status_history,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Revenue for one UTC calendar day, counting orders that were confirmed
/// and not cancelled or refunded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesReport {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub status_breakdown: Vec<StatusCount>,
}
