use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::status::{OrderStatus, PaymentStatus},
    models::Order,
};

fn default_use_cart() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Field-by-field override of the shipping snapshot.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ShippingAddressOverride {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(default = "default_use_cart")]
    pub use_cart: bool,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: Option<ShippingAddressOverride>,
    #[serde(default)]
    pub notes: String,
}

impl PlaceOrderRequest {
    pub fn from_cart() -> Self {
        Self {
            use_cart: true,
            items: Vec::new(),
            shipping_address: None,
            notes: String::new(),
        }
    }

    pub fn from_items(items: Vec<OrderItemRequest>) -> Self {
        Self {
            use_cart: false,
            items,
            shipping_address: None,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub status_comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
