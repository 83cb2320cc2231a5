use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
            UpdateProfileRequest,
        },
        cart::{AddToCartRequest, UpdateCartItemRequest},
        categories::{
            CategoryList, CategoryPriceStats, CategoryTree, CreateCategoryRequest,
            UpdateCategoryRequest,
        },
        orders::{
            OrderItemRequest, OrderList, PlaceOrderRequest, ShippingAddressOverride,
            UpdateOrderStatusRequest,
        },
        products::{CreateProductRequest, InventoryAdjustRequest, ProductList, UpdateProductRequest},
        reviews::{CreateReviewRequest, ModerateReviewRequest, ReviewList},
    },
    entity::status::{CustomerRole, OrderStatus, PaymentStatus, ProductStatus},
    models::{
        BillingInfo, Cart, CartItem, Category, CategoryNode, Customer, Order, OrderDetail,
        OrderItem, OrderTracking, Product, ProductRating, Review, SalesReport, ShippingInfo,
        StatusCount, StatusHistoryEntry,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, categories, health, orders, params, products, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        auth::update_profile,
        auth::change_password,
        products::list_products,
        products::featured_products,
        products::product_rating,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::category_tree,
        categories::create_category,
        categories::update_category,
        categories::category_products,
        categories::average_price,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::place_order,
        orders::get_order,
        orders::cancel_order,
        orders::order_tracking,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_low_stock,
        admin::adjust_inventory,
        admin::moderate_review,
        admin::daily_sales_report,
        reviews::list_reviews,
        reviews::create_review
    ),
    components(
        schemas(
            Customer,
            CustomerRole,
            Product,
            ProductStatus,
            Category,
            CategoryNode,
            Cart,
            CartItem,
            Order,
            OrderStatus,
            PaymentStatus,
            BillingInfo,
            ShippingInfo,
            OrderItem,
            StatusHistoryEntry,
            OrderDetail,
            OrderTracking,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AddToCartRequest,
            UpdateCartItemRequest,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CategoryTree,
            CategoryPriceStats,
            CreateProductRequest,
            UpdateProductRequest,
            InventoryAdjustRequest,
            ProductList,
            OrderItemRequest,
            ShippingAddressOverride,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            OrderList,
            Review,
            ReviewList,
            CreateReviewRequest,
            ModerateReviewRequest,
            ProductRating,
            SalesReport,
            StatusCount,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::LowStockQuery,
            params::ReviewQuery,
            params::SalesReportQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Cart>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Products", description = "Product catalog"),
        (name = "Categories", description = "Category hierarchy"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Reviews", description = "Customer product reviews"),
        (name = "Admin", description = "Order lifecycle, inventory, moderation and reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
