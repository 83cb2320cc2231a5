pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod customers;
pub mod order_items;
pub mod order_status_history;
pub mod orders;
pub mod product_categories;
pub mod product_reviews;
pub mod products;
pub mod status;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use order_items::Entity as OrderItems;
pub use order_status_history::Entity as OrderStatusHistory;
pub use orders::Entity as Orders;
pub use product_categories::Entity as ProductCategories;
pub use product_reviews::Entity as ProductReviews;
pub use products::Entity as Products;
