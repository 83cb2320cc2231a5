use sea_orm::entity::prelude::*;

use super::status::ProductStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub sku: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::product_categories::Entity")]
    ProductCategories,
    #[sea_orm(has_many = "super::product_reviews::Entity")]
    ProductReviews,
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::product_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductReviews.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_categories::Relation::Categories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_categories::Relation::Products.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
