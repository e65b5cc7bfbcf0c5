use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Rich text, edited through the admin editor widget.
    #[sea_orm(column_type = "Text", nullable)]
    pub author: Option<String>,
    pub price: i64,
    #[sea_orm(nullable)]
    pub image: Option<String>,
    pub active: bool,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::prod_tag::Entity")]
    ProdTag,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::receipt_details::Entity")]
    ReceiptDetails,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::prod_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProdTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::prod_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::prod_tag::Relation::Product.def().rev())
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::receipt_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceiptDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
