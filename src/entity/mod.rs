pub mod category;
pub mod comment;
pub mod prod_tag;
pub mod product;
pub mod receipt;
pub mod receipt_details;
pub mod tag;
pub mod users;

pub use category::Entity as Categories;
pub use comment::Entity as Comments;
pub use prod_tag::Entity as ProdTags;
pub use product::Entity as Products;
pub use receipt::Entity as Receipts;
pub use receipt_details::Entity as ReceiptDetails;
pub use tag::Entity as Tags;
pub use users::Entity as Users;
