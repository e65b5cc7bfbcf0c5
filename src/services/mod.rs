pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod comment_service;
pub mod receipt_service;
pub mod stats_service;
