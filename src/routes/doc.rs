use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AdminProduct, AdminViewInfo, CategoryList, CategoryRequest, ColumnLabel,
            CreateProductRequest, Dashboard, ProductRowList, RevenueReport, TagList, TagRequest,
            UpdateProductRequest,
        },
        auth::{LoginForm, LoginPage, RegisterForm, RegisterPage},
        cart::{AddToCartRequest, CartPage, NumberOrText, UpdateCartRequest},
        catalog::{CatalogPage, ProductDetails},
        comments::{AddCommentRequest, CommentCreated},
    },
    entity::users::UserRole,
    models::{
        Cart, CartItem, CartStats, Category, CategoryCount, CommentAuthor, CommentView, Product,
        ProductRevenue, ProductRow, Tag, User,
    },
    response::{ApiResponse, Meta, StatusBody},
    routes::{admin, auth, cart, catalog, comments, health},
};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::index,
        catalog::details,
        auth::login_admin,
        auth::register_page,
        auth::register,
        auth::login_page,
        auth::login,
        auth::logout,
        cart::cart_page,
        cart::add_to_cart,
        cart::update_cart,
        cart::delete_cart,
        cart::pay,
        comments::list_comments,
        comments::add_comment,
        admin::dashboard,
        admin::revenue_stats,
        admin::views,
        admin::list_categories,
        admin::create_category,
        admin::get_category,
        admin::update_category,
        admin::delete_category,
        admin::list_tags,
        admin::create_tag,
        admin::get_tag,
        admin::update_tag,
        admin::delete_tag,
        admin::list_products,
        admin::export_products,
        admin::create_product,
        admin::get_product,
        admin::update_product,
        admin::delete_product
    ),
    components(
        schemas(
            User,
            UserRole,
            Category,
            Tag,
            Product,
            ProductRow,
            Cart,
            CartItem,
            CartStats,
            CommentAuthor,
            CommentView,
            CategoryCount,
            ProductRevenue,
            CatalogPage,
            ProductDetails,
            LoginForm,
            LoginPage,
            RegisterForm,
            RegisterPage,
            NumberOrText,
            AddToCartRequest,
            UpdateCartRequest,
            CartPage,
            AddCommentRequest,
            CommentCreated,
            CategoryRequest,
            TagRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CategoryList,
            TagList,
            ProductRowList,
            AdminProduct,
            Dashboard,
            RevenueReport,
            AdminViewInfo,
            ColumnLabel,
            StatusBody,
            Meta,
            ApiResponse<CatalogPage>,
            ApiResponse<ProductDetails>,
            ApiResponse<CartPage>,
            ApiResponse<AdminProduct>,
            ApiResponse<RevenueReport>
        )
    ),
    security(
        ("session_cookie" = [])
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Storefront browsing"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Cart", description = "Session cart and checkout"),
        (name = "Comments", description = "Product comments"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/details/{id}", "/cart/{product_id}", "/pay", "/admin/stats"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
