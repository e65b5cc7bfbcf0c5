use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::{
    entity::{
        category::{self, Entity as Categories},
        product::{self, Entity as Products},
        receipt,
        receipt_details::{self, Entity as ReceiptDetails},
    },
    error::{AppError, AppResult},
    models::{CategoryCount, ProductRevenue},
    state::AppState,
};

#[derive(Debug, FromQueryResult)]
struct CategoryCountRow {
    category_id: i32,
    category_name: String,
    product_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    product_id: i32,
    product_name: String,
    revenue: i64,
}

/// Every category with the number of products filed under it.
pub async fn count_product_by_cate(state: &AppState) -> AppResult<Vec<CategoryCount>> {
    let rows = Categories::find()
        .select_only()
        .column_as(category::Column::Id, "category_id")
        .column_as(category::Column::Name, "category_name")
        .column_as(
            SimpleExpr::from(Func::count(Expr::col((Products, product::Column::Id)))),
            "product_count",
        )
        .join(JoinType::LeftJoin, category::Relation::Product.def())
        .group_by(category::Column::Id)
        .group_by(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .into_model::<CategoryCountRow>()
        .all(&state.orm)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| CategoryCount {
            category_id: row.category_id,
            category_name: row.category_name,
            product_count: row.product_count,
        })
        .collect())
}

/// Revenue per product: Σ quantity × price snapshot over receipt lines,
/// optionally restricted to product names containing `kw` and to receipts
/// created between `from_date` and `to_date` (both days inclusive).
pub async fn stats_revenue(
    state: &AppState,
    kw: Option<&str>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> AppResult<Vec<ProductRevenue>> {
    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from > to {
            return Err(AppError::BadRequest(
                "from_date must not be after to_date".into(),
            ));
        }
    }

    let revenue = SimpleExpr::from(Func::sum(
        Expr::col((ReceiptDetails, receipt_details::Column::Quantity))
            .mul(Expr::col((ReceiptDetails, receipt_details::Column::Price))),
    ))
    .cast_as(Alias::new("BIGINT"));

    let mut query = ReceiptDetails::find()
        .select_only()
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Name, "product_name")
        .column_as(revenue.clone(), "revenue")
        .join(JoinType::InnerJoin, receipt_details::Relation::Product.def())
        .join(JoinType::InnerJoin, receipt_details::Relation::Receipt.def());

    if let Some(kw) = kw.map(str::trim).filter(|k| !k.is_empty()) {
        query = query.filter(product::Column::Name.contains(kw));
    }
    if let Some(from) = from_date {
        let start = from.and_hms_opt(0, 0, 0).ok_or_else(invalid_date)?;
        query = query.filter(receipt::Column::CreatedDate.gte(start));
    }
    if let Some(to) = to_date {
        let next_day = to.succ_opt().ok_or_else(invalid_date)?;
        let end = next_day.and_hms_opt(0, 0, 0).ok_or_else(invalid_date)?;
        query = query.filter(receipt::Column::CreatedDate.lt(end));
    }

    let rows = query
        .group_by(product::Column::Id)
        .group_by(product::Column::Name)
        .order_by_desc(revenue)
        .order_by_asc(product::Column::Id)
        .into_model::<RevenueRow>()
        .all(&state.orm)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| ProductRevenue {
            product_id: row.product_id,
            product_name: row.product_name,
            revenue: row.revenue,
        })
        .collect())
}

fn invalid_date() -> AppError {
    AppError::BadRequest("date out of range".into())
}
