use serde::{Deserialize, Deserializer, de};
use utoipa::ToSchema;

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Storefront catalog filters; both are optional and combine with AND.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct CatalogQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct AdminProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Searches name and author.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<i64>,
}

/// Revenue filters. Dates are `YYYY-MM-DD`; the range is inclusive.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct StatsQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub kw: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from_date: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Query strings arrive as text, flattened or not, and HTML forms submit
/// empty inputs as `""`; parse the text and treat blanks as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}
