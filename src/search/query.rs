use serde::Serialize;
use sqlx::{PgPool, Row};

use super::criteria::{SortField, SortOrder};
use crate::database::manager::DatabaseError;
use crate::database::models::PropertySummary;
use crate::database::sql::{bind_param, bind_param_as, SqlParam, SqlResult};

/// Normalized, validated search spec. Built once per request from
/// `SearchCriteria` and translated to SQL; never constructed from raw input.
#[derive(Debug, Clone)]
pub struct PropertyQuery {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_beds: Option<i32>,
    pub min_baths: Option<i32>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Compute the final window: `total_pages = max(1, ceil(total/per_page))`
    /// and the requested page clamped into `[1, total_pages]`.
    pub fn compute(requested_page: i64, per_page: i64, total_count: i64) -> Self {
        let total_pages = ((total_count + per_page - 1) / per_page).max(1);
        let page = requested_page.max(1).min(total_pages);
        Self {
            page,
            per_page,
            total_count,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub properties: Vec<PropertySummary>,
    pub pagination: Pagination,
}

impl PropertyQuery {
    /// Render the WHERE clause with numbered binds. All present filters
    /// combine with AND; the location substring is an OR-group over
    /// address and title, matched case-insensitively.
    fn to_where_sql(&self) -> SqlResult {
        let mut conditions: Vec<String> = vec![];
        let mut params: Vec<SqlParam> = vec![];

        if let Some(location) = &self.location {
            let pattern = format!("%{}%", location);
            params.push(SqlParam::Text(pattern.clone()));
            let address_bind = params.len();
            params.push(SqlParam::Text(pattern));
            let title_bind = params.len();
            conditions.push(format!(
                "(address ILIKE ${} OR title ILIKE ${})",
                address_bind, title_bind
            ));
        }

        if let Some(property_type) = &self.property_type {
            params.push(SqlParam::Text(property_type.clone()));
            conditions.push(format!("property_type = ${}", params.len()));
        }

        if let Some(min_price) = self.min_price {
            params.push(SqlParam::BigInt(min_price));
            conditions.push(format!("price >= ${}", params.len()));
        }

        if let Some(max_price) = self.max_price {
            params.push(SqlParam::BigInt(max_price));
            conditions.push(format!("price <= ${}", params.len()));
        }

        if let Some(min_beds) = self.min_beds {
            params.push(SqlParam::Int(min_beds));
            conditions.push(format!("beds >= ${}", params.len()));
        }

        if let Some(min_baths) = self.min_baths {
            params.push(SqlParam::Int(min_baths));
            conditions.push(format!("baths >= ${}", params.len()));
        }

        SqlResult {
            query: conditions.join(" AND "),
            params,
        }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let where_result = self.to_where_sql();
        let query = if where_result.query.is_empty() {
            "SELECT COUNT(*) as count FROM \"properties\"".to_string()
        } else {
            format!(
                "SELECT COUNT(*) as count FROM \"properties\" WHERE {}",
                where_result.query
            )
        };
        SqlResult {
            query,
            params: where_result.params,
        }
    }

    /// Full SELECT for an already-computed pagination window.
    pub fn to_select_sql(&self, pagination: &Pagination) -> SqlResult {
        let where_result = self.to_where_sql();

        let query = [
            format!("SELECT {}", PropertySummary::COLUMNS),
            "FROM \"properties\"".to_string(),
            if where_result.query.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_result.query)
            },
            format!(
                "ORDER BY \"{}\" {}",
                self.sort_by.column(),
                self.sort_order.to_sql()
            ),
            format!("LIMIT {} OFFSET {}", pagination.per_page, pagination.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult {
            query,
            params: where_result.params,
        }
    }

    /// Count, clamp the page window, then fetch the matching slice.
    pub async fn execute(&self, pool: &PgPool) -> Result<SearchResults, DatabaseError> {
        let count_sql = self.to_count_sql();
        let mut count_query = sqlx::query(&count_sql.query);
        for p in count_sql.params.iter() {
            count_query = bind_param(count_query, p);
        }
        let total_count: i64 = count_query.fetch_one(pool).await?.try_get("count")?;

        let pagination = Pagination::compute(self.page, self.per_page, total_count);

        let select_sql = self.to_select_sql(&pagination);
        if crate::config::config().search.debug_logging {
            tracing::debug!(query = %select_sql.query, "property search");
        }

        let mut select_query = sqlx::query_as::<_, PropertySummary>(&select_sql.query);
        for p in select_sql.params.iter() {
            select_query = bind_param_as(select_query, p);
        }
        let properties = select_query.fetch_all(pool).await?;

        Ok(SearchResults {
            properties,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> PropertyQuery {
        PropertyQuery {
            location: None,
            property_type: None,
            min_price: None,
            max_price: None,
            min_beds: None,
            min_baths: None,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            per_page: 12,
        }
    }

    #[test]
    fn empty_criteria_produce_no_where_clause() {
        let sql = empty_query().to_count_sql();
        assert_eq!(sql.query, "SELECT COUNT(*) as count FROM \"properties\"");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn location_builds_an_or_group_over_address_and_title() {
        let query = PropertyQuery {
            location: Some("Djerba".to_string()),
            ..empty_query()
        };
        let sql = query.to_count_sql();
        assert!(sql
            .query
            .contains("(address ILIKE $1 OR title ILIKE $2)"));
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn price_bounds_combine_with_and() {
        let query = PropertyQuery {
            min_price: Some(300000),
            max_price: Some(500000),
            ..empty_query()
        };
        let sql = query.to_count_sql();
        assert!(sql.query.contains("price >= $1 AND price <= $2"));
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn all_filters_number_binds_sequentially() {
        let query = PropertyQuery {
            location: Some("Midoun".to_string()),
            property_type: Some("Villa".to_string()),
            min_price: Some(100),
            max_price: Some(200),
            min_beds: Some(2),
            min_baths: Some(1),
            ..empty_query()
        };
        let sql = query.to_count_sql();
        assert!(sql.query.contains("property_type = $3"));
        assert!(sql.query.contains("baths >= $7"));
        assert_eq!(sql.params.len(), 7);
    }

    #[test]
    fn select_orders_and_windows() {
        let query = PropertyQuery {
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            ..empty_query()
        };
        let pagination = Pagination::compute(2, 12, 30);
        let sql = query.to_select_sql(&pagination);
        assert!(sql.query.contains("ORDER BY \"price\" ASC"));
        assert!(sql.query.ends_with("LIMIT 12 OFFSET 12"));
    }

    #[test]
    fn pagination_five_records_two_per_page() {
        let pagination = Pagination::compute(1, 2, 5);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn pagination_clamps_past_the_last_page() {
        let pagination = Pagination::compute(9, 2, 5);
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.offset(), 4);
    }

    #[test]
    fn pagination_empty_result_still_has_one_page() {
        let pagination = Pagination::compute(1, 10, 0);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.page, 1);
    }
}
