use serde::{Deserialize, Serialize};

use super::query::PropertyQuery;

/// Raw search parameters as they arrive on the query string.
///
/// Every field is an optional string: malformed input never fails a search,
/// it degrades to the default during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_beds: Option<String>,
    pub min_baths: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Area,
    CreatedAt,
}

impl SortField {
    /// Allow-listed sort fields; anything else falls back to `CreatedAt`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price") => SortField::Price,
            Some("area") => SortField::Area,
            Some("createdAt") => SortField::CreatedAt,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Area => "area",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Desc,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl SearchCriteria {
    /// Normalize into a validated query spec.
    ///
    /// A price bound of 0 means "no bound", not literally zero; empty
    /// strings mean "no filter"; out-of-range sort/order values fall back
    /// silently.
    pub fn normalize(&self) -> PropertyQuery {
        let search_config = &crate::config::config().search;

        let location = non_empty(self.location.as_deref());
        let property_type = non_empty(self.property_type.as_deref());

        let min_price = positive_i64(self.min_price.as_deref());
        let max_price = positive_i64(self.max_price.as_deref());
        let min_beds = positive_i32(self.min_beds.as_deref());
        let min_baths = positive_i32(self.min_baths.as_deref());

        let sort_by = SortField::parse(self.sort_by.as_deref());
        let sort_order = SortOrder::parse(self.sort_order.as_deref());

        let page = parse_i64(self.page.as_deref()).unwrap_or(1).max(1);
        let per_page = parse_i64(self.per_page.as_deref())
            .unwrap_or(search_config.default_per_page)
            .max(1)
            .min(search_config.max_per_page);

        PropertyQuery {
            location,
            property_type,
            min_price,
            max_price,
            min_beds,
            min_baths,
            sort_by,
            sort_order,
            page,
            per_page,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

fn positive_i64(value: Option<&str>) -> Option<i64> {
    parse_i64(value).filter(|v| *v > 0)
}

fn positive_i32(value: Option<&str>) -> Option<i32> {
    value
        .and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> SearchCriteria {
        SearchCriteria::default()
    }

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        let spec = SearchCriteria {
            sort_by: Some("evil".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.sort_by, SortField::CreatedAt);
    }

    #[test]
    fn unknown_sort_order_falls_back_to_desc() {
        let spec = SearchCriteria {
            sort_order: Some("sideways".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.sort_order, SortOrder::Desc);
    }

    #[test]
    fn zero_price_bound_means_no_bound() {
        let spec = SearchCriteria {
            min_price: Some("0".to_string()),
            max_price: Some("500000".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.min_price, None);
        assert_eq!(spec.max_price, Some(500000));
    }

    #[test]
    fn malformed_numbers_degrade_to_defaults() {
        let spec = SearchCriteria {
            min_price: Some("cheap".to_string()),
            page: Some("minus one".to_string()),
            per_page: Some("-3".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.min_price, None);
        assert_eq!(spec.page, 1);
        assert!(spec.per_page >= 1);
    }

    #[test]
    fn page_clamps_to_at_least_one() {
        let spec = SearchCriteria {
            page: Some("-5".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.page, 1);
    }

    #[test]
    fn blank_location_is_no_filter() {
        let spec = SearchCriteria {
            location: Some("   ".to_string()),
            ..criteria()
        }
        .normalize();
        assert_eq!(spec.location, None);
    }
}
