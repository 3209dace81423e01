pub mod criteria;
pub mod query;

pub use criteria::{SearchCriteria, SortField, SortOrder};
pub use query::{Pagination, PropertyQuery, SearchResults};
