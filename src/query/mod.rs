//! # Query Translation
//!
//! Builds storage-ready query descriptors from HTTP query strings:
//! typed filters, projection, sort keys, and pagination.

pub mod errors;
pub mod filter;
pub mod pagination;
pub mod sort;
pub mod translator;

pub use errors::{QueryError, QueryResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use pagination::{PageLink, PageMeta, Pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use sort::{SortDirection, SortKey};
pub use translator::{QueryDescriptor, ID_FIELD, RESERVED_KEYS};
