pub mod error;
pub mod list_query;
pub mod pagination;
pub mod types;

pub use error::FilterError;
pub use list_query::{ListQuery, ListTarget};
pub use pagination::{PageMeta, PageQuery, PageRequest, Paginated};
pub use types::*;
