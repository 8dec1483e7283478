//! Request encoding
//!
//! - [`query`] flattens a request struct into query pairs
//! - [`url`] merges query pairs into an endpoint URL

pub mod query;
pub mod url;

pub use query::{to_query_params, QueryParams, ToQueryParams};
pub use url::merge_query;
