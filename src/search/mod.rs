pub mod index;
pub mod mapper;
pub mod movie;
pub mod query;

pub use index::{ElasticIndex, IndexError, SearchIndex};
pub use mapper::{map_hits, MapError, SearchHit};
pub use movie::Movie;
pub use query::{Pagination, QueryBody, QueryError, SearchParams, SearchRequest};
