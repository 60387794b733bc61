pub mod join;
pub mod namespace;
pub mod page;
pub mod text;
pub mod trending;
pub mod vector;

mod error;

pub use error::{Error, Result};
pub use join::{Keyed, SimilarityMatch, join_by_similarity};
pub use namespace::Namespace;
pub use page::{Page, PageRequest, page_count, paginate};
pub use trending::{EngagementCounts, TrendingWindow, rank_trending};
