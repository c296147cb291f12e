//! Command implementations

mod cache;
mod doc;
mod search;
mod serve;

pub use cache::{clear as clear_cache, stats as cache_stats};
pub use doc::execute as show_doc;
pub use search::execute as search;
pub use serve::execute as serve;
