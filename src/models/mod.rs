pub mod entry;
pub mod search;

pub use entry::{fold_key, IndexEntry, InvalidEntry, Target};
pub use search::{LookupMode, SearchHit, SearchResponse, TargetLink};
