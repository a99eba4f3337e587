//! Tree Construction Services
//!
//! - `TreeBuilder` - recursive construction of typed trees from raw JSON
//! - `FieldClassifier` - ordered rule chain deciding each field's type
//! - `RelationFetcher` - source of referenced documents
//! - `FlatIndex` - uid lookup and ancestry over a built tree
//!
//! Services coordinate between the type registry, the configuration and the
//! relation source; models stay free of construction logic.

mod classifier;
pub mod error;
mod flatten;
pub mod relation_fetcher;
pub mod tree_builder;

pub use error::{BuildError, FetchError, Result};
pub use flatten::FlatIndex;
pub use relation_fetcher::{
    DirectoryRelationFetcher, NullRelationFetcher, RelationFetcher, StaticRelationFetcher,
};
pub use tree_builder::{BuildStats, TreeBuilder};
