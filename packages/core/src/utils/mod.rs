//! Utility functions for BlokSpace Core
//!
//! Naming normalization for registry lookups and the shape predicates the
//! field classifier relies on (identifier strings, image filenames).

mod naming;
mod patterns;

pub use naming::{compound_field_name, studly_case};
pub use patterns::{is_image_filename, is_uuid};
