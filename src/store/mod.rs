//! Content-unique directory store
//!
//! A [`Blob`] is a payload waiting for admission. A [`DedupStore`] owns one
//! directory and its uniqueness index, and a [`StoreRegistry`] hands out one
//! shared store per canonical directory.

mod blob;
mod dedup_store;
mod registry;

pub use blob::Blob;
pub use dedup_store::{Admission, DedupStore, Record};
pub use registry::{SharedStore, StoreRegistry};
