//! # filededup
//!
//! A directory of files in which every file has unique content.
//!
//! Opening a directory scans it once and cleans it up: symlinks, zero length
//! files and files whose content is already present are removed. New blobs
//! (from a directory walk, a mail attachment extractor, anything producing
//! bytes and a name) are then admitted one at a time. Known content is only
//! recorded as a duplicate name; new content is written under a sanitized
//! name, or under a content derived name when that name is taken.
//!
//! ## Core Concepts
//!
//! - **Blob**: payload plus the name it arrived under
//! - **Identity key**: SHA-1 of the content followed by its length in hex
//! - **Record**: one file on disk, its arrival name and its duplicate names
//! - **Registry**: one shared store per canonical directory
//!
//! ## Example
//!
//! ```ignore
//! use filededup::{Blob, StoreRegistry};
//!
//! let mut registry = StoreRegistry::new();
//! let store = registry.open("attachments")?;
//! store.lock().admit(Blob::named(b"hello".to_vec(), "greeting.txt"))?;
//! println!("{}", store.lock().report().to_json_pretty()?);
//! ```

pub mod config;
pub mod logging;
pub mod mailbox;
pub mod model;
pub mod naming;
pub mod report;
pub mod source;
pub mod store;

mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use mailbox::{Attachment, MboxSource};
pub use model::IdentityKey;
pub use naming::{DefaultExtensionInferer, DefaultSanitizer, NameTransform};
pub use report::{Report, ReportEntry};
pub use source::DirectorySource;
pub use store::{Admission, Blob, DedupStore, Record, SharedStore, StoreRegistry};
