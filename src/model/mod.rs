//! Core data model types for filededup

mod key;

pub use key::{IdentityKey, DIGEST_LEN};
