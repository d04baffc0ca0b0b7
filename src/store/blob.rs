//! Blob type - a payload waiting to be admitted into a dedup directory

use crate::model::IdentityKey;
use crate::naming::NameTransform;
use bytes::Bytes;
use once_cell::unsync::OnceCell;

/// A binary payload plus the (path free) name it arrived under
#[derive(Clone, Debug)]
pub struct Blob {
    content: Bytes,
    name: Option<String>,
    original_name: Option<String>,
    extension: String,
    key: OnceCell<IdentityKey>,
}

impl Blob {
    /// Create a new blob
    pub fn new(content: impl Into<Bytes>, name: Option<String>) -> Self {
        Blob {
            content: content.into(),
            original_name: name.clone(),
            name,
            extension: String::new(),
            key: OnceCell::new(),
        }
    }

    /// Create a blob with a display name
    pub fn named(content: impl Into<Bytes>, name: impl Into<String>) -> Self {
        Self::new(content, Some(name.into()))
    }

    /// Create a blob without a name; it will be stored under a cooked name
    pub fn anonymous(content: impl Into<Bytes>) -> Self {
        Self::new(content, None)
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Get the size of the payload
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Identity key, computed on first use and cached
    pub fn key(&self) -> IdentityKey {
        *self.key.get_or_init(|| IdentityKey::digest(&self.content))
    }

    /// Current name, cooking one from the key when none was ever set
    pub fn name(&mut self) -> &str {
        if self.name.as_deref().map_or(true, str::is_empty) {
            self.cook_name();
        }
        self.name.as_deref().unwrap_or_default()
    }

    /// The name as first supplied; never changes
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) {
        self.extension = extension.into();
    }

    /// Replace the name with `key + extension`
    pub fn cook_name(&mut self) -> &str {
        let cooked = format!("{}{}", self.key(), self.extension);
        self.name.insert(cooked)
    }

    /// Infer the extension from the current name
    ///
    /// A blob without a name ends up with an empty extension.
    pub fn infer_extension(&mut self, inferer: &dyn NameTransform) {
        self.extension = match self.name.as_deref() {
            Some(name) => inferer.transform(name),
            None => String::new(),
        };
    }

    /// Run the current name through a sanitizer
    ///
    /// Anonymous blobs are left alone; their cooked name is already safe.
    pub fn sanitize_name(&mut self, sanitizer: &dyn NameTransform) {
        if let Some(name) = self.name.as_deref() {
            self.name = Some(sanitizer.transform(name));
        }
    }
}
