//! Store configuration
//!
//! Picks the sanitizer and extension inferer a store uses on admission.
//! Pattern based strategies are compiled here, so a bad pattern is reported
//! before any directory is scanned.

use crate::naming::{
    DefaultExtensionInferer, DefaultSanitizer, NameTransform, PatternInferer, PatternSanitizer,
};
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// Naming strategies for a store
#[derive(Clone)]
pub struct StoreConfig {
    sanitizer: Arc<dyn NameTransform>,
    inferer: Arc<dyn NameTransform>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            sanitizer: Arc::new(DefaultSanitizer),
            inferer: Arc::new(DefaultExtensionInferer),
        }
    }
}

impl StoreConfig {
    /// Replace the sanitizer
    pub fn with_sanitizer(mut self, sanitizer: impl NameTransform + 'static) -> Self {
        self.sanitizer = Arc::new(sanitizer);
        self
    }

    /// Replace the extension inferer
    pub fn with_inferer(mut self, inferer: impl NameTransform + 'static) -> Self {
        self.inferer = Arc::new(inferer);
        self
    }

    /// Default sanitizing plus replacing every match of `pattern` with `_`
    pub fn with_sanitize_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_sanitizer(PatternSanitizer::new(pattern)?))
    }

    /// Take the first match of `pattern` as the extension
    pub fn with_extension_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_inferer(PatternInferer::new(pattern)?))
    }

    pub fn sanitizer(&self) -> &dyn NameTransform {
        self.sanitizer.as_ref()
    }

    pub fn inferer(&self) -> &dyn NameTransform {
        self.inferer.as_ref()
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategies() {
        let config = StoreConfig::default();
        assert_eq!(config.sanitizer().transform(" .x*y "), "x_y");
        assert_eq!(config.inferer().transform("a.tar.bz2"), ".tar.bz2");
    }

    #[test]
    fn test_pattern_builders() {
        let config = StoreConfig::default()
            .with_sanitize_pattern("#")
            .unwrap()
            .with_extension_pattern(r"\.[^.]+$")
            .unwrap();
        assert_eq!(config.sanitizer().transform("issue#12.md"), "issue_12.md");
        assert_eq!(config.inferer().transform("a.tar.gz"), ".gz");
    }

    #[test]
    fn test_bad_pattern_fails_at_build() {
        let result = StoreConfig::default().with_extension_pattern("*oops");
        assert!(matches!(result, Err(crate::Error::Pattern(_))));
    }
}
