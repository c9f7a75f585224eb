/// Access hint applied to successful mappings.
///
/// Forwarded to `madvise` on Unix; ignored elsewhere.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AccessPattern {
    #[default]
    Normal,
    /// Lookups jump around the file (binary search trees, indexes)
    Random,
    /// The file is scanned front to back
    Sequential,
}

/// Options controlling how a database file is acquired.
///
/// # Examples
///
/// ```rust
/// use dbmap::{AccessPattern, Config};
///
/// let config = Config::default()
///     .allow_fallback_read(false)
///     .access_pattern(AccessPattern::Random);
///
/// assert!(!config.allow_fallback_read);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Fall back to a full read when the handle cannot be mapped (default: true)
    pub allow_fallback_read: bool,
    /// Hint passed to the OS for mapped buffers
    pub access_pattern: AccessPattern,
    /// Prefault the mapping's pages (Linux only)
    pub populate: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            allow_fallback_read: true,
            access_pattern: AccessPattern::Normal,
            populate: false,
        }
    }
}
impl Config {
    pub fn allow_fallback_read(mut self, allow: bool) -> Self {
        self.allow_fallback_read = allow;
        self
    }
    pub fn access_pattern(mut self, pattern: AccessPattern) -> Self {
        self.access_pattern = pattern;
        self
    }
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }
}
