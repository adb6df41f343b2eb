pub mod parser;

use std::fmt;

/// Identity of a gallery element inside its host page.
///
/// Page builders stamp each widget with a `data-id`; elements without one
/// fall back to their document-order ordinal (`#0`, `#1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKey(String);

impl WidgetKey {
    pub fn from_data_id(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(format!("#{}", ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One image-gallery widget found in the host markup.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryWidget {
    pub key: WidgetKey,
    /// Absolute image URLs in document order. Read once, never changed.
    pub sources: Vec<String>,
}

impl GalleryWidget {
    /// A gallery without images is left alone.
    pub fn is_inert(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Host page reduced to what the ribbon needs.
#[derive(Debug, Clone)]
pub struct HostDocument {
    pub url: String,
    pub title: String,
    pub galleries: Vec<GalleryWidget>,
}

impl HostDocument {
    /// Total number of image sources across all galleries.
    pub fn source_count(&self) -> usize {
        self.galleries.iter().map(|g| g.sources.len()).sum()
    }
}
