use std::time::Instant;

use crate::dom::parser::parse_document;
use crate::dom::HostDocument;
use crate::error::LoadError;
use crate::net::fetch::fetch_page;

/// Result of loading and scanning a host page
pub struct PageResult {
    pub document: HostDocument,
    pub fetch_status: u16,
    pub load_ms: f64,
}

impl PageResult {
    pub fn gallery_count(&self) -> usize {
        self.document.galleries.len()
    }
}

/// The page pipeline: Fetch → Parse → Gallery discovery
#[derive(Debug, Default)]
pub struct PageLoader;

impl PageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a URL or local file through the full pipeline
    pub fn load_page(&self, location: &str) -> Result<PageResult, LoadError> {
        let start = Instant::now();
        let fetch_result = fetch_page(location)?;
        let mut result = self.process_html(&fetch_result.html, &fetch_result.url, fetch_result.status);
        result.load_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(result)
    }

    /// Run the parse stage over already-fetched markup
    pub fn process_html(&self, html: &str, url: &str, status: u16) -> PageResult {
        let document = parse_document(html, url);

        log::info!(
            "page {}: {} gallery widget(s), {} image source(s)",
            document.url,
            document.galleries.len(),
            document.source_count()
        );

        PageResult {
            document,
            fetch_status: status,
            load_ms: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <div class="elementor-widget-image-gallery" data-id="g1"><img src="a.png"><img src="b.png"></div>
        <div class="elementor-widget-image-gallery" data-id="g2"></div>
    "#;

    #[test]
    fn keeps_inert_galleries_by_default() {
        let page = PageLoader::new().process_html(HTML, "https://example.com/", 200);
        assert_eq!(page.gallery_count(), 2);
        assert_eq!(page.fetch_status, 200);
    }

    #[test]
    fn inert_gallery_is_reported_not_dropped() {
        let page = PageLoader::new().process_html(HTML, "https://example.com/", 200);
        let inert: Vec<&str> = page
            .document
            .galleries
            .iter()
            .filter(|g| g.is_inert())
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(inert, vec!["g2"]);
        assert_eq!(page.document.source_count(), 2);
    }
}
