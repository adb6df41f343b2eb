use crate::dom::{GalleryWidget, HostDocument, WidgetKey};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Class the page builder puts on its image-gallery widget wrapper.
pub const GALLERY_SELECTOR: &str = ".elementor-widget-image-gallery";

/// Image attributes tried in order; lazy-loading themes move `src` to `data-src`.
const SOURCE_ATTRS: &[&str] = &["src", "data-src"];

/// Parse a host page and collect every gallery widget in document order.
pub fn parse_document(html: &str, url: &str) -> HostDocument {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let base = Url::parse(url).ok();
    let galleries = match (Selector::parse(GALLERY_SELECTOR), Selector::parse("img")) {
        (Ok(gallery_sel), Ok(img_sel)) => document
            .select(&gallery_sel)
            .enumerate()
            .map(|(ordinal, el)| convert_gallery(el, ordinal, &img_sel, base.as_ref()))
            .collect(),
        _ => Vec::new(),
    };

    log::debug!(
        "parsed {}: {} gallery widget(s)",
        url,
        galleries.len()
    );

    HostDocument {
        url: url.to_string(),
        title: title.trim().to_string(),
        galleries,
    }
}

fn convert_gallery(
    el: ElementRef<'_>,
    ordinal: usize,
    img_sel: &Selector,
    base: Option<&Url>,
) -> GalleryWidget {
    let key = el
        .value()
        .attr("data-id")
        .filter(|id| !id.trim().is_empty())
        .map(WidgetKey::from_data_id)
        .unwrap_or_else(|| WidgetKey::from_ordinal(ordinal));

    let sources = el
        .select(img_sel)
        .filter_map(|img| {
            SOURCE_ATTRS
                .iter()
                .filter_map(|attr| img.value().attr(attr))
                .map(str::trim)
                .find(|src| !src.is_empty())
        })
        .map(|src| resolve_source(base, src))
        .collect();

    GalleryWidget { key, sources }
}

/// Resolve an image `src` against the page URL; unresolvable values pass through.
fn resolve_source(base: Option<&Url>, src: &str) -> String {
    match base.map(|b| b.join(src)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html>
        <head><title> Portfolio </title></head>
        <body>
            <img src="/logo.png">
            <div class="elementor-element elementor-widget-image-gallery" data-id="a1b2">
                <figure><img src="/img/one.jpg"></figure>
                <figure><img src="https://cdn.example.com/two.jpg"></figure>
                <figure><img data-src="three.jpg"></figure>
                <figure><img></figure>
            </div>
            <div class="elementor-widget-image-gallery"></div>
        </body>
    </html>
    "#;

    #[test]
    fn finds_galleries_in_document_order() {
        let doc = parse_document(PAGE, "https://example.com/work/");
        assert_eq!(doc.title, "Portfolio");
        assert_eq!(doc.galleries.len(), 2);
        assert_eq!(doc.galleries[0].key.as_str(), "a1b2");
        assert_eq!(doc.galleries[1].key.as_str(), "#1");
        assert!(doc.galleries[1].is_inert());
    }

    #[test]
    fn resolves_relative_sources() {
        let doc = parse_document(PAGE, "https://example.com/work/");
        assert_eq!(
            doc.galleries[0].sources,
            vec![
                "https://example.com/img/one.jpg".to_string(),
                "https://cdn.example.com/two.jpg".to_string(),
                "https://example.com/work/three.jpg".to_string(),
            ]
        );
        assert_eq!(doc.source_count(), 3);
    }

    #[test]
    fn page_without_gallery_is_empty() {
        let doc = parse_document("<html><body><img src='x.png'></body></html>", "not a url");
        assert!(doc.galleries.is_empty());
    }

    #[test]
    fn unparseable_base_keeps_raw_source() {
        let html = r#"<div class="elementor-widget-image-gallery"><img src="a.png"></div>"#;
        let doc = parse_document(html, "relative/page.html");
        assert_eq!(doc.galleries[0].sources, vec!["a.png".to_string()]);
    }
}
