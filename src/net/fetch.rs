use std::path::Path;

use url::Url;

use crate::error::LoadError;

/// Result of fetching a host page
#[derive(Clone)]
pub struct FetchResult {
    pub html: String,
    pub url: String,
    pub status: u16,
}

/// Load a host page from a local file path, a `file://` URL, or over HTTP(S).
pub fn fetch_page(location: &str) -> Result<FetchResult, LoadError> {
    let location = location.trim();

    if let Ok(url) = Url::parse(location) {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| LoadError::FileUrl(url.to_string()))?;
            return read_local(&path);
        }
    }

    let path = Path::new(location);
    if path.exists() {
        return read_local(path);
    }

    fetch_url(location)
}

fn read_local(path: &Path) -> Result<FetchResult, LoadError> {
    let html = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let url = Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| absolute.display().to_string());

    log::info!("loaded local page {}", url);
    Ok(FetchResult {
        html,
        url,
        status: 200,
    })
}

/// Fetch a URL and return the HTML content (blocking).
pub fn fetch_url(url_str: &str) -> Result<FetchResult, LoadError> {
    let url = normalize_url(url_str);
    let parsed = Url::parse(&url)?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("Mozilla/5.0 (compatible; scroll-ribbon/", env!("CARGO_PKG_VERSION"), ")"))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    let response = client
        .get(parsed.as_str())
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()?;

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    if !response.status().is_success() {
        return Err(LoadError::Status {
            url: final_url,
            status,
        });
    }

    let html = response.text()?;
    log::info!("fetched {} ({} bytes, HTTP {})", final_url, html.len(), status);

    Ok(FetchResult {
        html,
        url: final_url,
        status,
    })
}

/// Prefix bare hosts with `https://`.
fn normalize_url(url_str: &str) -> String {
    if !url_str.starts_with("http://") && !url_str.starts_with("https://") {
        format!("https://{}", url_str)
    } else {
        url_str.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn reads_local_file() {
        let path = std::env::temp_dir().join(format!("scroll-ribbon-fetch-{}.html", std::process::id()));
        std::fs::write(&path, "<html><title>local</title></html>").unwrap();

        let result = fetch_page(path.to_str().unwrap()).unwrap();
        assert!(result.html.contains("local"));
        assert!(result.url.starts_with("file://"));
        assert_eq!(result.status, 200);

        let via_url = fetch_page(&result.url).unwrap();
        assert_eq!(via_url.html, result.html);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_url_is_io_error() {
        let err = fetch_page("file:///definitely/not/here/page.html").err().unwrap();
        assert_eq!(err.phase(), "file");
    }
}
