//! Error types for page loading and image fetching.

use std::path::PathBuf;

use thiserror::Error;

/// Error while loading a host page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("not a local file URL: {0}")]
    FileUrl(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Pipeline phase the error belongs to, shown next to the message in the UI.
    pub fn phase(&self) -> &'static str {
        match self {
            LoadError::InvalidUrl(_) => "url",
            LoadError::Http(_) | LoadError::Status { .. } => "fetch",
            LoadError::FileUrl(_) | LoadError::Io { .. } => "file",
        }
    }
}

/// Error while fetching or decoding a single gallery image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported image location: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_phase() {
        let err = LoadError::Status {
            url: "https://example.com".into(),
            status: 404,
        };
        assert_eq!(err.phase(), "fetch");
        assert!(err.to_string().contains("404"));

        let err = LoadError::from(url::Url::parse("::nope").unwrap_err());
        assert_eq!(err.phase(), "url");
    }
}
