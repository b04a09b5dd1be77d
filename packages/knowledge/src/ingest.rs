//! Page fetching and HTML-to-text extraction.
//!
//! Fetches a URL over HTTP and reduces the response to a title plus
//! whitespace-normalized plain text, which is what the extraction pipeline
//! consumes.

use tracing::{debug, warn};
use url::Url;

use crate::error::{CrawlError, CrawlResult};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;
const MIN_CONTENT_CHARS: usize = 10;

/// A fetched page reduced to plain text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// HTTP page fetcher.
pub struct PageFetcher {
    client: reqwest::Client,
    user_agent: String,
    max_bytes: usize,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    /// Create a fetcher with default settings (30 s timeout, 10 MB ceiling).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the response size ceiling in bytes.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch a URL and extract its title and plain-text content.
    pub async fn fetch(&self, url: &str) -> CrawlResult<FetchedPage> {
        Url::parse(url).map_err(|_| CrawlError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                if e.is_timeout() {
                    CrawlError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    CrawlError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                CrawlError::Timeout {
                    url: url.to_string(),
                }
            } else {
                CrawlError::Http(Box::new(e))
            }
        })?;
        if body.len() > self.max_bytes {
            return Err(CrawlError::TooLarge {
                size: body.len(),
                max: self.max_bytes,
            });
        }

        let html = String::from_utf8_lossy(&body);
        let title = extract_title(&html).unwrap_or_default();
        let content = html_to_text(&html);

        if content.chars().count() < MIN_CONTENT_CHARS {
            return Err(CrawlError::EmptyContent {
                url: url.to_string(),
            });
        }

        debug!(url = %url, title = %title, content_len = content.len(), "page fetched");
        Ok(FetchedPage {
            url: url.to_string(),
            title,
            content,
        })
    }
}

/// Extract the `<title>` text from HTML.
pub fn extract_title(html: &str) -> Option<String> {
    let title_pattern = regex::Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    title_pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Reduce HTML to whitespace-normalized plain text.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    // Remove scripts and styles
    let script_pattern = regex::Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = regex::Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    text = script_pattern.replace_all(&text, "").to_string();
    text = style_pattern.replace_all(&text, "").to_string();

    // Block-level tags become line breaks so words don't run together
    let block_pattern =
        regex::Regex::new(r"(?i)</?(p|div|br|h[1-6]|li|tr|section|article)[^>]*>").unwrap();
    text = block_pattern.replace_all(&text, "\n").to_string();

    // Remove remaining tags
    let tag_pattern = regex::Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, "").to_string();

    // Decode HTML entities
    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse runs of whitespace into single spaces
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><title>My Page</title></html>"),
            Some("My Page".to_string())
        );
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>  </title>"), None);
    }

    #[test]
    fn test_html_to_text_strips_scripts_and_styles() {
        let html = "<html><script>alert(1)</script><style>p{}</style><p>Hello</p></html>";
        assert_eq!(html_to_text(html), "Hello");
    }

    #[test]
    fn test_html_to_text_normalizes_whitespace() {
        let html = "<div>one</div>\n\n  <div>two   three</div>";
        assert_eq!(html_to_text(html), "one two three");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("<p>a &amp; b &lt;c&gt;</p>"), "a & b <c>");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let fetcher = PageFetcher::new();
        let err = tokio_test::block_on(fetcher.fetch("not a url")).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    }
}
