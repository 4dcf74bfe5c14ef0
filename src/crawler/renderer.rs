//! Page rendering capability
//!
//! The archiver only needs "give me the HTML and the anchors of this URL".
//! Anything that satisfies `PageRenderer` can be swapped in: the bundled
//! HTTP renderer, a headless browser driver, or a fixture stub in tests.

use crate::crawler::fetcher::describe_error;
use crate::crawler::parser::parse_html;
use crate::url::CanonicalUrl;
use crate::RenderError;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Result of rendering a single page
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    /// URL the renderer ended up on after redirects
    pub final_url: String,

    /// Fully rendered HTML
    pub html: String,

    /// Page title, if the document has one
    pub title: Option<String>,

    /// Anchor targets in DOM order, absolute where they could be resolved
    pub links: Vec<String>,
}

/// Renders pages for the archiver
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url` and returns the settled page
    async fn navigate(&self, url: &CanonicalUrl) -> Result<RenderedPage, RenderError>;

    /// Releases renderer resources at the end of a run
    async fn shutdown(&self) {}
}

/// `PageRenderer` that fetches HTML over HTTP without executing scripts
///
/// "Network settled" is simply the end of the response body.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn navigate(&self, url: &CanonicalUrl) -> Result<RenderedPage, RenderError> {
        let navigation_error = |e: reqwest::Error| RenderError::Navigation {
            url: url.to_string(),
            message: describe_error(&e),
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(navigation_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(navigation_error)?;
        let parsed = parse_html(&html);
        let base = document_base(&final_url, parsed.base.as_deref());
        let links = parsed
            .links
            .iter()
            .map(|href| absolute_href(&base, href))
            .collect();

        Ok(RenderedPage {
            final_url: final_url.to_string(),
            html,
            title: parsed.title,
            links,
        })
    }
}

/// Base URL relative anchors resolve against
///
/// That is the `<base href>` resolved against the URL after redirects, or
/// that URL itself when there is no usable `<base>`.
fn document_base(final_url: &Url, base_href: Option<&str>) -> Url {
    base_href
        .and_then(|href| final_url.join(href.trim()).ok())
        .unwrap_or_else(|| final_url.clone())
}

/// Reports an anchor the way a browser's `a.href` does
///
/// Relative values are resolved against the document base URL. Values the
/// URL parser rejects are passed through raw.
fn absolute_href(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
