//! Page archiving
//!
//! Renders one page, writes its HTML under the output root, and classifies
//! every anchor on it. Recursion is driven by the coordinator, which feeds the
//! returned work items back through the frontier.

use crate::crawler::renderer::{PageRenderer, RenderedPage};
use crate::crawler::scheduler::WorkItem;
use crate::output::{map_to_path, write_atomic};
use crate::state::{PageState, Registry};
use crate::url::{classify, resolve, CanonicalUrl, CrawlScope, LinkClass};
use crate::{ArchiveError, RenderError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A page written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub url: CanonicalUrl,
    pub local_path: PathBuf,
    pub bytes: usize,
}

/// Everything that came out of handling one page work item
#[derive(Debug, Clone)]
pub struct PageVisit {
    pub url: CanonicalUrl,
    pub state: PageState,
    pub saved: Option<SavedPage>,

    /// Pages and assets to process next, in DOM order
    pub discovered: Vec<WorkItem>,

    pub out_of_scope: u64,
    pub unresolvable: u64,
}

impl PageVisit {
    fn ended(url: &CanonicalUrl, state: PageState) -> Self {
        Self {
            url: url.clone(),
            state,
            saved: None,
            discovered: Vec::new(),
            out_of_scope: 0,
            unresolvable: 0,
        }
    }
}

/// Renders, saves, and expands in-scope pages
pub struct PageArchiver {
    scope: CrawlScope,
    output_root: PathBuf,
    renderer: Arc<dyn PageRenderer>,
    visited: Arc<Registry>,
    page_timeout: Duration,
}

impl PageArchiver {
    pub fn new(
        scope: CrawlScope,
        output_root: PathBuf,
        renderer: Arc<dyn PageRenderer>,
        visited: Arc<Registry>,
        page_timeout: Duration,
    ) -> Self {
        Self {
            scope,
            output_root,
            renderer,
            visited,
            page_timeout,
        }
    }

    /// Archives a single page
    ///
    /// # Flow
    ///
    /// 1. Claim the page; an already-claimed page is a no-op
    /// 2. Render it under the per-page timeout. A failure is logged and the
    ///    page stays visited, so it is never retried this run
    /// 3. Write the HTML to its mapped path, replacing any earlier copy
    /// 4. Resolve and classify each anchor: PDFs become asset work, in-scope
    ///    pages become page work, everything else is dropped
    ///
    /// # Returns
    ///
    /// * `Ok(PageVisit)` - The page outcome and the work it discovered
    /// * `Err(ArchiveError)` - The HTML could not be written; the run must stop
    pub async fn archive(&self, page: &CanonicalUrl) -> Result<PageVisit, ArchiveError> {
        if !self.visited.claim(page).is_claimed() {
            tracing::debug!("Page {} already claimed, skipping", page);
            return Ok(PageVisit::ended(page, PageState::Duplicate));
        }

        let rendered = match self.render(page).await {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!("Render failed, continuing without page: {}", e);
                return Ok(PageVisit::ended(page, PageState::RenderFailed));
            }
        };

        let local_path = self.output_root.join(map_to_path(&self.scope, page));
        write_atomic(&local_path, rendered.html.as_bytes()).await?;
        tracing::debug!(
            "Saved {} ({:?}) to {}",
            page,
            rendered.title.as_deref().unwrap_or(""),
            local_path.display()
        );

        let mut visit = PageVisit::ended(page, PageState::Saved);
        visit.saved = Some(SavedPage {
            url: page.clone(),
            local_path,
            bytes: rendered.html.len(),
        });
        self.expand_links(page, &rendered.links, &mut visit);

        Ok(visit)
    }

    /// Runs the renderer under the per-page timeout
    async fn render(&self, page: &CanonicalUrl) -> Result<RenderedPage, RenderError> {
        match tokio::time::timeout(self.page_timeout, self.renderer.navigate(page)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: page.to_string(),
                seconds: self.page_timeout.as_secs(),
            }),
        }
    }

    /// Classifies each raw anchor into `visit`
    fn expand_links(&self, page: &CanonicalUrl, links: &[String], visit: &mut PageVisit) {
        for raw in links {
            let target = match resolve(page, raw) {
                Ok(target) => target,
                Err(e) => {
                    tracing::debug!("Skipping link {:?} on {}: {}", raw, page, e);
                    visit.unresolvable += 1;
                    continue;
                }
            };

            match classify(&self.scope, &target) {
                LinkClass::PdfAsset => visit.discovered.push(WorkItem::Asset(target)),
                LinkClass::InScopePage => {
                    if !self.visited.contains(&target) {
                        visit.discovered.push(WorkItem::Page(target));
                    }
                }
                LinkClass::OutOfScope => {
                    tracing::trace!("Discarding out-of-scope link {}", target);
                    visit.out_of_scope += 1;
                }
            }
        }
    }
}
