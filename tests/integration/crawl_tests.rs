//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, plus in-memory renderers for the
//! traversal properties that are awkward to set up over HTTP.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use site_archiver::config::Config;
use site_archiver::crawler::{crawl, ArchiveOptions, BlobFetcher, ByteStream, Coordinator};
use site_archiver::crawler::{PageRenderer, RenderedPage};
use site_archiver::url::{CanonicalUrl, CrawlScope};
use site_archiver::{ArchiveError, FetchError, RenderError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in `base_dir`
fn create_test_config(seed: &str, base_dir: &Path, max_concurrent_pages: u32) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = Some(seed.to_string());
    config.crawler.max_concurrent_pages = max_concurrent_pages;
    config.crawler.page_timeout_secs = 5;
    config.output.base_dir = base_dir.to_string_lossy().into_owned();
    config
}

/// Output root for a wiremock server, e.g. `<base>/127.0.0.1_41234`
fn server_root(base_dir: &Path, server: &MockServer) -> PathBuf {
    let address = server.address();
    base_dir.join(format!("{}_{}", address.ip(), address.port()))
}

fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>\n{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(links))
        .mount(server)
        .await;
}

/// Serves a small documentation tree beneath `/docs/`
async fn mount_docs_site(server: &MockServer, pdf_fetches: u64) {
    mount_page(
        server,
        "/docs/",
        &[
            "intro",
            "/blog/news",
            "manual.pdf",
            "https://elsewhere.example/docs/",
            "mailto:docs@example.com",
        ],
    )
    .await;
    mount_page(server, "/docs/intro", &["/docs/", "guide#install", "manual.pdf"]).await;
    mount_page(server, "/docs/guide", &["intro"]).await;

    Mock::given(method("GET"))
        .and(path("/blog/news"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.7 manual".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(pdf_fetches)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    mount_docs_site(&server, 1).await;
    let base = tempfile::tempdir().unwrap();

    let config = create_test_config(&format!("{}/docs/", server.uri()), base.path(), 1);
    let report = crawl(config).await.unwrap();

    let root = server_root(base.path(), &server);
    assert!(root.join("index.html").is_file());
    assert!(root.join("docs_intro.html").is_file());
    assert!(root.join("docs_guide.html").is_file());
    assert_eq!(
        std::fs::read(root.join("pdfs/manual.pdf")).unwrap(),
        b"%PDF-1.7 manual"
    );
    assert!(!root.join("blog_news.html").exists());
    assert!(!root.join("docs_manual.pdf.html").exists());

    let intro = std::fs::read_to_string(root.join("docs_intro.html")).unwrap();
    assert!(intro.contains("guide#install"));

    assert_eq!(report.pages_saved, 3);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.assets_downloaded, 1);
    assert_eq!(report.links_out_of_scope, 2);
    assert_eq!(report.links_unresolvable, 1);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_rerun_skips_assets_and_overwrites_pages() {
    let server = MockServer::start().await;
    // The PDF may only be fetched by the first run
    mount_docs_site(&server, 1).await;
    let base = tempfile::tempdir().unwrap();
    let seed = format!("{}/docs/", server.uri());

    crawl(create_test_config(&seed, base.path(), 1)).await.unwrap();

    let root = server_root(base.path(), &server);
    std::fs::write(root.join("index.html"), "stale").unwrap();

    let report = crawl(create_test_config(&seed, base.path(), 1)).await.unwrap();

    assert_eq!(report.assets_downloaded, 0);
    assert_eq!(report.assets_on_disk, 1);
    assert_eq!(report.pages_saved, 3);
    let index = std::fs::read_to_string(root.join("index.html")).unwrap();
    assert!(index.contains("intro"));
}

#[tokio::test]
async fn test_http_error_page_is_contained() {
    let server = MockServer::start().await;
    mount_page(&server, "/docs/", &["broken", "fine"]).await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/fine", &[]).await;
    let base = tempfile::tempdir().unwrap();

    let config = create_test_config(&format!("{}/docs/", server.uri()), base.path(), 1);
    let report = crawl(config).await.unwrap();

    let root = server_root(base.path(), &server);
    assert!(!root.join("docs_broken.html").exists());
    assert!(root.join("docs_fine.html").is_file());
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_saved, 2);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let base = tempfile::tempdir().unwrap();

    for seed in ["", "not a url", "ftp://example.com/docs/"] {
        let result = crawl(create_test_config(seed, base.path(), 1)).await;
        assert!(
            matches!(result, Err(ArchiveError::InvalidSeed(_))),
            "seed {:?} should be rejected",
            seed
        );
    }
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

/// In-memory site: every URL maps to the raw hrefs on that page
///
/// URLs missing from the map fail to render. Every navigation is recorded.
struct SiteRenderer {
    pages: HashMap<String, Vec<&'static str>>,
    navigations: Mutex<Vec<String>>,
    shutdowns: AtomicUsize,
}

impl SiteRenderer {
    fn new(pages: &[(&str, Vec<&'static str>)]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(url, links)| (url.to_string(), links.clone()))
                .collect(),
            navigations: Mutex::new(Vec::new()),
            shutdowns: AtomicUsize::new(0),
        })
    }

    fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    fn navigations_to(&self, url: &str) -> usize {
        self.navigations().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageRenderer for SiteRenderer {
    async fn navigate(&self, url: &CanonicalUrl) -> Result<RenderedPage, RenderError> {
        self.navigations.lock().unwrap().push(url.to_string());
        // Let other in-flight pages interleave
        tokio::time::sleep(Duration::from_millis(5)).await;

        let links = self.pages.get(url.as_str()).ok_or(RenderError::Navigation {
            url: url.to_string(),
            message: "net::ERR_CONNECTION_RESET".to_string(),
        })?;
        Ok(RenderedPage {
            final_url: url.to_string(),
            html: format!("<html><body>page {}</body></html>", url),
            title: None,
            links: links.iter().map(|l| l.to_string()).collect(),
        })
    }

    async fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// Serves a fixed body for every URL and counts requests per URL
#[derive(Default)]
struct CountingFetcher {
    fetches: Mutex<Vec<String>>,
}

impl CountingFetcher {
    fn fetches_of(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    fn total(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobFetcher for CountingFetcher {
    async fn fetch(&self, url: &CanonicalUrl) -> Result<ByteStream, FetchError> {
        self.fetches.lock().unwrap().push(url.to_string());
        let body: ByteStream = Box::pin(stream::iter(vec![Ok(Bytes::from_static(b"%PDF-1.4"))]));
        Ok(body)
    }
}

fn coordinator(
    seed: &str,
    root: &Path,
    max_concurrent_pages: usize,
    renderer: Arc<SiteRenderer>,
    fetcher: Arc<CountingFetcher>,
) -> Coordinator {
    let options = ArchiveOptions {
        output_root: root.to_path_buf(),
        max_concurrent_pages,
        page_timeout: Duration::from_secs(5),
    };
    Coordinator::new(
        CrawlScope::from_seed(seed).unwrap(),
        options,
        renderer,
        fetcher,
    )
}

#[tokio::test]
async fn test_cycle_renders_each_page_once() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SiteRenderer::new(&[
        ("http://x.com/", vec!["/a"]),
        ("http://x.com/a", vec!["/b"]),
        ("http://x.com/b", vec!["/a", "/b", "/a#top", "/"]),
    ]);
    let fetcher = Arc::new(CountingFetcher::default());

    let report = coordinator("http://x.com/", dir.path(), 1, renderer.clone(), fetcher)
        .run()
        .await
        .unwrap();

    assert_eq!(
        renderer.navigations(),
        vec!["http://x.com/", "http://x.com/a", "http://x.com/b"]
    );
    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("a.html").is_file());
    assert!(dir.path().join("b.html").is_file());
    assert_eq!(report.pages_saved, 3);
    assert_eq!(renderer.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sequential_crawl_is_depth_first() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SiteRenderer::new(&[
        ("http://x.com/", vec!["/a", "/c"]),
        ("http://x.com/a", vec!["/b"]),
        ("http://x.com/b", vec![]),
        ("http://x.com/c", vec![]),
    ]);

    coordinator(
        "http://x.com/",
        dir.path(),
        1,
        renderer.clone(),
        Arc::new(CountingFetcher::default()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        renderer.navigations(),
        vec![
            "http://x.com/",
            "http://x.com/a",
            "http://x.com/b",
            "http://x.com/c"
        ]
    );
}

#[tokio::test]
async fn test_scope_excludes_other_hosts_and_paths() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SiteRenderer::new(&[(
        "http://x.com/docs/",
        vec!["/blog/post", "http://y.com/docs/", "https://x.com/docs/tls", "page"],
    )]);

    let report = coordinator(
        "http://x.com/docs/",
        dir.path(),
        1,
        renderer.clone(),
        Arc::new(CountingFetcher::default()),
    )
    .run()
    .await
    .unwrap();

    // "page" is in scope but unknown to the renderer, so it fails
    assert_eq!(
        renderer.navigations(),
        vec!["http://x.com/docs/", "http://x.com/docs/page"]
    );
    assert_eq!(report.links_out_of_scope, 3);
    assert_eq!(report.pages_failed, 1);
}

#[tokio::test]
async fn test_pdfs_are_never_rendered_and_fetched_once() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = SiteRenderer::new(&[
        ("http://x.com/docs/", vec!["a", "handbook.pdf", "/files/Other.PDF"]),
        ("http://x.com/docs/a", vec!["handbook.pdf", "/docs/handbook.pdf#page=2"]),
    ]);
    let fetcher = Arc::new(CountingFetcher::default());

    let report = coordinator(
        "http://x.com/docs/",
        dir.path(),
        1,
        renderer.clone(),
        fetcher.clone(),
    )
    .run()
    .await
    .unwrap();

    assert!(renderer
        .navigations()
        .iter()
        .all(|u| !u.to_lowercase().ends_with(".pdf")));
    assert_eq!(fetcher.fetches_of("http://x.com/docs/handbook.pdf"), 1);
    assert_eq!(fetcher.fetches_of("http://x.com/files/Other.PDF"), 1);
    assert_eq!(fetcher.total(), 2);
    assert!(dir.path().join("pdfs/handbook.pdf").is_file());
    assert!(dir.path().join("pdfs/Other.PDF").is_file());
    assert_eq!(report.assets_downloaded, 2);
    assert_eq!(report.assets_duplicate, 2);
}

#[tokio::test]
async fn test_render_failure_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    // "b" is linked but missing from the site, so rendering it fails
    let renderer = SiteRenderer::new(&[
        ("http://x.com/docs/", vec!["b", "c"]),
        ("http://x.com/docs/c", vec!["b"]),
    ]);

    let report = coordinator(
        "http://x.com/docs/",
        dir.path(),
        1,
        renderer.clone(),
        Arc::new(CountingFetcher::default()),
    )
    .run()
    .await
    .unwrap();

    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("docs_c.html").is_file());
    assert!(!dir.path().join("docs_b.html").exists());
    assert_eq!(renderer.navigations_to("http://x.com/docs/b"), 1);
    assert_eq!(report.pages_saved, 2);
    assert_eq!(report.pages_failed, 1);
}

#[tokio::test]
async fn test_concurrent_crawl_visits_each_page_once() {
    let dir = tempfile::tempdir().unwrap();
    let hub: Vec<&'static str> = vec!["p1", "p2", "p3", "p4", "p5", "p6", "doc.pdf"];
    let renderer = SiteRenderer::new(&[
        ("http://x.com/docs/", hub.clone()),
        ("http://x.com/docs/p1", hub.clone()),
        ("http://x.com/docs/p2", hub.clone()),
        ("http://x.com/docs/p3", hub.clone()),
        ("http://x.com/docs/p4", hub.clone()),
        ("http://x.com/docs/p5", hub.clone()),
        ("http://x.com/docs/p6", hub),
    ]);
    let fetcher = Arc::new(CountingFetcher::default());

    let coordinator = coordinator(
        "http://x.com/docs/",
        dir.path(),
        4,
        renderer.clone(),
        fetcher.clone(),
    );
    let report = coordinator.run().await.unwrap();

    assert_eq!(renderer.navigations().len(), 7);
    for i in 1..=6 {
        let url = format!("http://x.com/docs/p{}", i);
        assert_eq!(renderer.navigations_to(&url), 1);
        assert!(dir.path().join(format!("docs_p{}.html", i)).is_file());
    }
    assert_eq!(fetcher.total(), 1);
    assert_eq!(coordinator.visited_pages().len(), 7);
    assert_eq!(coordinator.downloaded_assets().len(), 1);
    assert_eq!(report.pages_saved, 7);
}

#[tokio::test]
async fn test_unwritable_output_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"").unwrap();
    let renderer = SiteRenderer::new(&[("http://x.com/", vec![])]);

    let result = coordinator(
        "http://x.com/",
        &blocked.join("root"),
        1,
        renderer.clone(),
        Arc::new(CountingFetcher::default()),
    )
    .run()
    .await;

    assert!(matches!(result, Err(ArchiveError::Filesystem { .. })));
    assert!(renderer.navigations().is_empty());
    assert_eq!(renderer.shutdowns.load(Ordering::SeqCst), 1);
}
