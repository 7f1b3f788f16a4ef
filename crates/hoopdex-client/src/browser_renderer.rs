use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use hoopdex_core::error::AppError;
use hoopdex_core::traits::PageRenderer;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Headless-browser renderer using Chromium via the Chrome DevTools Protocol.
///
/// A single Chromium process is shared across all clones of this struct;
/// each [`PageRenderer::render`] call opens its own tab, grabs the rendered
/// HTML, and closes the tab again whether or not navigation succeeded.
///
/// The session is released by [`close`](Self::close), which the hosting
/// process calls once at shutdown.
///
/// # Example
///
/// ```rust,no_run
/// use hoopdex_client::BrowserRenderer;
/// use hoopdex_core::traits::PageRenderer;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = BrowserRenderer::new().await?;
/// let html = renderer.render("https://www.basketball-reference.com/players/j/").await?;
/// println!("{}", &html[..200]);
/// renderer.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BrowserRenderer {
    session: Arc<RwLock<Option<Browser>>>,
    handler: Arc<Mutex<Option<JoinHandle<()>>>>,
    timeout: Duration,
}

impl BrowserRenderer {
    /// Launches a headless Chromium browser with a **30 s** navigation timeout.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH`, `CHROME_BIN`,
    /// or one of the well-known install locations.
    pub async fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30)).await
    }

    /// Launches a headless Chromium browser with a custom navigation timeout.
    pub async fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        // Snap-packaged Chromium ships a wrapper that rejects standard
        // Chrome CLI flags, so prefer the real binary when we can find it.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .build()
            .map_err(|e| AppError::BrowserError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            session: Arc::new(RwLock::new(Some(browser))),
            handler: Arc::new(Mutex::new(Some(handler_task))),
            timeout,
        })
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// Honours `CHROME_BIN`, then well-known system paths. `None` lets
    /// `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            // Snap (Ubuntu default)
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            // Flatpak
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            // Common apt / manual installs
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Close the shared browser session.
    ///
    /// Idempotent: the first call shuts Chromium down, later calls are
    /// no-ops. Renders issued afterwards fail with
    /// [`AppError::BrowserError`].
    pub async fn close(&self) -> Result<(), AppError> {
        let Some(mut browser) = self.session.write().await.take() else {
            return Ok(());
        };

        let result = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| AppError::BrowserError(format!("Failed to close browser: {e}")));
        if let Err(e) = browser.wait().await {
            tracing::warn!(error = %e, "Failed to reap browser process");
        }

        if let Some(task) = self.handler.lock().await.take() {
            task.abort();
        }

        tracing::info!("Headless browser closed");
        result
    }
}

impl PageRenderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String, AppError> {
        // Only hold the session lock long enough to open the tab.
        let page = {
            let session = self.session.read().await;
            let browser = session
                .as_ref()
                .ok_or_else(|| AppError::BrowserError("Browser session is closed".into()))?;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| AppError::BrowserError(format!("Failed to open tab: {e}")))?
        };

        let timeout = self.timeout;
        let result = tokio::time::timeout(timeout, async {
            navigate_until_dom_ready(&page, url).await?;

            page.content()
                .await
                .map_err(|e| AppError::HttpError(format!("Failed to read page content: {e}")))
        })
        .await;

        // Release the tab on every path, including navigation failure and timeout.
        if let Err(e) = page.close().await {
            tracing::debug!(%url, error = %e, "Failed to close tab");
        }

        match result {
            Ok(inner) => inner,
            Err(_) => Err(AppError::Timeout(timeout.as_secs())),
        }
    }
}

/// True once the tab has left `about:blank` and the new document is parsed.
const DOM_READY_SCRIPT: &str =
    "document.location.href !== 'about:blank' && document.readyState !== 'loading'";

const DOM_READY_POLL: Duration = Duration::from_millis(50);

/// Navigate and return as soon as the DOM is parsed.
///
/// `Page::goto` waits for the `load` event, i.e. every image, ad and
/// tracker. Listing and stats tables are in the initial HTML, so only
/// `DOMContentLoaded` matters here.
async fn navigate_until_dom_ready(page: &Page, url: &str) -> Result<(), AppError> {
    let nav = page
        .execute(NavigateParams::new(url))
        .await
        .map_err(|e| AppError::HttpError(format!("Failed to navigate to {url}: {e}")))?;
    if let Some(error_text) = nav.result.error_text.as_deref() {
        return Err(AppError::HttpError(format!(
            "Failed to navigate to {url}: {error_text}"
        )));
    }

    loop {
        let ready: bool = page
            .evaluate(DOM_READY_SCRIPT)
            .await
            .map_err(|e| AppError::BrowserError(format!("Failed to query document state: {e}")))?
            .into_value()
            .map_err(|e| AppError::BrowserError(format!("Unexpected document state: {e}")))?;
        if ready {
            return Ok(());
        }
        tokio::time::sleep(DOM_READY_POLL).await;
    }
}
