//! Courtesy delay for polite crawling.
//!
//! Wraps any [`PageRenderer`] so that every render is preceded by a fixed
//! pause. Used by the index builder to keep its
//! sequential a–z crawl under the remote site's rate limits.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use hoopdex_core::throttle::{ThrottleConfig, ThrottledRenderer};
//!
//! # use hoopdex_core::traits::PageRenderer;
//! # #[derive(Clone)] struct MyRenderer;
//! # impl PageRenderer for MyRenderer {
//! #     async fn render(&self, _: &str) -> Result<String, hoopdex_core::error::AppError> { todo!() }
//! # }
//! let config = ThrottleConfig::new(Duration::from_millis(1200));
//! let renderer = ThrottledRenderer::new(MyRenderer, config);
//! ```

use std::time::Duration;

use crate::error::AppError;
use crate::traits::PageRenderer;

/// Delay applied before every render.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Fixed pause issued before each request.
    pub delay: Duration,
}

impl ThrottleConfig {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for ThrottleConfig {
    /// 1.2 second courtesy delay.
    fn default() -> Self {
        Self::new(Duration::from_millis(1200))
    }
}

/// A [`PageRenderer`] wrapper that sleeps before every request.
///
/// Unlike a last-request-time limiter, the pause is unconditional: callers
/// are expected to be sequential, so a fixed wait per step is the whole
/// contract.
#[derive(Clone)]
pub struct ThrottledRenderer<R> {
    inner: R,
    config: ThrottleConfig,
}

impl<R: PageRenderer> ThrottledRenderer<R> {
    pub fn new(inner: R, config: ThrottleConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }
}

impl<R: PageRenderer> PageRenderer for ThrottledRenderer<R> {
    async fn render(&self, url: &str) -> Result<String, AppError> {
        let wait = self.config.delay;
        if !wait.is_zero() {
            tracing::debug!(sleep_ms = %wait.as_millis(), "Courtesy delay before render");
            tokio::time::sleep(wait).await;
        }
        self.inner.render(url).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::testutil::MockRenderer;

    #[test]
    fn default_is_courtesy_delay() {
        let config = ThrottleConfig::default();
        assert_eq!(config.delay, Duration::from_millis(1200));
    }

    #[tokio::test]
    async fn waits_before_first_request() {
        let renderer = ThrottledRenderer::new(
            MockRenderer::new("<html>ok</html>"),
            ThrottleConfig::new(Duration::from_millis(60)),
        );

        let start = Instant::now();
        renderer.render("http://example.com/a").await.unwrap();

        assert!(
            start.elapsed() >= Duration::from_millis(60),
            "first request should be delayed, elapsed: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn waits_before_every_request() {
        let renderer = ThrottledRenderer::new(
            MockRenderer::new("<html>ok</html>"),
            ThrottleConfig::new(Duration::from_millis(40)),
        );

        let start = Instant::now();
        renderer.render("http://example.com/a").await.unwrap();
        renderer.render("http://example.com/b").await.unwrap();
        renderer.render("http://other.com/c").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn disabled_does_not_wait() {
        let renderer = ThrottledRenderer::new(
            MockRenderer::new("<html>ok</html>"),
            ThrottleConfig::disabled(),
        );

        let start = Instant::now();
        renderer.render("http://example.com/a").await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn passes_through_errors() {
        let renderer = ThrottledRenderer::new(
            MockRenderer::with_error(AppError::HttpError("fail".into())),
            ThrottleConfig::disabled(),
        );

        let err = renderer.render("http://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));
    }
}
