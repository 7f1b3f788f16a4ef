use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use hoopdex_core::error::AppError;
use hoopdex_core::traits::PageRenderer;

#[cfg(feature = "browser")]
use crate::BrowserRenderer;
use crate::HttpRenderer;

/// Which renderer backend to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Http,
    Browser,
}

impl RendererKind {
    /// `Browser` when compiled with the `browser` feature, else `Http`.
    pub fn default_for_build() -> Self {
        if cfg!(feature = "browser") {
            RendererKind::Browser
        } else {
            RendererKind::Http
        }
    }
}

impl FromStr for RendererKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(RendererKind::Http),
            "browser" => Ok(RendererKind::Browser),
            other => Err(AppError::ConfigError(format!(
                "Unknown renderer '{other}' (expected 'http' or 'browser')"
            ))),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Http => write!(f, "http"),
            RendererKind::Browser => write!(f, "browser"),
        }
    }
}

/// The renderer chosen at startup.
#[derive(Clone)]
pub enum AnyRenderer {
    Http(HttpRenderer),
    #[cfg(feature = "browser")]
    Browser(BrowserRenderer),
}

impl AnyRenderer {
    /// Launch the requested backend.
    pub async fn launch(kind: RendererKind, timeout: Duration) -> Result<Self, AppError> {
        match kind {
            RendererKind::Http => Ok(AnyRenderer::Http(HttpRenderer::with_timeout(timeout)?)),
            #[cfg(feature = "browser")]
            RendererKind::Browser => Ok(AnyRenderer::Browser(
                BrowserRenderer::with_timeout(timeout).await?,
            )),
            #[cfg(not(feature = "browser"))]
            RendererKind::Browser => Err(AppError::ConfigError(
                "Browser renderer requested but hoopdex was built without the 'browser' feature"
                    .into(),
            )),
        }
    }

    pub fn kind(&self) -> RendererKind {
        match self {
            AnyRenderer::Http(_) => RendererKind::Http,
            #[cfg(feature = "browser")]
            AnyRenderer::Browser(_) => RendererKind::Browser,
        }
    }

    /// Release the underlying session, if the backend holds one.
    pub async fn close(&self) -> Result<(), AppError> {
        match self {
            AnyRenderer::Http(_) => Ok(()),
            #[cfg(feature = "browser")]
            AnyRenderer::Browser(browser) => browser.close().await,
        }
    }
}

impl PageRenderer for AnyRenderer {
    async fn render(&self, url: &str) -> Result<String, AppError> {
        match self {
            AnyRenderer::Http(http) => http.render(url).await,
            #[cfg(feature = "browser")]
            AnyRenderer::Browser(browser) => browser.render(url).await,
        }
    }
}
