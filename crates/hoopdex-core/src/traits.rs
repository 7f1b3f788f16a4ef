use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::AppError;

/// Renders a URL and returns the serialized HTML document.
///
/// Implementations may share one long-lived session across clones, but
/// each call must use (and release) its own per-call context.
pub trait PageRenderer: Send + Sync + Clone {
    fn render(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

type RenderFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AppError>> + Send + 'a>>;

/// Object-safe mirror of [`PageRenderer`], used by [`SharedRenderer`].
trait DynPageRenderer: Send + Sync {
    fn render_boxed<'a>(&'a self, url: &'a str) -> RenderFuture<'a>;
}

impl<R: PageRenderer> DynPageRenderer for R {
    fn render_boxed<'a>(&'a self, url: &'a str) -> RenderFuture<'a> {
        Box::pin(self.render(url))
    }
}

/// Type-erased renderer handle.
///
/// Lets non-generic holders (HTTP state, CLI) carry whichever renderer was
/// configured at startup without threading a type parameter through.
#[derive(Clone)]
pub struct SharedRenderer {
    inner: Arc<dyn DynPageRenderer>,
}

impl SharedRenderer {
    pub fn new<R: PageRenderer + 'static>(renderer: R) -> Self {
        Self {
            inner: Arc::new(renderer),
        }
    }
}

impl PageRenderer for SharedRenderer {
    fn render(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send {
        async move { self.inner.render_boxed(url).await }
    }
}
