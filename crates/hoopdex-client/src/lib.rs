#[cfg(feature = "browser")]
pub mod browser_renderer;
pub mod http_renderer;
pub mod renderer;

#[cfg(feature = "browser")]
pub use browser_renderer::BrowserRenderer;
pub use http_renderer::HttpRenderer;
pub use renderer::{AnyRenderer, RendererKind};
