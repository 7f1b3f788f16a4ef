/// Smoke-test for `BrowserRenderer`.
///
/// Launches a headless Chromium, renders the "J" players listing, and checks
/// that the page looks like a players index with player anchors in it.
///
/// Run with:
///   cargo run -p hoopdex-client --example render_smoke --features browser
use hoopdex_client::BrowserRenderer;
use hoopdex_core::SiteLayout;
use hoopdex_core::traits::PageRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Launching headless browser…");
    let renderer = BrowserRenderer::new().await?;

    let url = SiteLayout::default().listing_url('j');
    println!("Rendering {url} …");
    let html = renderer.render(&url).await?;

    assert!(
        html.to_lowercase().contains("players index"),
        "Expected listing title not found in rendered HTML"
    );
    assert!(
        html.contains("div_players"),
        "Expected #div_players container not found"
    );

    println!("OK: got {} bytes of rendered HTML", html.len());
    renderer.close().await?;
    Ok(())
}
