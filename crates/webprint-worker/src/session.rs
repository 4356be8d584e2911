//! Browser session driver.
//!
//! One launch → one page → capture(s) → close. There are deliberately no
//! page-level timeouts here: the orchestrator's process timeout is the
//! single cancellation bound, and a kill from the host is the expected way
//! for a stuck render to die.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetEmulatedMediaParams,
};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::args::{InputMode, WorkerArgs};

/// Baseline Chromium arguments for every session.
const BROWSER_ARGS: &[&str] = &["--disable-gpu", "--hide-scrollbars"];

const MM_PER_INCH: f64 = 25.4;

/// Execute the full page-load → capture → shutdown sequence.
pub async fn run(args: &WorkerArgs) -> Result<()> {
    let config = BrowserConfig::builder()
        .args(browser_args(args))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

    info!("launching browser");
    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    // Process browser events until the connection closes.
    let events = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let result = drive(&browser, args).await;

    // Close unconditionally, best effort; the process exit is the backstop.
    if let Err(error) = browser.close().await {
        warn!(%error, "browser close failed");
    }
    events.await.ok();

    result
}

async fn drive(browser: &Browser, args: &WorkerArgs) -> Result<()> {
    let page = browser
        .new_page("about:blank")
        .await
        .context("Failed to open page")?;

    if let Some((width, height)) = args.viewport() {
        apply_viewport(&page, width, height).await?;
    }

    if let Some((username, password)) = args.http_auth() {
        authenticate(&page, username, password).await?;
    }

    match args.input_mode {
        InputMode::File => {
            let html = tokio::fs::read_to_string(&args.input)
                .await
                .with_context(|| format!("Failed to read input file {}", args.input))?;
            page.set_content(html)
                .await
                .context("Failed to set page content")?;
        }
        InputMode::Url => {
            page.goto(args.input.as_str())
                .await
                .with_context(|| format!("Navigation to {} failed", args.input))?;
        }
    }

    if args.image {
        let path = output_path(&args.output, ".png");
        debug!(path = %path.display(), "capturing full-page screenshot");
        page.save_screenshot(
            ScreenshotParams::builder().full_page(true).build(),
            &path,
        )
        .await
        .context("Screenshot failed")?;
    }

    if args.pdf {
        let path = output_path(&args.output, ".pdf");
        debug!(path = %path.display(), "rendering pdf");
        page.execute(SetEmulatedMediaParams {
            media: Some("screen".to_string()),
            features: None,
        })
        .await
        .context("Media emulation failed")?;
        page.save_pdf(pdf_params(args), &path)
            .await
            .context("Pdf render failed")?;
    }

    Ok(())
}

async fn apply_viewport(page: &Page, width: u32, height: u32) -> Result<()> {
    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid viewport: {}", e))?,
    )
    .await
    .context("Failed to set viewport")?;
    Ok(())
}

/// Apply an HTTP basic-auth header to every request the page makes.
async fn authenticate(page: &Page, username: &str, password: &str) -> Result<()> {
    let token = BASE64.encode(format!("{username}:{password}"));
    let headers = Headers::new(serde_json::json!({
        "Authorization": format!("Basic {token}"),
    }));
    page.execute(SetExtraHttpHeadersParams::new(headers))
        .await
        .context("Failed to set auth header")?;
    Ok(())
}

fn browser_args(args: &WorkerArgs) -> Vec<String> {
    let mut flags: Vec<String> = BROWSER_ARGS.iter().map(|s| s.to_string()).collect();
    if args.no_sandbox {
        flags.push("--no-sandbox".to_string());
    }
    flags
}

/// Print parameter set for PDF output: zero margins, background painting on,
/// page geometry from the arguments.
///
/// A page format name and explicit dimensions can both be present; both are
/// written into the same parameter set and the later write wins, the same
/// way the browser engine resolves conflicting print parameters.
pub(crate) fn pdf_params(args: &WorkerArgs) -> PrintToPdfParams {
    let mut params = PrintToPdfParams {
        print_background: Some(true),
        margin_top: Some(0.),
        margin_bottom: Some(0.),
        margin_left: Some(0.),
        margin_right: Some(0.),
        ..PrintToPdfParams::default()
    };

    if let Some(format) = args.page_format {
        let (width, height) = format.paper_size();
        params.paper_width = Some(width);
        params.paper_height = Some(height);
    }

    if let (Some(width), Some(height)) = (args.page_width, args.page_height) {
        params.paper_width = Some(width / MM_PER_INCH);
        params.paper_height = Some(height / MM_PER_INCH);
    }

    if args.landscape {
        params.landscape = Some(true);
    }

    params
}

fn output_path(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> WorkerArgs {
        let mut argv = vec![
            "webprint-worker",
            "--inputMode=url",
            "--input=https://example.com/",
            "--output=/tmp/x/123",
        ];
        argv.extend_from_slice(extra);
        WorkerArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn baseline_pdf_params() {
        let params = pdf_params(&parse(&["--pdf"]));
        assert_eq!(params.print_background, Some(true));
        assert_eq!(params.margin_top, Some(0.));
        assert_eq!(params.margin_bottom, Some(0.));
        assert_eq!(params.paper_width, None);
        assert_eq!(params.landscape, None);
    }

    #[test]
    fn page_format_maps_to_paper_inches() {
        let params = pdf_params(&parse(&["--pdf", "--pageFormat=A4"]));
        assert_eq!(params.paper_width, Some(8.27));
        assert_eq!(params.paper_height, Some(11.7));
    }

    #[test]
    fn explicit_dimensions_convert_from_millimeters() {
        let params = pdf_params(&parse(&["--pdf", "--pageWidth=220", "--pageHeight=307"]));
        let width = params.paper_width.unwrap();
        let height = params.paper_height.unwrap();
        assert!((width - 220.0 / 25.4).abs() < 1e-9);
        assert!((height - 307.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn one_dimension_alone_is_ignored() {
        let params = pdf_params(&parse(&["--pdf", "--pageWidth=220"]));
        assert_eq!(params.paper_width, None);
        assert_eq!(params.paper_height, None);
    }

    #[test]
    fn format_and_dimensions_together_follow_the_last_write() {
        let params = pdf_params(&parse(&[
            "--pdf",
            "--pageFormat=A4",
            "--pageWidth=220",
            "--pageHeight=307",
        ]));
        assert!((params.paper_width.unwrap() - 220.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn landscape_flag_sets_orientation() {
        let params = pdf_params(&parse(&["--pdf", "--landscape"]));
        assert_eq!(params.landscape, Some(true));
    }

    #[test]
    fn sandbox_flag_passes_through_to_browser_args() {
        let flags = browser_args(&parse(&["--no-sandbox"]));
        assert!(flags.contains(&"--no-sandbox".to_string()));
        assert!(flags.contains(&"--disable-gpu".to_string()));
        assert!(flags.contains(&"--hide-scrollbars".to_string()));

        let flags = browser_args(&parse(&[]));
        assert!(!flags.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn output_paths_append_per_mode_extensions() {
        let args = parse(&["--pdf", "--image"]);
        assert_eq!(
            output_path(&args.output, ".pdf"),
            PathBuf::from("/tmp/x/123.pdf")
        );
        assert_eq!(
            output_path(&args.output, ".png"),
            PathBuf::from("/tmp/x/123.png")
        );
    }
}
