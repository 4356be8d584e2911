//! Worker argument resolution.
//!
//! The orchestrator renders every option as either a bare flag or
//! `name=value`; clap validates the three required keys before any browser
//! resource is acquired. The derivations below (auth, viewport) are pure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Where the page content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Read the file at `--input` and set it as the document content.
    File,
    /// Navigate to the URL at `--input`.
    Url,
}

/// Named paper sizes, mapped to CDP paper dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageFormat {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
    Ledger,
}

impl PageFormat {
    /// Paper (width, height) in inches.
    pub fn paper_size(self) -> (f64, f64) {
        match self {
            PageFormat::A0 => (33.1, 46.8),
            PageFormat::A1 => (23.4, 33.1),
            PageFormat::A2 => (16.54, 23.4),
            PageFormat::A3 => (11.7, 16.54),
            PageFormat::A4 => (8.27, 11.7),
            PageFormat::A5 => (5.83, 8.27),
            PageFormat::A6 => (4.13, 5.83),
            PageFormat::Letter => (8.5, 11.0),
            PageFormat::Legal => (8.5, 14.0),
            PageFormat::Tabloid => (11.0, 17.0),
            PageFormat::Ledger => (17.0, 11.0),
        }
    }
}

/// Command-line surface of the rendering worker.
#[derive(Debug, Parser)]
#[command(name = "webprint-worker", version, about = "Headless rendering worker")]
pub struct WorkerArgs {
    /// How to interpret `--input`.
    #[arg(long = "inputMode", value_enum, ignore_case = true)]
    pub input_mode: InputMode,

    /// Path of the staged HTML file, or an absolute URL.
    #[arg(long)]
    pub input: String,

    /// Output base path; per-mode extensions are appended.
    #[arg(long)]
    pub output: PathBuf,

    /// Render the page to `<output>.pdf`.
    #[arg(long)]
    pub pdf: bool,

    /// Capture a full-page screenshot to `<output>.png`.
    #[arg(long)]
    pub image: bool,

    /// Named paper size for PDF output.
    #[arg(long = "pageFormat", value_enum, ignore_case = true)]
    pub page_format: Option<PageFormat>,

    /// Explicit paper width in millimeters (needs `--pageHeight`).
    #[arg(long = "pageWidth")]
    pub page_width: Option<f64>,

    /// Explicit paper height in millimeters (needs `--pageWidth`).
    #[arg(long = "pageHeight")]
    pub page_height: Option<f64>,

    /// Viewport width in pixels (needs `--viewportHeight`).
    #[arg(long = "viewportWidth")]
    pub viewport_width: Option<u32>,

    /// Viewport height in pixels (needs `--viewportWidth`).
    #[arg(long = "viewportHeight")]
    pub viewport_height: Option<u32>,

    /// Landscape orientation for PDF output.
    #[arg(long)]
    pub landscape: bool,

    /// HTTP basic-auth username (needs `--httpPass`).
    #[arg(long = "httpUser")]
    pub http_user: Option<String>,

    /// HTTP basic-auth password (needs `--httpUser`).
    #[arg(long = "httpPass")]
    pub http_pass: Option<String>,

    /// Run the browser without its sandbox (set when no SUID sandbox helper
    /// is configured on the host).
    #[arg(long = "no-sandbox")]
    pub no_sandbox: bool,
}

impl WorkerArgs {
    /// Basic-auth credentials, present only when both halves were passed.
    pub fn http_auth(&self) -> Option<(&str, &str)> {
        match (self.http_user.as_deref(), self.http_pass.as_deref()) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    /// Viewport dimensions, present only when both were passed; the browser
    /// default applies otherwise.
    pub fn viewport(&self) -> Option<(u32, u32)> {
        match (self.viewport_width, self.viewport_height) {
            (Some(width), Some(height)) => Some((width, height)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> WorkerArgs {
        let mut argv = vec!["webprint-worker"];
        argv.extend_from_slice(args);
        WorkerArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parses_the_orchestrator_rendering() {
        let args = parse(&[
            "--inputMode=file",
            "--input=/tmp/x/123.html",
            "--pageFormat=A4",
            "--viewportWidth=794",
            "--viewportHeight=1122",
            "--pdf",
            "--output=/tmp/x/123",
            "--no-sandbox",
        ]);

        assert_eq!(args.input_mode, InputMode::File);
        assert_eq!(args.input, "/tmp/x/123.html");
        assert_eq!(args.output, PathBuf::from("/tmp/x/123"));
        assert_eq!(args.page_format, Some(PageFormat::A4));
        assert!(args.pdf);
        assert!(!args.image);
        assert!(args.no_sandbox);
    }

    #[test]
    fn missing_required_keys_fail_before_anything_runs() {
        for argv in [
            vec!["webprint-worker", "--input=x", "--output=y"],
            vec!["webprint-worker", "--inputMode=url", "--output=y"],
            vec!["webprint-worker", "--inputMode=url", "--input=x"],
        ] {
            assert!(WorkerArgs::try_parse_from(argv).is_err());
        }
    }

    #[test]
    fn unknown_input_mode_is_rejected() {
        let argv = vec![
            "webprint-worker",
            "--inputMode=ftp",
            "--input=x",
            "--output=y",
        ];
        assert!(WorkerArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn auth_requires_both_halves() {
        let base = ["--inputMode=url", "--input=https://e.com", "--output=/tmp/o"];

        let mut with_user = base.to_vec();
        with_user.push("--httpUser=stable");
        assert_eq!(parse(&with_user).http_auth(), None);

        let mut with_both = with_user.clone();
        with_both.push("--httpPass=secret");
        assert_eq!(parse(&with_both).http_auth(), Some(("stable", "secret")));
    }

    #[test]
    fn viewport_requires_both_dimensions() {
        let base = ["--inputMode=url", "--input=https://e.com", "--output=/tmp/o"];

        let mut partial = base.to_vec();
        partial.push("--viewportWidth=794");
        assert_eq!(parse(&partial).viewport(), None);

        let mut full = partial.clone();
        full.push("--viewportHeight=1122");
        assert_eq!(parse(&full).viewport(), Some((794, 1122)));
    }

    #[test]
    fn page_format_names_are_case_insensitive() {
        let base = ["--inputMode=url", "--input=https://e.com", "--output=/tmp/o"];
        let mut lower = base.to_vec();
        lower.push("--pageFormat=a4");
        assert_eq!(parse(&lower).page_format, Some(PageFormat::A4));

        let mut named = base.to_vec();
        named.push("--pageFormat=Letter");
        assert_eq!(parse(&named).page_format, Some(PageFormat::Letter));
    }
}
