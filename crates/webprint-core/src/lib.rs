//! Turn HTML documents or URLs into PDFs and full-page PNGs by driving a
//! headless browser out-of-process.
//!
//! The crate is the host-side half of a two-process design: a [`Generator`]
//! assembles a command line from its configuration, an optional [`Preset`]
//! and per-call options, spawns the `webprint-worker` binary with a hard
//! wall-clock timeout, and packages the worker's outcome into a
//! [`GeneratorOutput`]. The worker owns the actual browser session.
//!
//! # Example
//!
//! ```no_run
//! use webprint_core::{Generator, GeneratorConfig, Mode};
//!
//! # async fn example() -> Result<(), webprint_core::GeneratorError> {
//! let generator = Generator::new(GeneratorConfig::default());
//! let output = generator
//!     .generate_from_html("<html><body>hi</body></html>", Mode::PDF)
//!     .await?;
//!
//! if let Some(pdf) = &output.pdf {
//!     println!("rendered {}", pdf.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Presets bundle reusable option sets; anything the orchestrator sets for
//! the run itself (mode flags, output path, credentials, sandbox flag)
//! always wins over preset values.

pub mod config;
pub mod error;
pub mod generator;
pub mod mode;
pub mod options;
pub mod preset;

mod process;

// Re-export main types for convenience
pub use config::GeneratorConfig;
pub use error::GeneratorError;
pub use generator::{Generator, GeneratorOutput, CHROME_SANDBOX_ENV};
pub use mode::Mode;
pub use options::{OptionEntry, OptionMap};
pub use preset::{A4PortraitPrint, A4PortraitWeb, Preset};
