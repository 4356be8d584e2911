//! Invocation orchestrator.
//!
//! A [`Generator`] turns its configuration, an optional preset and per-call
//! options into a fully-specified worker command line, manages the temp-file
//! lifecycle of one generation, spawns the bounded worker process and
//! packages its outcome.
//!
//! Option precedence, resolved through overwrite-by-key: options set on the
//! generator < input staging < preset (defaults, then overrides) < options
//! the orchestrator owns for the run (mode flags, output path, credentials,
//! sandbox flag). All layers are composed into a fresh map per call; nothing
//! shared is mutated.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::mode::Mode;
use crate::options::OptionMap;
use crate::preset::Preset;
use crate::process;

/// Environment variable carrying the Chromium SUID sandbox helper path.
pub const CHROME_SANDBOX_ENV: &str = "CHROME_DEVEL_SANDBOX";

/// Result of one successful generate call.
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    /// The full command line the worker was spawned with.
    pub command: Vec<String>,
    /// Captured stdout of the worker.
    pub console: String,
    /// Path of the rendered PDF, when PDF output was selected.
    pub pdf: Option<PathBuf>,
    /// Path of the rendered PNG, when image output was selected.
    pub image: Option<PathBuf>,
}

/// Everything `generate` needs to spawn the worker, resolved up front.
#[derive(Debug)]
struct Invocation {
    command: Vec<String>,
    env: Vec<(String, String)>,
    pdf: Option<PathBuf>,
    image: Option<PathBuf>,
}

/// Host-side orchestrator for one-at-a-time HTML/URL rendering.
///
/// Each instance owns a temp identity computed at construction; every temp
/// path derived from the instance shares that base name, so the HTML input
/// and the PDF/PNG outputs of a call line up. Construct a new instance per
/// logical job to get a fresh identity.
pub struct Generator {
    config: GeneratorConfig,
    preset: Option<Box<dyn Preset>>,
    options: OptionMap,
    identity: String,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            preset: None,
            options: OptionMap::new(),
            identity: temp_identity(),
        }
    }

    /// Attach or clear the preset merged into every subsequent generate
    /// call.
    pub fn set_preset(&mut self, preset: Option<Box<dyn Preset>>) {
        self.preset = preset;
    }

    /// Set a bare flag for subsequent generate calls.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.options.set_flag(name);
    }

    /// Set a `name=value` option for subsequent generate calls.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.set_value(name, value);
    }

    /// Overlay a whole option map, overwriting by key.
    pub fn set_options(&mut self, options: &OptionMap) {
        self.options.extend(options);
    }

    /// Render an HTML document.
    ///
    /// The document is staged into a temp `.html` file that is deleted on
    /// every exit path, success or failure.
    #[instrument(skip(self, html))]
    pub async fn generate_from_html(
        &self,
        html: &str,
        mode: Mode,
    ) -> Result<GeneratorOutput, GeneratorError> {
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        let html_path = self.temp_file_path(".html");
        tokio::fs::write(&html_path, html).await?;
        let _cleanup = TempFileGuard::new(html_path.clone());

        let mut staged = OptionMap::new();
        staged.set_value("--inputMode", "file");
        staged.set_value("--input", html_path.display().to_string());

        self.generate(staged, mode).await
    }

    /// Render the document behind an absolute URL. No temp input file is
    /// created.
    #[instrument(skip(self))]
    pub async fn generate_from_url(
        &self,
        url: &str,
        mode: Mode,
    ) -> Result<GeneratorOutput, GeneratorError> {
        let mut staged = OptionMap::new();
        staged.set_value("--inputMode", "url");
        staged.set_value("--input", url);

        self.generate(staged, mode).await
    }

    async fn generate(
        &self,
        staged: OptionMap,
        mode: Mode,
    ) -> Result<GeneratorOutput, GeneratorError> {
        let invocation = self.prepare(staged, mode);

        // The worker writes its outputs next to the staged input.
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        info!(worker = %self.config.worker_command, mode = mode.bits(), "spawning render worker");
        debug!(command = ?invocation.command, "assembled worker command");

        let output = process::run(
            &invocation.command,
            &invocation.env,
            Duration::from_secs(self.config.timeout),
        )
        .await?;

        info!("render worker finished");

        Ok(GeneratorOutput {
            command: invocation.command,
            console: output.stdout,
            pdf: invocation.pdf,
            image: invocation.image,
        })
    }

    /// Compose the option layers and resolve command, environment and output
    /// paths. Pure with respect to the filesystem and process table.
    fn prepare(&self, staged: OptionMap, mode: Mode) -> Invocation {
        let mut options = self.options.merge(&staged);
        if let Some(preset) = &self.preset {
            options.extend(&preset.options());
        }

        let base = self.temp_file_path("");
        let mut pdf = None;
        let mut image = None;

        if mode.pdf() {
            options.set_flag("--pdf");
            pdf = Some(append_suffix(&base, ".pdf"));
        }
        if mode.image() {
            options.set_flag("--image");
            image = Some(append_suffix(&base, ".png"));
        }

        // No suffix here; the worker appends its own per-mode extensions.
        options.set_value("--output", base.display().to_string());

        if let Some(user) = &self.config.http_user {
            options.set_value("--httpUser", user);
        }
        if let Some(pass) = &self.config.http_pass {
            options.set_value("--httpPass", pass);
        }

        let mut env = Vec::new();
        match &self.config.sandbox {
            Some(sandbox) => env.push((CHROME_SANDBOX_ENV.to_string(), sandbox.clone())),
            None => options.set_flag("--no-sandbox"),
        }

        let mut command = vec![self.config.worker_command.clone()];
        command.extend(options.render());

        Invocation {
            command,
            env,
            pdf,
            image,
        }
    }

    /// Temp path sharing this instance's identity, with `suffix` appended
    /// verbatim (a blank suffix contributes nothing).
    fn temp_file_path(&self, suffix: &str) -> PathBuf {
        self.config
            .temp_dir
            .join(format!("{}{}", self.identity, suffix.trim()))
    }
}

/// Process-scoped token of the form `<epoch-seconds>_-_<random-hash>`.
///
/// Collision avoidance across concurrent instances sharing a temp directory
/// is probabilistic only; there is no retry on collision.
fn temp_identity() -> String {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}_-_{:032x}", epoch, rand::random::<u128>())
}

fn append_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

/// Deletes the wrapped temp file when dropped, on every exit path.
struct TempFileGuard(PathBuf);

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self(path)
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.0) {
            warn!(path = %self.0.display(), %error, "failed to delete temp html input");
        }
    }
}
