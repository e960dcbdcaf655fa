//! Clipboard export
//!
//! The platform clipboard utility is tried first. When none is installed or
//! every one fails, the document is sent to the terminal as an OSC 52
//! escape sequence, which most terminal emulators turn into a clipboard
//! write.

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use base64::Engine;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard utility available")]
    Unavailable,

    #[error("clipboard write failed: {0}")]
    Failed(String),

    #[error("clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ClipboardBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// A clipboard utility reading the text from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl ClipboardTool {
    const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

/// Utilities to try, in order, for the current platform
pub fn platform_tools(wayland: bool) -> Vec<ClipboardTool> {
    if cfg!(target_os = "macos") {
        vec![ClipboardTool::new("pbcopy", &[])]
    } else if cfg!(windows) {
        vec![ClipboardTool::new("clip", &[])]
    } else {
        let mut tools = Vec::new();
        if wayland {
            tools.push(ClipboardTool::new("wl-copy", &[]));
        }
        tools.push(ClipboardTool::new("xclip", &["-selection", "clipboard"]));
        tools.push(ClipboardTool::new("xsel", &["--clipboard", "--input"]));
        tools
    }
}

/// Platform clipboard through external utilities
pub struct SystemClipboard {
    tools: Vec<ClipboardTool>,
}

impl SystemClipboard {
    pub fn detect() -> Self {
        Self::with_tools(platform_tools(std::env::var_os("WAYLAND_DISPLAY").is_some()))
    }

    pub fn with_tools(tools: Vec<ClipboardTool>) -> Self {
        Self { tools }
    }

    async fn run(tool: &ClipboardTool, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(tool.program)
            .args(tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Failed(format!(
                "{} exited with {}: {}",
                tool.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

#[async_trait]
impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &str {
        "system clipboard"
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last = ClipboardError::Unavailable;
        for tool in &self.tools {
            match Self::run(tool, text).await {
                Ok(()) => {
                    debug!(program = tool.program, "copied with clipboard utility");
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(program = tool.program, "clipboard utility not installed");
                }
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}

/// OSC 52 terminal escape sequence written to `out`
pub struct Osc52Clipboard<W> {
    out: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stderr> {
    /// Stderr, so a redirected stdout does not swallow the sequence
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

#[async_trait]
impl<W: Write + Send> ClipboardBackend for Osc52Clipboard<W> {
    fn name(&self) -> &str {
        "terminal (OSC 52)"
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self.out.lock();
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Which path ended up holding the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Primary,
    Fallback,
}

/// Primary backend first, fallback on any primary failure
pub struct ClipboardExporter {
    primary: Box<dyn ClipboardBackend>,
    fallback: Box<dyn ClipboardBackend>,
}

impl ClipboardExporter {
    pub fn new(primary: Box<dyn ClipboardBackend>, fallback: Box<dyn ClipboardBackend>) -> Self {
        Self { primary, fallback }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemClipboard::detect()), Box::new(Osc52Clipboard::stderr()))
    }

    pub fn fallback_name(&self) -> &str {
        self.fallback.name()
    }

    pub async fn export(&self, text: &str) -> Result<CopyPath, ClipboardError> {
        match self.primary.write(text).await {
            Ok(()) => Ok(CopyPath::Primary),
            Err(e) => {
                warn!(
                    error = %e,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "clipboard write failed, using fallback"
                );
                self.fallback.write(text).await?;
                Ok(CopyPath::Fallback)
            }
        }
    }
}
