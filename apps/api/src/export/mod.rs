//! Document export: hands the composed markup to the renderer collaborator.
//!
//! The only recovery on renderer failure is to ship the raw markup itself and
//! report the downgraded format. Render failures never fail the request.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::models::document::ArtifactFormat;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start renderer '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("renderer exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },

    #[error("renderer produced an empty artifact")]
    EmptyOutput,

    #[error("renderer does not produce {0:?}")]
    Unsupported(ArtifactFormat),
}

/// Converts a complete markup document into a binary artifact.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, html: &str, target: ArtifactFormat) -> Result<Bytes, RenderError>;
}

/// Headless Chromium printing to PDF.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    chrome_bin: String,
    timeout: Duration,
}

impl ChromiumRenderer {
    pub fn new(chrome_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            chrome_bin: chrome_bin.into(),
            timeout,
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.chrome_bin);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render(&self, html: &str, target: ArtifactFormat) -> Result<Bytes, RenderError> {
        if target != ArtifactFormat::Pdf {
            return Err(RenderError::Unsupported(target));
        }

        // Removed with everything in it when dropped.
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");
        tokio::fs::write(&input, html).await?;

        let child = self
            .command(&input, &output)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                bin: self.chrome_bin.clone(),
                source,
            })?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        if !result.status.success() {
            return Err(RenderError::ProcessFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let pdf = tokio::fs::read(&output).await?;
        if pdf.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(Bytes::from(pdf))
    }
}

/// The artifact actually produced and its real format.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Bytes,
    pub format: ArtifactFormat,
}

/// Renders `html` to `target`, substituting the raw markup when the renderer fails.
///
/// An `Html` target never calls the renderer.
pub async fn export_with_fallback(
    renderer: &dyn DocumentRenderer,
    html: &str,
    target: ArtifactFormat,
) -> Artifact {
    if target == ArtifactFormat::Html {
        return raw_markup(html);
    }

    match renderer.render(html, target).await {
        Ok(bytes) => {
            info!("Rendered {} artifact ({} bytes)", target.as_str(), bytes.len());
            Artifact {
                bytes,
                format: target,
            }
        }
        Err(e) => {
            warn!("Render failed, falling back to raw markup: {e}");
            raw_markup(html)
        }
    }
}

fn raw_markup(html: &str) -> Artifact {
    Artifact {
        bytes: Bytes::copy_from_slice(html.as_bytes()),
        format: ArtifactFormat::Html,
    }
}
