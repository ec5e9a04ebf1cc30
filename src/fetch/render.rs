// src/fetch/render.rs
// =============================================================================
// Script rendering: getting a page's HTML *after* its JavaScript has run.
//
// Single-page apps often ship an empty <body> and build their links in the
// browser. When the crawler is told to execute scripts it asks a
// ScriptRenderer for the final DOM and extracts links from that instead.
//
// ChromeRenderer shells out to a headless Chrome/Chromium:
//   chromium --headless --disable-gpu --dump-dom <url>
// =============================================================================

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::address::Address;
use crate::error::RenderError;

#[async_trait]
pub trait ScriptRenderer: Send + Sync {
    /// Returns the document body once client-side scripts have run.
    async fn render(&self, address: &Address) -> Result<String, RenderError>;
}

#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    binary: PathBuf,
}

impl ChromeRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new("chromium")
    }
}

#[async_trait]
impl ScriptRenderer for ChromeRenderer {
    async fn render(&self, address: &Address) -> Result<String, RenderError> {
        debug!(url = %address, binary = %self.binary.display(), "rendering page");

        let output = Command::new(&self.binary)
            .args(["--headless", "--disable-gpu", "--dump-dom"])
            .arg(address.render())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(RenderError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}
