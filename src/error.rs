use std::io;

use thiserror::Error;

/// Why a block could not be written. The `Display` text is what the
/// browser widget shows to the user.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Reading, creating or replacing the target failed.
    #[error("Failed to write {}: {source}", css_kind(.inline))]
    Io {
        path: String,
        inline: bool,
        #[source]
        source: io::Error,
    },
    /// Inline target whose HTML document does not exist.
    #[error("HTML file not found: {0}")]
    HtmlNotFound(String),
    /// Inline target whose HTML document has no `<style>` element.
    #[error("No <style> tag found in {0}")]
    StyleTagNotFound(String),
}

fn css_kind(inline: &bool) -> &'static str {
    if *inline {
        "inline CSS"
    } else {
        "CSS"
    }
}

impl WriteError {
    pub(crate) fn io(path: &str, inline: bool, source: io::Error) -> Self {
        WriteError::Io {
            path: path.to_string(),
            inline,
            source,
        }
    }
}

/// A `POST /api/apply` body the server cannot act on.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Failed to parse request: {0}")]
    Parse(#[from] serde_json::Error),
    /// Valid JSON, but `data` lacks what the declared `type` needs.
    #[error("Invalid request: must specify type (theme/font) and corresponding data")]
    Invalid,
}

/// Fatal server startup errors.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Port {port} is already in use.")]
    PortInUse { port: u16 },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = WriteError> = std::result::Result<T, E>;
