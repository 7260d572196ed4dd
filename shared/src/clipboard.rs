//! Two-step clipboard copy: direct write first, selection-based copy second.

use std::fmt;

use futures::future::LocalBoxFuture;
use thiserror::Error;

/// Which pane a copy action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Input,
    Output,
}

impl Pane {
    /// Value of the `data-playground-pane` attribute on the pane's DOM node.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

/// Primary path, e.g. `navigator.clipboard.writeText`.
pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), String>>;
}

/// Fallback path: select the pane's rendered content and issue a copy
/// command against the selection.
pub trait SelectionCopier {
    fn copy_pane_selection(&self, pane: Pane) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard write failed for {pane} pane: {primary}; selection copy failed: {fallback}")]
    Fallback {
        pane: Pane,
        primary: String,
        fallback: String,
    },
}

pub async fn copy_text(
    text: &str,
    pane: Pane,
    writer: &impl ClipboardWriter,
    copier: &impl SelectionCopier,
) -> Result<CopyPath, ClipboardError> {
    let primary = match writer.write_text(text).await {
        Ok(()) => return Ok(CopyPath::Primary),
        Err(primary) => primary,
    };
    log::warn!("Clipboard write for {pane} pane failed ({primary}), trying selection copy");
    match copier.copy_pane_selection(pane) {
        Ok(()) => Ok(CopyPath::Fallback),
        Err(fallback) => Err(ClipboardError::Fallback {
            pane,
            primary,
            fallback,
        }),
    }
}
