//! Platform-independent core of the PeTTa playground.
//!
//! Everything the view does goes through [`PlaygroundState`]; browser
//! specifics (fetch, clipboard, timers) plug in through the traits in
//! [`run`], [`clipboard`] and [`clock`].

pub mod clipboard;
pub mod clock;
pub mod config;
pub mod feedback;
pub mod protocol;
pub mod run;
pub mod state;

pub use clipboard::{ClipboardError, ClipboardWriter, CopyPath, Pane, SelectionCopier};
pub use clock::{Clock, TestClock};
pub use config::EndpointConfig;
pub use feedback::{COPY_FEEDBACK_DURATION_MS, CopyFeedback, CopyStatus};
pub use protocol::{NO_OUTPUT, RunRequest, RunResponse};
pub use run::{ExecutionClient, NETWORK_ERROR_PREFIX, TransportError};
pub use state::PlaygroundState;
