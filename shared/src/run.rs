use futures::future::LocalBoxFuture;
use thiserror::Error;

use crate::protocol::{RunRequest, RunResponse};

pub const NETWORK_ERROR_PREFIX: &str = "Network error: ";

/// Anything that stops a run from producing a decodable response.
///
/// `Display` is the bare description; the output pane adds
/// [`NETWORK_ERROR_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request was rejected before a response arrived.
    #[error("{0}")]
    Request(String),
    /// A response arrived but its body could not be read.
    #[error("{0}")]
    Body(String),
    #[error("{0}")]
    Decode(String),
}

impl TransportError {
    pub fn output_text(&self) -> String {
        format!("{NETWORK_ERROR_PREFIX}{self}")
    }
}

/// Sends one run request to the execution service.
///
/// Implementations perform exactly one attempt and no timeout of their
/// own; the returned future owns everything it needs.
pub trait ExecutionClient {
    fn execute(&self, request: RunRequest)
    -> LocalBoxFuture<'static, Result<RunResponse, TransportError>>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::future::FutureExt;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records requests; each one waits for a reply pushed through
    /// `pending`.
    #[derive(Default)]
    pub(crate) struct FakeClient {
        pub(crate) requests: RefCell<Vec<RunRequest>>,
        pub(crate) pending: RefCell<VecDeque<oneshot::Sender<Result<RunResponse, TransportError>>>>,
    }

    impl FakeClient {
        pub(crate) fn reply(&self, outcome: Result<RunResponse, TransportError>) {
            let sender = self
                .pending
                .borrow_mut()
                .pop_front()
                .expect("no request is waiting for a reply");
            sender.send(outcome).expect("run future was dropped");
        }
    }

    impl ExecutionClient for FakeClient {
        fn execute(
            &self,
            request: RunRequest,
        ) -> LocalBoxFuture<'static, Result<RunResponse, TransportError>> {
            self.requests.borrow_mut().push(request);
            let (sender, receiver) = oneshot::channel();
            self.pending.borrow_mut().push_back(sender);
            receiver
                .map(|reply| {
                    reply.unwrap_or_else(|_| Err(TransportError::Request("cancelled".into())))
                })
                .boxed_local()
        }
    }

    #[test]
    fn network_error_text_has_prefix() {
        let error = TransportError::Request("timeout".into());
        assert_eq!(error.output_text(), "Network error: timeout");
    }

    #[test]
    fn decode_errors_read_the_same_way() {
        let error = crate::protocol::RunResponse::from_json("not json").unwrap_err();
        assert!(error.output_text().starts_with(NETWORK_ERROR_PREFIX));
        assert!(error.output_text().len() > NETWORK_ERROR_PREFIX.len());
    }
}
