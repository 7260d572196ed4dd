//! The playground's single state record and the event handlers that
//! mutate it.

use std::future::Future;

use chrono::{DateTime, Local};
use futures_signals::signal::{Mutable, Signal, SignalExt};

use crate::clipboard::{self, ClipboardError, ClipboardWriter, CopyPath, Pane, SelectionCopier};
use crate::clock::Clock;
use crate::feedback::{CopyFeedback, CopyStatus};
use crate::protocol::{RunRequest, RunResponse};
use crate::run::{ExecutionClient, TransportError};

#[derive(Clone, Default)]
pub struct PlaygroundState {
    source_text: Mutable<String>,
    execution_result: Mutable<String>,
    /// True only while a run request is outstanding.
    run_status: Mutable<bool>,
    last_run: Mutable<Option<DateTime<Local>>>,
    last_exit_code: Mutable<Option<i64>>,
    input_feedback: CopyFeedback,
    output_feedback: CopyFeedback,
}

impl PlaygroundState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Editor pane --

    pub fn source_text(&self) -> String {
        self.source_text.get_cloned()
    }

    pub fn source_text_signal(&self) -> impl Signal<Item = String> + use<> {
        self.source_text.signal_cloned()
    }

    pub fn set_source_text(&self, text: String) {
        self.source_text.set_neq(text);
    }

    pub fn clear_source_text(&self) {
        self.source_text.set_neq(String::new());
    }

    // -- Output pane --

    pub fn execution_result(&self) -> String {
        self.execution_result.get_cloned()
    }

    pub fn execution_result_signal(&self) -> impl Signal<Item = String> + use<> {
        self.execution_result.signal_cloned()
    }

    /// Leaves the timestamp alone.
    pub fn clear_output(&self) {
        self.execution_result.set_neq(String::new());
    }

    /// Output Copy and Clear are interactive only when there is output.
    pub fn output_actions_enabled(&self) -> bool {
        !self.execution_result.lock_ref().is_empty()
    }

    pub fn output_actions_enabled_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.execution_result
            .signal_ref(|result| !result.is_empty())
            .dedupe()
    }

    pub fn last_run(&self) -> Option<DateTime<Local>> {
        self.last_run.get()
    }

    pub fn last_run_label_signal(&self) -> impl Signal<Item = Option<String>> + use<> {
        self.last_run
            .signal()
            .map(|last_run| last_run.as_ref().map(format_time_of_day))
    }

    pub fn last_exit_code(&self) -> Option<i64> {
        self.last_exit_code.get()
    }

    pub fn last_exit_code_signal(&self) -> impl Signal<Item = Option<i64>> + use<> {
        self.last_exit_code.signal()
    }

    // -- Run controller --

    pub fn is_running(&self) -> bool {
        self.run_status.get()
    }

    pub fn is_running_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.run_status.signal()
    }

    /// Starts a run unless one is already in flight.
    ///
    /// The request is dispatched and the state marked busy before this
    /// returns; the returned future settles the run and has to be driven
    /// to completion. Returns `None` when a run is already outstanding.
    pub fn trigger_run<E, C>(
        &self,
        client: &E,
        clock: C,
    ) -> Option<impl Future<Output = ()> + use<E, C>>
    where
        E: ExecutionClient,
        C: Clock + 'static,
    {
        if self.run_status.get() {
            log::warn!("Run ignored, previous run is still in flight");
            return None;
        }
        self.run_status.set(true);
        self.execution_result.set_neq(String::new());

        let request = RunRequest::new(self.source_text.get_cloned());
        log::info!("Running {} bytes of code", request.code.len());
        let response = client.execute(request);

        let this = self.clone();
        Some(async move {
            let outcome = response.await;
            this.settle_run(outcome, &clock);
        })
    }

    fn settle_run(&self, outcome: Result<RunResponse, TransportError>, clock: &impl Clock) {
        let (result, exit_code) = match outcome {
            Ok(response) => {
                log::info!("Run finished, return code {:?}", response.returncode);
                (response.output_text(), response.returncode)
            }
            Err(error) => {
                log::warn!("Run failed: {error}");
                (error.output_text(), None)
            }
        };
        self.execution_result.set(result);
        self.last_exit_code.set(exit_code);
        self.last_run.set(Some(clock.now()));
        self.run_status.set(false);
    }

    // -- Clipboard --

    pub fn copy_feedback(&self, pane: Pane) -> &CopyFeedback {
        match pane {
            Pane::Input => &self.input_feedback,
            Pane::Output => &self.output_feedback,
        }
    }

    fn pane_text(&self, pane: Pane) -> String {
        match pane {
            Pane::Input => self.source_text.get_cloned(),
            Pane::Output => self.execution_result.get_cloned(),
        }
    }

    /// Copies the pane's text and shows the outcome on its copy button.
    pub async fn copy_pane(
        &self,
        pane: Pane,
        writer: &impl ClipboardWriter,
        copier: &impl SelectionCopier,
        clock: &impl Clock,
    ) -> Result<CopyPath, ClipboardError> {
        let text = self.pane_text(pane);
        let result = clipboard::copy_text(&text, pane, writer, copier).await;
        match &result {
            Ok(_) => self.copy_feedback(pane).show(CopyStatus::Copied, clock),
            Err(error) => {
                log::error!("{error}");
                self.copy_feedback(pane).show(CopyStatus::Failed, clock);
            }
        }
        result
    }
}

pub fn format_time_of_day(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::{FakeCopier, FakeWriter};
    use crate::clock::TestClock;
    use crate::feedback::COPY_FEEDBACK_DURATION_MS;
    use crate::protocol::NO_OUTPUT;
    use crate::run::tests::FakeClient;
    use chrono::TimeZone;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;

    fn response(json: &str) -> RunResponse {
        RunResponse::from_json(json).unwrap()
    }

    /// Triggers a run, replies with `outcome` and drives it to the end.
    fn run_to_completion(
        state: &PlaygroundState,
        clock: &TestClock,
        outcome: Result<RunResponse, TransportError>,
    ) -> FakeClient {
        let client = FakeClient::default();
        let run = state.trigger_run(&client, clock.clone()).unwrap();
        client.reply(outcome);
        block_on(run);
        client
    }

    #[test]
    fn starts_empty() {
        let state = PlaygroundState::new();
        assert_eq!(state.source_text(), "");
        assert_eq!(state.execution_result(), "");
        assert!(!state.is_running());
        assert!(state.last_run().is_none());
        assert!(!state.output_actions_enabled());
    }

    #[test]
    fn request_carries_exact_source_text() {
        for code in ["", "!(+ 2 3)", "  (= (f $x) $x)\n\n!(f \"ü\")\t"] {
            let state = PlaygroundState::new();
            state.set_source_text(code.to_owned());
            let client = run_to_completion(&state, &TestClock::new(), Ok(RunResponse::default()));
            assert_eq!(*client.requests.borrow(), [RunRequest::new(code)]);
        }
    }

    #[test]
    fn output_prefers_stdout_then_stderr_then_placeholder() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();

        run_to_completion(&state, &clock, Ok(response(r#"{"stdout": "5"}"#)));
        assert_eq!(state.execution_result(), "5");

        run_to_completion(&state, &clock, Ok(response(r#"{"stderr": "err"}"#)));
        assert_eq!(state.execution_result(), "err");

        run_to_completion(&state, &clock, Ok(response("{}")));
        assert_eq!(state.execution_result(), NO_OUTPUT);
    }

    #[test]
    fn transport_failure_is_shown_with_prefix() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        run_to_completion(
            &state,
            &clock,
            Err(TransportError::Request("timeout".into())),
        );
        assert_eq!(state.execution_result(), "Network error: timeout");
        assert!(state.last_run().is_some());
        assert!(!state.is_running());
    }

    #[test]
    fn exit_code_follows_last_run() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();

        run_to_completion(&state, &clock, Ok(response(r#"{"stderr": "boom", "returncode": 1}"#)));
        assert_eq!(state.last_exit_code(), Some(1));

        run_to_completion(&state, &clock, Err(TransportError::Request("offline".into())));
        assert_eq!(state.last_exit_code(), None);
    }

    #[test]
    fn running_only_between_trigger_and_settlement() {
        for outcome in [
            Ok(response(r#"{"stdout": "ok"}"#)),
            Err(TransportError::Request("Failed to fetch".into())),
        ] {
            let clock = TestClock::new();
            let state = PlaygroundState::new();
            state.execution_result.set("previous".into());
            let client = FakeClient::default();
            let mut pool = LocalPool::new();

            assert!(!state.is_running());
            let run = state.trigger_run(&client, clock.clone()).unwrap();
            assert!(state.is_running());
            assert_eq!(state.execution_result(), "", "output cleared on dispatch");

            pool.spawner().spawn_local(run).unwrap();
            pool.run_until_stalled();
            assert!(state.is_running(), "still awaiting the response");
            assert!(state.last_run().is_none());

            client.reply(outcome);
            pool.run_until_stalled();
            assert!(!state.is_running());
            assert!(state.last_run().is_some());
            assert!(!state.execution_result().is_empty());
        }
    }

    #[test]
    fn second_trigger_while_running_sends_nothing() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        let client = FakeClient::default();

        let run = state.trigger_run(&client, clock.clone()).unwrap();
        assert!(state.trigger_run(&client, clock.clone()).is_none());
        assert_eq!(client.requests.borrow().len(), 1);

        client.reply(Ok(response(r#"{"stdout": "1"}"#)));
        block_on(run);

        assert!(state.trigger_run(&client, clock.clone()).is_some());
        assert_eq!(client.requests.borrow().len(), 2);
    }

    #[test]
    fn timestamp_taken_at_settlement() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        let client = FakeClient::default();

        let run = state.trigger_run(&client, clock.clone()).unwrap();
        clock.advance_by(2500);
        let settled_at = clock.now();
        client.reply(Ok(RunResponse::default()));
        block_on(run);

        assert_eq!(state.last_run(), Some(settled_at));
    }

    #[test]
    fn clear_editor_empties_source() {
        let state = PlaygroundState::new();
        state.set_source_text("!(println! hi)".into());
        state.clear_source_text();
        assert_eq!(state.source_text(), "");
        state.clear_source_text();
        assert_eq!(state.source_text(), "");
    }

    #[test]
    fn clear_output_keeps_timestamp() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        run_to_completion(&state, &clock, Ok(response(r#"{"stdout": "5"}"#)));
        let last_run = state.last_run();
        assert!(state.output_actions_enabled());

        state.clear_output();
        assert_eq!(state.execution_result(), "");
        assert_eq!(state.last_run(), last_run);
        assert!(!state.output_actions_enabled());
    }

    #[test]
    fn copy_marks_only_its_own_pane() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        state.set_source_text("!(+ 1 1)".into());
        let writer = FakeWriter::default();
        let copier = FakeCopier::default();

        let path = block_on(state.copy_pane(Pane::Input, &writer, &copier, &clock)).unwrap();
        assert_eq!(path, CopyPath::Primary);
        assert_eq!(*writer.written.borrow(), ["!(+ 1 1)"]);
        assert!(state.copy_feedback(Pane::Input).is_copied());
        assert!(!state.copy_feedback(Pane::Output).is_copied());

        clock.advance_by(u64::from(COPY_FEEDBACK_DURATION_MS));
        assert!(!state.copy_feedback(Pane::Input).is_copied());
    }

    #[test]
    fn rapid_copies_extend_feedback() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        let writer = FakeWriter::default();
        let copier = FakeCopier::default();

        block_on(state.copy_pane(Pane::Input, &writer, &copier, &clock)).unwrap();
        clock.advance_by(800);
        block_on(state.copy_pane(Pane::Input, &writer, &copier, &clock)).unwrap();

        clock.advance_by(800);
        assert!(state.copy_feedback(Pane::Input).is_copied());
        clock.advance_by(800);
        assert!(!state.copy_feedback(Pane::Input).is_copied());
    }

    #[test]
    fn fallback_copy_still_gives_feedback() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        state.execution_result.set("5".into());
        let writer = FakeWriter {
            fail_with: Some("NotAllowedError".into()),
            ..Default::default()
        };
        let copier = FakeCopier::default();

        let path = block_on(state.copy_pane(Pane::Output, &writer, &copier, &clock)).unwrap();
        assert_eq!(path, CopyPath::Fallback);
        assert!(state.copy_feedback(Pane::Output).is_copied());
    }

    #[test]
    fn double_copy_failure_is_reported() {
        let clock = TestClock::new();
        let state = PlaygroundState::new();
        let writer = FakeWriter {
            fail_with: Some("NotAllowedError".into()),
            ..Default::default()
        };
        let copier = FakeCopier {
            fail_with: Some("no selection".into()),
            ..Default::default()
        };

        let result = block_on(state.copy_pane(Pane::Input, &writer, &copier, &clock));
        assert!(result.is_err());
        let feedback = state.copy_feedback(Pane::Input);
        assert_eq!(feedback.status(), CopyStatus::Failed);
        assert!(!feedback.is_copied());

        clock.advance_by(u64::from(COPY_FEEDBACK_DURATION_MS));
        assert_eq!(feedback.status(), CopyStatus::Idle);
    }

    #[test]
    fn time_of_day_format() {
        let timestamp = Local.with_ymd_and_hms(2026, 10, 15, 9, 5, 7).unwrap();
        assert_eq!(format_time_of_day(&timestamp), "09:05:07");
    }
}
