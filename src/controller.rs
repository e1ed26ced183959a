// src/controller.rs
use tokio::sync::watch;

use crate::config::SessionConfig;
use crate::errors::{CANCELLED_MESSAGE, Result};
use crate::models::{EvaluationOutcome, EvaluationRequest, EvaluationState, SkipReason};
use crate::providers::LlmProvider;
use crate::providers::gemini::extract_candidate_text;
use crate::retry::{Delivery, RetryingRequester};
use crate::score::{clamp_score, parse_score};

/// Owns the evaluation state and drives `Idle -> Loading -> Idle`.
///
/// State lives in a `watch` channel: only the controller writes to it, any
/// number of observers can [`subscribe`](Self::subscribe) to changes.
pub struct EvaluationController<P> {
    requester: RetryingRequester<P>,
    session: SessionConfig,
    state: watch::Sender<EvaluationState>,
}

impl<P: LlmProvider> EvaluationController<P> {
    pub fn new(requester: RetryingRequester<P>, session: SessionConfig) -> Self {
        let (state, _) = watch::channel(EvaluationState::default());
        Self { requester, session, state }
    }

    /// Session options from construction. Not used for scoring.
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn requester(&self) -> &RetryingRequester<P> {
        &self.requester
    }

    pub fn state(&self) -> EvaluationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EvaluationState> {
        self.state.subscribe()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.state.send_if_modified(|state| replace_if_changed(&mut state.prompt, prompt));
    }

    pub fn set_written_text(&self, written_text: impl Into<String>) {
        let written_text = written_text.into();
        self.state
            .send_if_modified(|state| replace_if_changed(&mut state.written_text, written_text));
    }

    /// Updates whichever inputs are given, notifying observers once.
    pub fn set_input(&self, prompt: Option<String>, written_text: Option<String>) {
        self.state.send_if_modified(|state| {
            let mut changed = false;
            if let Some(prompt) = prompt {
                changed |= replace_if_changed(&mut state.prompt, prompt);
            }
            if let Some(written_text) = written_text {
                changed |= replace_if_changed(&mut state.written_text, written_text);
            }
            changed
        });
    }

    /// Runs one evaluation of the current input.
    ///
    /// Does nothing when either input is empty or an evaluation is already in
    /// flight. Otherwise the state goes to Loading (score 0, no error) and
    /// returns to Idle with either a score or an error message.
    pub async fn evaluate(&self) -> EvaluationOutcome {
        let mut started = Err(SkipReason::EmptyInput);
        self.state.send_if_modified(|state| {
            if state.is_loading {
                started = Err(SkipReason::AlreadyLoading);
                return false;
            }
            if state.prompt.is_empty() || state.written_text.is_empty() {
                return false;
            }
            started = Ok(EvaluationRequest::new(&state.prompt, &state.written_text));
            state.is_loading = true;
            state.error = None;
            state.score = 0;
            true
        });

        let request = match started {
            Ok(request) => request,
            Err(reason) => {
                log::debug!("Evaluation skipped: {:?}", reason);
                return EvaluationOutcome::Skipped { reason };
            }
        };

        let guard = LoadingGuard { state: &self.state, armed: true };
        let id = uuid::Uuid::new_v4();
        log::info!(
            "Evaluation {} started ({} prompt chars, {} text chars)",
            id,
            request.prompt().len(),
            request.written_text().len()
        );

        let outcome = match self.requester.deliver(&request).await.and_then(score_delivery) {
            Ok(score) => {
                log::info!("Evaluation {} scored {}", id, score);
                EvaluationOutcome::Scored { score }
            }
            Err(e) => {
                log::error!("Evaluation {} failed: {}", id, e);
                EvaluationOutcome::Failed { message: e.user_message() }
            }
        };

        guard.finish(&outcome);
        outcome
    }
}

/// Returns the state to Idle even when `evaluate` is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<EvaluationState>,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn finish(mut self, outcome: &EvaluationOutcome) {
        self.armed = false;
        self.state.send_modify(|state| {
            state.is_loading = false;
            match outcome {
                EvaluationOutcome::Scored { score } => state.score = *score,
                EvaluationOutcome::Failed { message } => state.error = Some(message.clone()),
                EvaluationOutcome::Skipped { .. } => {}
            }
        });
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        log::warn!("Evaluation abandoned before completion");
        self.state.send_modify(|state| {
            state.is_loading = false;
            state.error = Some(CANCELLED_MESSAGE.to_string());
        });
    }
}

fn score_delivery(delivery: Delivery) -> Result<u8> {
    log::debug!(
        "Delivered after {} attempt(s), {}ms spent waiting",
        delivery.attempts,
        delivery.waited.as_millis()
    );
    let text = extract_candidate_text(&delivery.body)?;
    Ok(clamp_score(parse_score(text)))
}

fn replace_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
