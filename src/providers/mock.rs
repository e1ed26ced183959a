// src/providers/mock.rs
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Notify;

use crate::errors::{EvalError, Result};
use crate::models::EvaluationRequest;
use crate::providers::LlmProvider;

/// One scripted reply.
pub enum Step {
    /// Success status with this JSON body.
    Body(Value),
    /// Non-success status.
    Status(u16),
    /// Success status whose body did not decode.
    Garbage,
}

impl Step {
    pub fn text(text: &str) -> Self {
        Step::Body(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}))
    }
}

/// Replays a fixed script of replies, one per `send`. An exhausted script answers 500.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicU32,
    requests: Mutex<Vec<EvaluationRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Every `send` waits for a notification on `gate` before answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<EvaluationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    async fn send(&self, request: &EvaluationRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Body(body)) => Ok(body),
            Some(Step::Status(status)) => Err(EvalError::ApiError {
                status,
                body: "scripted failure".to_string(),
            }),
            Some(Step::Garbage) => Err(EvalError::InvalidBody("expected value at line 1".to_string())),
            None => Err(EvalError::ApiError {
                status: 500,
                body: "script exhausted".to_string(),
            }),
        }
    }
}
