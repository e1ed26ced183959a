// src/models.rs
use serde::{Deserialize, Serialize};

use crate::score::BarStyle;

/// Instruction sent alongside every evaluation. Forces a bare numeric answer.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert content assessment tool. Your only task is to analyze the 'Target Prompt' and the 'Written Text'. Assign a score from 0 to 100 to the 'Written Text' based on how relevant and closely it matches the 'Target Prompt'. 0 means no match, 100 means a perfect match. Your response MUST be ONLY the number, with no other words, explanation, or punctuation. If the text is empty or the request is non-sensical, output 0.";

/// The two inputs captured at the moment an evaluation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    prompt: String,
    written_text: String,
}

impl EvaluationRequest {
    pub fn new(prompt: impl Into<String>, written_text: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), written_text: written_text.into() }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn written_text(&self) -> &str {
        &self.written_text
    }

    /// Both inputs folded into the single user turn the model sees.
    pub fn user_query(&self) -> String {
        format!("Target Prompt: \"{}\"\n\nWritten Text: \"{}\"", self.prompt, self.written_text)
    }
}

/// Observable state of an evaluation controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationState {
    pub prompt: String,
    pub written_text: String,
    pub is_loading: bool,
    pub score: u8,
    pub error: Option<String>,
}

impl EvaluationState {
    /// True when the trigger should be enabled.
    pub fn can_evaluate(&self) -> bool {
        !self.is_loading && !self.prompt.is_empty() && !self.written_text.is_empty()
    }

    pub fn bar_style(&self) -> BarStyle {
        BarStyle::for_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyInput,
    AlreadyLoading,
}

/// What a single call to `evaluate` produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Scored { score: u8 },
    Failed { message: String },
    Skipped { reason: SkipReason },
}

/// State plus everything the page derives from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub state: EvaluationState,
    pub can_evaluate: bool,
    pub bar: BarStyle,
}

impl From<EvaluationState> for StateSnapshot {
    fn from(state: EvaluationState) -> Self {
        Self {
            can_evaluate: state.can_evaluate(),
            bar: state.bar_style(),
            state,
        }
    }
}

/// Input accepted by the HTTP surface. Field names follow the page's form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputUpdate {
    pub prompt: Option<String>,
    pub written_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_query_format() {
        let request = EvaluationRequest::new("Write a haiku", "Leaves fall");
        assert_eq!(
            request.user_query(),
            "Target Prompt: \"Write a haiku\"\n\nWritten Text: \"Leaves fall\""
        );
    }

    #[test]
    fn test_can_evaluate_requires_both_inputs() {
        let mut state = EvaluationState::default();
        assert!(!state.can_evaluate());
        state.prompt = "p".to_string();
        assert!(!state.can_evaluate());
        state.written_text = "t".to_string();
        assert!(state.can_evaluate());
        state.is_loading = true;
        assert!(!state.can_evaluate());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let state = EvaluationState {
            prompt: "p".to_string(),
            written_text: "t".to_string(),
            is_loading: false,
            score: 64,
            error: None,
        };
        let value = serde_json::to_value(StateSnapshot::from(state)).unwrap();
        assert_eq!(value["writtenText"], json!("t"));
        assert_eq!(value["isLoading"], json!(false));
        assert_eq!(value["canEvaluate"], json!(true));
        assert_eq!(value["bar"]["widthPercent"], json!(64));
        assert_eq!(value["error"], json!(null));
    }

    #[test]
    fn test_outcome_serialization() {
        let value = serde_json::to_value(EvaluationOutcome::Skipped {
            reason: SkipReason::EmptyInput,
        })
        .unwrap();
        assert_eq!(value, json!({"status": "skipped", "reason": "empty_input"}));
    }
}
