// src/api/handlers/evaluate.rs
use actix_web::{error, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::AppState;
use crate::models::{EvaluationOutcome, InputUpdate, SkipReason, StateSnapshot};

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub outcome: EvaluationOutcome,
    pub state: StateSnapshot,
}

/// Body of the stateless scoring endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub written_text: String,
}

/// GET /api/v1/state
pub async fn get_state(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(StateSnapshot::from(state.controller.state())))
}

/// PUT /api/v1/input
pub async fn update_input(
    state: web::Data<AppState>,
    req: web::Json<InputUpdate>,
) -> Result<HttpResponse> {
    let update = req.into_inner();
    state.controller.set_input(update.prompt, update.written_text);
    Ok(HttpResponse::Ok().json(StateSnapshot::from(state.controller.state())))
}

/// POST /api/v1/evaluate
///
/// Optionally takes the input along with the trigger. An empty body evaluates
/// the stored input; a body that is not a valid input update is a 400. The
/// evaluation runs on its own task so a dropped connection cannot cut it short.
pub async fn run_evaluation(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    if !body.trim_ascii().is_empty() {
        let update: InputUpdate = match serde_json::from_slice(&body) {
            Ok(update) => update,
            Err(e) => {
                log::warn!("Rejected evaluate body: {}", e);
                return Ok(HttpResponse::BadRequest()
                    .json(json!({ "error": format!("Invalid input: {}", e) })));
            }
        };
        state.controller.set_input(update.prompt, update.written_text);
    }

    let controller = state.controller.clone();
    let outcome = actix_web::rt::spawn(async move { controller.evaluate().await })
        .await
        .map_err(|e| {
            log::error!("Evaluation task failed: {}", e);
            error::ErrorInternalServerError("evaluation task failed")
        })?;

    let response = EvaluateResponse {
        outcome: outcome.clone(),
        state: StateSnapshot::from(state.controller.state()),
    };

    Ok(match outcome {
        EvaluationOutcome::Skipped { reason: SkipReason::AlreadyLoading } => {
            HttpResponse::Conflict().json(response)
        }
        EvaluationOutcome::Skipped { reason: SkipReason::EmptyInput } => {
            HttpResponse::UnprocessableEntity().json(response)
        }
        _ => HttpResponse::Ok().json(response),
    })
}

/// POST /api/v1/score
///
/// One-shot scoring that leaves the page's state alone: `{ score }` on
/// success, `{ error }` with a 500 otherwise. Empty input scores 0 without
/// calling the model.
pub async fn score(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let controller = state.detached_controller();
    controller.set_input(Some(req.prompt), Some(req.written_text));

    Ok(match controller.evaluate().await {
        EvaluationOutcome::Scored { score } => HttpResponse::Ok().json(json!({ "score": score })),
        EvaluationOutcome::Skipped { .. } => HttpResponse::Ok().json(json!({ "score": 0 })),
        EvaluationOutcome::Failed { message } => {
            HttpResponse::InternalServerError().json(json!({ "error": message }))
        }
    })
}
