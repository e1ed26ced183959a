// src/api/state.rs
use crate::config::AppConfig;
use crate::controller::EvaluationController;
use crate::errors::Result;
use crate::providers::gemini::GeminiProvider;
use crate::retry::{RetryPolicy, RetryingRequester};
use std::sync::Arc;

pub type Controller = EvaluationController<GeminiProvider>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controller: Arc<Controller>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let controller = Self::build_controller(&config)?;
        Ok(Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
        })
    }

    /// A controller with its own state that reuses the shared HTTP client.
    pub fn detached_controller(&self) -> Controller {
        let requester = self.controller.requester();
        EvaluationController::new(
            RetryingRequester::new(requester.provider().clone(), requester.policy()),
            self.config.session.clone(),
        )
    }

    fn build_controller(config: &AppConfig) -> Result<Controller> {
        let provider = GeminiProvider::from_config(config.gemini.clone())?;
        let requester = RetryingRequester::new(provider, RetryPolicy::from(&config.retry));
        Ok(EvaluationController::new(requester, config.session.clone()))
    }
}
