use crate::{config::Config, service::AttemptSearchService};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub service: AttemptSearchService,
    pub config: Config,
}

impl FromRef<AppState> for AttemptSearchService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
