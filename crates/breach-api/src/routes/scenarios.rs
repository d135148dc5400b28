//! Routes for the Scenario Catalog bounded context.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use breach_content::application::query_handlers::{
    self, ObjectiveView, ScenarioSummaryView,
};
use tracing::instrument;

use crate::state::AppState;

/// GET /scenarios
#[instrument(skip(state))]
async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioSummaryView>> {
    Json(query_handlers::list_scenarios(&state.catalog))
}

/// GET /scenarios/objectives
#[instrument(skip(state))]
async fn list_objectives(State(state): State<AppState>) -> Json<Vec<ObjectiveView>> {
    Json(query_handlers::list_objectives(&state.catalog))
}

/// Returns the router for the catalog context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scenarios", get(list_scenarios))
        .route("/scenarios/objectives", get(list_objectives))
}
