use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::adapters::storage::LocalStorage;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::DeckPipeline;
use crate::core::ConfigProvider;
use crate::domain::model::{AnalysisReport, InputSources, RunRequest, ValueSource};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::utils::validation::Validate;

pub const HOME_MESSAGE: &str = "EDHREC Deck Analyzer API is running.";

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: &'static str,
    pub results: AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: HOME_MESSAGE,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn run_analysis(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    tracing::info!(
        commander = %request.commander,
        max_decks = request.max_decks,
        min_price = request.min_price,
        max_price = request.max_price,
        "Starting analysis run"
    );

    let storage = LocalStorage::new(state.context.config.output_path());
    let pipeline = DeckPipeline::new(
        state.context.clone(),
        storage,
        request,
        InputSources::all(ValueSource::Api),
    );
    let engine = EtlEngine::new(pipeline);

    let (results, output_path) = if state.write_outputs {
        let outcome = engine.run().await?;
        (outcome.report, Some(outcome.output_path))
    } else {
        (engine.analyze().await?, None)
    };

    Ok(Json(RunResponse {
        status: "complete",
        results,
        output_path,
    }))
}
