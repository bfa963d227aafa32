use crate::book::{Confirmation, Outcome};
use crate::breakdown::Breakdown;
use crate::display::CounterDisplay;
use crate::errors::AppError;
use crate::models::{
    ConfirmQuery, CounterBreakdown, CounterDraft, CounterRecord, ImportQuery, ImportResponse, ResetAllResponse,
};
use crate::state::AppState;
use crate::stats::{build_stats_at, StatsResponse};
use crate::storage::{clear_counters, persist_counters};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

pub async fn list_counters(State(state): State<AppState>) -> Json<Vec<CounterRecord>> {
    let book = state.book.lock().await;
    Json(book.counters().to_vec())
}

pub async fn create_counter(
    State(state): State<AppState>,
    Json(draft): Json<CounterDraft>,
) -> Result<(StatusCode, Json<CounterRecord>), AppError> {
    let mut book = state.book.lock().await;
    let record = book.create(draft, state.clock.now())?;
    persist_counters(&state.data_path, book.counters()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn edit_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<CounterDraft>,
) -> Result<Json<CounterRecord>, AppError> {
    let mut book = state.book.lock().await;
    let record = book.edit(&id, draft, state.clock.now())?;
    persist_counters(&state.data_path, book.counters()).await?;
    Ok(Json(record))
}

pub async fn reset_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<CounterRecord>, AppError> {
    let mut book = state.book.lock().await;
    let outcome = book.reset(&id, state.clock.now(), Confirmation::from(query.confirm))?;
    match outcome {
        Outcome::Applied(record) => {
            persist_counters(&state.data_path, book.counters()).await?;
            Ok(Json(record))
        }
        Outcome::Cancelled => Err(AppError::confirmation_required()),
    }
}

pub async fn delete_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<CounterRecord>, AppError> {
    let mut book = state.book.lock().await;
    let outcome = book.delete(&id, Confirmation::from(query.confirm))?;
    match outcome {
        Outcome::Applied(record) => {
            persist_counters(&state.data_path, book.counters()).await?;
            Ok(Json(record))
        }
        Outcome::Cancelled => Err(AppError::confirmation_required()),
    }
}

pub async fn reset_all(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<ResetAllResponse>, AppError> {
    let mut book = state.book.lock().await;
    match book.reset_all(Confirmation::from(query.confirm)) {
        Outcome::Applied(removed) => {
            clear_counters(&state.data_path).await?;
            Ok(Json(ResetAllResponse { removed }))
        }
        Outcome::Cancelled => Err(AppError::confirmation_required()),
    }
}

pub async fn get_breakdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Breakdown>, AppError> {
    let book = state.book.lock().await;
    Ok(Json(book.breakdown(&id, state.clock.now())?))
}

pub async fn get_breakdowns(State(state): State<AppState>) -> Json<Vec<CounterBreakdown>> {
    let book = state.book.lock().await;
    Json(book.breakdowns(state.clock.now()))
}

pub async fn export_counters(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let book = state.book.lock().await;
    let body = book.export_json()?;
    let file_name = format!("counters-backup-{}.json", state.clock.now().date());
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        body,
    ))
}

pub async fn import_counters(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let mut book = state.book.lock().await;
    let outcome = book.import_json(&body, query.mode, state.clock.now(), Confirmation::from(query.confirm))?;
    match outcome {
        Outcome::Applied(imported) => {
            persist_counters(&state.data_path, book.counters()).await?;
            Ok(Json(ImportResponse {
                imported,
                total: book.len(),
            }))
        }
        Outcome::Cancelled => Err(AppError::confirmation_required()),
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let book = state.book.lock().await;
    Json(build_stats_at(state.clock.now(), &book))
}

pub async fn get_display(State(state): State<AppState>) -> Json<HashMap<String, CounterDisplay>> {
    Json(state.display.snapshot())
}
