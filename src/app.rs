use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/counters",
            get(handlers::list_counters)
                .post(handlers::create_counter)
                .delete(handlers::reset_all),
        )
        .route(
            "/api/counters/:id",
            put(handlers::edit_counter).delete(handlers::delete_counter),
        )
        .route("/api/counters/:id/reset", post(handlers::reset_counter))
        .route("/api/counters/:id/breakdown", get(handlers::get_breakdown))
        .route("/api/breakdowns", get(handlers::get_breakdowns))
        .route("/api/export", get(handlers::export_counters))
        .route("/api/import", post(handlers::import_counters))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/display", get(handlers::get_display))
        .with_state(state)
}
