//! Table and row routes. Tables are resolved from the path on every request.
//! A known path hit with an unregistered method falls back to the unknown-route 404.

use crate::handlers::explorer::{
    create_row, delete_row, list_rows, list_tables, read_row, unknown_route, update_row,
};
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn explorer_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_tables).fallback(unknown_route))
        .route("/:table", get(list_rows).put(create_row).fallback(unknown_route))
        .route("/:table/", put(create_row).fallback(unknown_route))
        .route(
            "/:table/:id",
            get(read_row)
                .post(update_row)
                .delete(delete_row)
                .fallback(unknown_route),
        )
        .with_state(state)
}
