//! HTTP surface: routing and the transport shim around the browse engine.

mod browse_pages;
pub use browse_pages::{items_page, search_page, villagers_page};

mod autocomplete;
pub use autocomplete::autocomplete;

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(|| async { Redirect::to("/search/page/1") }))
        .route("/search/page/{page_number}", get(search_page))
        .route(
            "/villagers",
            get(|| async { Redirect::to("/villagers/page/1") }),
        )
        .route("/villagers/page/{page_number}", get(villagers_page))
        .route("/items", get(|| async { Redirect::to("/items/page/1") }))
        .route("/items/page/{page_number}", get(items_page))
        .route("/autocomplete", get(autocomplete))
        .with_state(state)
}
