//! Remote study search page
//!
//! Endpoints:
//! - GET /search - render the indexing form
//! - POST /search - with `init_remote_indexing_flag`, ask the database to
//!   index the public remote studies

use axum::{
    extract::{Multipart, State},
    response::Html,
    routing::get,
    Router,
};

use crate::error::Result;
use crate::form::FormFields;
use crate::html::banner;
use crate::relay::RelayResult;
use crate::state::AppState;
use crate::upload::Target;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_page).post(submit_search))
        .route("/cgi-bin/search_studies.py", get(search_page).post(submit_search))
}

async fn search_page(State(state): State<AppState>) -> Html<String> {
    render_search(&state, &RelayResult::no_action())
}

async fn submit_search(State(state): State<AppState>, multipart: Multipart) -> Result<Html<String>> {
    let form = FormFields::from_multipart(multipart).await?;
    let result = state.relay().handle_indexing(&form).await;
    Ok(render_search(&state, &result))
}

fn render_search(state: &AppState, result: &RelayResult) -> Html<String> {
    Html(state.templates().search.fill(&banner(Target::Study, result), "", ""))
}
