//! Source and study loading pages
//!
//! Endpoints:
//! - GET /sources, POST /sources - load sources (`sourceId`)
//! - GET /studies, POST /studies - load studies (`studyID`)
//!
//! Each page is self-posting: a GET renders the bare form, a POST relays
//! the submission first and renders the outcome as a banner. The legacy
//! `/cgi-bin/*.py` paths are served by the same handlers.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Html,
    routing::get,
    Router,
};

use crate::error::Result;
use crate::form::FormFields;
use crate::html::render;
use crate::relay::RelayResult;
use crate::remote::RemoteFileList;
use crate::state::AppState;
use crate::upload::Target;

/// Maximum accepted upload: 32MB
pub const MAX_UPLOAD_SIZE: usize = 32 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sources", get(sources_page).post(submit_source))
        .route("/cgi-bin/load_sources.py", get(sources_page).post(submit_source))
        .route("/studies", get(studies_page).post(submit_study))
        .route("/cgi-bin/load_studies.py", get(studies_page).post(submit_study))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

async fn sources_page(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, Target::Source, RelayResult::no_action()).await
}

async fn submit_source(State(state): State<AppState>, multipart: Multipart) -> Result<Html<String>> {
    submit(&state, Target::Source, multipart).await
}

async fn studies_page(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, Target::Study, RelayResult::no_action()).await
}

async fn submit_study(State(state): State<AppState>, multipart: Multipart) -> Result<Html<String>> {
    submit(&state, Target::Study, multipart).await
}

async fn submit(state: &AppState, target: Target, multipart: Multipart) -> Result<Html<String>> {
    let form = FormFields::from_multipart(multipart).await?;
    let result = state.relay().handle_form(target, &form).await;
    render_page(state, target, result).await
}

/// Fetch the current listing and fill the page.
///
/// A listing failure aborts the whole page; the submission outcome is
/// still in the log.
async fn render_page(state: &AppState, target: Target, result: RelayResult) -> Result<Html<String>> {
    let revision = state.remote().latest_revision().await?;
    let files = state.remote().list_files(&revision).await?;

    tracing::debug!(
        revision = %revision,
        files = files.len(),
        "Fetched remote file listing"
    );

    let list = RemoteFileList::new(revision, files);
    let template = match target {
        Target::Source => &state.templates().sources,
        Target::Study => &state.templates().studies,
    };

    Ok(Html(render(template, target, &result, &list)))
}
