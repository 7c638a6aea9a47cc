//! FAQ route.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::content::FaqEntry;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct FaqView {
    pub query: String,
    pub entries: Vec<FaqEntry>,
}

/// GET /faq?q=
pub async fn index(State(state): State<AppState>, Query(query): Query<FaqQuery>) -> Json<FaqView> {
    let entries = state.faq().search(&query.q).into_iter().cloned().collect();
    Json(FaqView {
        query: query.q,
        entries,
    })
}
