use anyhow::Result;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use movierec_core::{Recommender, VectorizerOptions, DEFAULT_K};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 50;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_K }

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    /// false when no movie carries the requested title
    pub found: bool,
    pub took_s: f64,
    pub results: Vec<RecommendHit>,
}

#[derive(Serialize)]
pub struct RecommendHit {
    pub rank: usize,
    pub id: i64,
    pub title: String,
    pub score: f32,
    pub url: String,
}

#[derive(Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

/// Load the dataset, build the similarity matrix once and wire up the routes.
pub fn build_app(data_path: &str, opts: &VectorizerOptions) -> Result<Router> {
    let recommender = Recommender::from_csv(data_path, opts)?;
    Ok(router(Arc::new(recommender)))
}

pub fn router(recommender: Arc<Recommender>) -> Router {
    let app_state = AppState { recommender };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/titles", get(titles_handler))
        .route("/recommend", get(recommend_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn recommend_handler(State(state): State<AppState>, Query(params): Query<RecommendParams>) -> Json<RecommendResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let found = state.recommender.lookup(&params.title).is_some();
    if !found {
        tracing::warn!(title = %params.title, "title not in dataset");
    }
    let results = state
        .recommender
        .recommend(&params.title, k)
        .into_iter()
        .enumerate()
        .map(|(i, r)| RecommendHit { rank: i + 1, url: r.tmdb_url(), id: r.id, title: r.title, score: r.score })
        .collect();

    let elapsed = start.elapsed();
    Json(RecommendResponse { query: params.title, found, took_s: elapsed.as_secs_f64(), results })
}

pub async fn titles_handler(State(state): State<AppState>) -> Json<TitlesResponse> {
    let titles = state.recommender.titles().into_iter().map(str::to_string).collect();
    Json(TitlesResponse { titles })
}
