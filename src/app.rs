use crate::aggregator::Aggregator;
use crate::catalog::{CatalogApi, CatalogClient};
use crate::config::Settings;
use crate::landing::countdown::default_target;
use crate::landing::{LandingPage, LandingView, SystemClock};
use crate::presentation::{render_page, HomeController, PageView, ScrollDirection};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub home: Arc<Mutex<HomeController>>,
    pub landing: Arc<Mutex<LandingPage>>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogApi>, deadline: Duration, landing: LandingPage) -> Self {
        Self {
            aggregator: Aggregator::new(catalog, deadline),
            home: Arc::new(Mutex::new(HomeController::default())),
            landing: Arc::new(Mutex::new(landing)),
        }
    }

    /// Runs one page load: `Loading` until the aggregator settles, then `Ready`.
    pub async fn load_home(&self) {
        self.home.lock().await.begin_loading();
        let data = self.aggregator.load_home().await;
        self.home.lock().await.ready(data);
    }

    async fn page(&self) -> PageView {
        render_page(self.home.lock().await.snapshot())
    }
}

pub async fn run_server(settings: Settings) -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(CatalogClient::from_settings(&settings)?);
    let target = settings
        .enrollment_target
        .clone()
        .unwrap_or_else(|| default_target(Local::now()));
    let landing = LandingPage::mount(settings.landing_features, &target, Arc::new(SystemClock));
    let state = AppState::new(catalog, settings.deadline, landing);

    let loader = state.clone();
    tokio::spawn(async move { loader.load_home().await });

    let app = build_router(state);

    info!("Listening on {}", settings.addr);
    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/home", get(home))
        .route("/home/reload", post(reload))
        .route("/home/search", get(search).delete(clear_search))
        .route("/home/search/open", post(open_search))
        .route("/home/search/close", post(close_search))
        .route("/home/play/:id", post(play))
        .route("/home/close", post(close_modal))
        .route("/home/rows/:index/scroll", post(scroll_row))
        .route("/home/images/:id/broken", post(image_broken))
        .route("/landing", get(landing))
        .route("/landing/faq/:index", post(toggle_faq))
        .route("/landing/chat", post(chat))
        .route("/landing/preview", post(toggle_preview))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>) -> Json<PageView> {
    Json(state.page().await)
}

async fn reload(State(state): State<AppState>) -> Json<PageView> {
    state.load_home().await;
    Json(state.page().await)
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Json<PageView> {
    let query = params.q.trim();
    if query.is_empty() {
        debug!("Ignoring blank search");
        return Json(state.page().await);
    }
    info!("Searching catalog for '{}'", query);
    let results = state.aggregator.search(query).await;
    let mut home = state.home.lock().await;
    home.apply_search(results);
    Json(render_page(home.snapshot()))
}

async fn clear_search(State(state): State<AppState>) -> Json<PageView> {
    let mut home = state.home.lock().await;
    home.clear_search();
    Json(render_page(home.snapshot()))
}

async fn open_search(State(state): State<AppState>) -> Json<PageView> {
    let mut home = state.home.lock().await;
    home.open_search();
    Json(render_page(home.snapshot()))
}

async fn close_search(State(state): State<AppState>) -> Json<PageView> {
    let mut home = state.home.lock().await;
    home.close_search();
    Json(render_page(home.snapshot()))
}

async fn play(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PageView>, StatusCode> {
    let item = state.home.lock().await.snapshot().find_item(id).cloned();
    let Some(item) = item else {
        warn!("Play requested for unknown item {}", id);
        return Err(StatusCode::NOT_FOUND);
    };
    // Lock released while the trailer lookup is in flight.
    let trailer = state.aggregator.resolve_trailer(id).await;
    info!("Playing '{}' with trailer {}", item.display_title(), trailer.key());
    let mut home = state.home.lock().await;
    home.open_modal(item, Some(trailer));
    Ok(Json(render_page(home.snapshot())))
}

async fn close_modal(State(state): State<AppState>) -> Json<PageView> {
    let mut home = state.home.lock().await;
    home.close_modal();
    Json(render_page(home.snapshot()))
}

#[derive(Deserialize)]
struct ScrollQuery {
    direction: ScrollDirection,
}

async fn scroll_row(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(params): Query<ScrollQuery>,
) -> Result<Json<PageView>, StatusCode> {
    let mut home = state.home.lock().await;
    home.scroll_row(index, params.direction)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(render_page(home.snapshot())))
}

async fn image_broken(State(state): State<AppState>, Path(id): Path<i64>) -> Json<PageView> {
    debug!("Poster for {} failed to load", id);
    let mut home = state.home.lock().await;
    home.mark_image_broken(id);
    Json(render_page(home.snapshot()))
}

async fn landing(State(state): State<AppState>) -> Json<LandingView> {
    Json(state.landing.lock().await.view().await)
}

async fn toggle_faq(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<LandingView>, StatusCode> {
    let mut page = state.landing.lock().await;
    let faq = page.faq.as_mut().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    faq.toggle(index).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(page.view().await))
}

#[derive(Deserialize)]
struct ChatRequest {
    text: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<LandingView>, StatusCode> {
    let mut page = state.landing.lock().await;
    let widget = page.chat.as_mut().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    if widget.send(body.text).await.is_none() {
        debug!("Ignoring blank chat message");
    }
    Ok(Json(page.view().await))
}

async fn toggle_preview(State(state): State<AppState>) -> Result<Json<LandingView>, StatusCode> {
    let mut page = state.landing.lock().await;
    let panel = page.preview.as_mut().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    panel.toggle();
    Ok(Json(page.view().await))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
