use std::sync::Arc;

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{DashboardView, EntityRow, StatusView, SummaryView, TableView},
};
use axum::{
    extract::{Path, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use mnav_core::EntityClass;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub async fn healthz() -> &'static str {
    "ok"
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardView>> {
    let snapshot = state.cache.get().await?;
    let thresholds = &state.dashboard.thresholds;
    Ok(Json(DashboardView {
        spot_prices: snapshot.spot_prices.clone(),
        strategies: TableView::from_snapshot(&snapshot, EntityClass::NftBacked, thresholds),
        treasuries: TableView::from_snapshot(&snapshot, EntityClass::BtcBacked, thresholds),
        fetched_at: snapshot.fetched_at,
        status: state.cache.status(),
    }))
}

async fn get_strategies(State(state): State<Arc<AppState>>) -> ApiResult<Json<TableView>> {
    table(&state, EntityClass::NftBacked).await
}

async fn get_treasuries(State(state): State<Arc<AppState>>) -> ApiResult<Json<TableView>> {
    table(&state, EntityClass::BtcBacked).await
}

async fn table(state: &AppState, class: EntityClass) -> ApiResult<Json<TableView>> {
    let snapshot = state.cache.get().await?;
    Ok(Json(TableView::from_snapshot(
        &snapshot,
        class,
        &state.dashboard.thresholds,
    )))
}

async fn get_entity(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<EntityRow>> {
    let snapshot = state.cache.get().await?;
    let valued = snapshot
        .entities
        .iter()
        .find(|e| e.id() == id)
        .cloned()
        .ok_or(ApiError::NotFound)?;
    let thresholds = state.dashboard.thresholds.for_class(valued.entity.entity_class);
    Ok(Json(EntityRow::new(valued, thresholds)))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<SummaryView>> {
    let snapshot = state.cache.get().await?;
    Ok(Json(SummaryView::from(snapshot.as_ref())))
}

/// Cache status without triggering a refresh.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusView> {
    Json(status_view(&state))
}

/// Manual refresh. Served from cache while the snapshot is still fresh.
async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusView>> {
    state.cache.get().await?;
    Ok(Json(status_view(&state)))
}

fn status_view(state: &AppState) -> StatusView {
    StatusView {
        status: state.cache.status(),
        state: state.cache.state(),
        last_fetched_at: state.cache.last_fetched_at(),
        ttl_seconds: state.cache.ttl().as_secs(),
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/dashboard", get(get_dashboard))
        .route("/strategies", get(get_strategies))
        .route("/treasuries", get(get_treasuries))
        .route("/entities/{id}", get(get_entity))
        .route("/summary", get(get_summary))
        .route("/status", get(get_status))
        .route("/refresh", post(refresh));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
