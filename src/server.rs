/// HTTP server exposing the dashboard queries plus a WebSocket session endpoint
use actix_web::http::header::CACHE_CONTROL;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, Error, HttpRequest, HttpResponse, HttpServer, ResponseError};
use actix_web_actors::ws;
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{cache_control, ServerConfig};
use crate::dashboard::Dashboard;
use crate::error::{DashboardError, Result};
use crate::filter::FilterSelection;
use crate::ingest::{CsvFileSource, RecordSource};
use crate::pagination::{clamp_page, PAGE_SIZE};
use crate::state::ViewState;
use crate::view::{SortColumn, SortKey, SortOrder};
use crate::websocket::DashboardSession;

/// Body text for any request that needed the dataset and could not get it.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to process data";

/// Shared state for all HTTP handlers and WebSocket sessions
pub struct AppState {
    source: Box<dyn RecordSource>,
    dashboard: Mutex<Option<Arc<Dashboard>>>,
    cache_max_age: u32,
}

impl AppState {
    pub fn new(source: Box<dyn RecordSource>, cache_max_age: u32) -> Self {
        Self {
            source,
            dashboard: Mutex::new(None),
            cache_max_age,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<Dashboard>>> {
        // The slot only ever holds a fully built dashboard, so a poisoned
        // lock still guards a consistent value.
        self.dashboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The loaded dashboard, loading it on first use.
    ///
    /// A failed load leaves the slot empty; the next caller tries again.
    pub fn dashboard(&self) -> Result<Arc<Dashboard>> {
        let mut slot = self.slot();
        if let Some(dashboard) = slot.as_ref() {
            return Ok(Arc::clone(dashboard));
        }

        match Dashboard::load(self.source.as_ref()) {
            Ok(dashboard) => {
                let dashboard = Arc::new(dashboard);
                *slot = Some(Arc::clone(&dashboard));
                Ok(dashboard)
            }
            Err(e) => {
                error!("Failed to load {}: {}", self.source.describe(), e);
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot().is_some()
    }

    pub fn cache_max_age(&self) -> u32 {
        self.cache_max_age
    }
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::UnknownColumn(_)
            | DashboardError::UnknownFacet(_)
            | DashboardError::InvalidSortOrder(_)
            | DashboardError::InvalidPage(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_load_failure() {
            LOAD_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

/// Facet filters as they arrive in a query string
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub make: Option<String>,
    pub year: Option<String>,
    pub county: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}

impl FilterQuery {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::from_parts(
            self.make.clone(),
            self.year.clone(),
            self.county.clone(),
            self.vehicle_type.clone(),
        )
    }
}

/// Query string of `/api/table`
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub make: Option<String>,
    pub year: Option<String>,
    pub county: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    /// Parsed by [`TableQuery::page`]
    pub page: Option<String>,
}

impl TableQuery {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::from_parts(
            self.make.clone(),
            self.year.clone(),
            self.county.clone(),
            self.vehicle_type.clone(),
        )
    }

    /// Sort key named by `sort`/`order`; `None` when no sort column is given.
    pub fn sort_key(&self) -> Result<Option<SortKey>> {
        let order = match self.order.as_deref() {
            Some(order) if !order.is_empty() => order.parse::<SortOrder>()?,
            _ => SortOrder::default(),
        };
        match self.sort.as_deref() {
            Some(column) if !column.is_empty() => {
                let column = column.parse::<SortColumn>()?;
                Ok(Some(SortKey { column, order }))
            }
            _ => Ok(None),
        }
    }

    /// Requested page; 1 when absent or blank.
    pub fn page(&self) -> Result<usize> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| DashboardError::InvalidPage(raw.to_string())),
        }
    }
}

/// Raw records, as the browser dashboard loads them
async fn get_data(state: web::Data<AppState>) -> std::result::Result<HttpResponse, DashboardError> {
    let dashboard = state.dashboard()?;
    Ok(HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, cache_control(state.cache_max_age())))
        .json(dashboard.dataset().records()))
}

async fn get_summary(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> std::result::Result<HttpResponse, DashboardError> {
    let dashboard = state.dashboard()?;
    Ok(HttpResponse::Ok().json(dashboard.summary(&query.selection())))
}

async fn get_facets(state: web::Data<AppState>) -> std::result::Result<HttpResponse, DashboardError> {
    let dashboard = state.dashboard()?;
    Ok(HttpResponse::Ok().json(dashboard.facet_domains()))
}

async fn get_table(
    state: web::Data<AppState>,
    query: web::Query<TableQuery>,
) -> std::result::Result<HttpResponse, DashboardError> {
    let sort = query.sort_key()?;
    let requested = query.page()?;
    let dashboard = state.dashboard()?;

    let rows = dashboard.apply_filters(&query.selection());
    let view = ViewState {
        page: 1,
        sort,
        page_size: PAGE_SIZE,
    };
    let page = clamp_page(requested, view.total_pages(rows.len()));

    Ok(HttpResponse::Ok().json(dashboard.sort_and_paginate(&rows, &view.at_page(page))))
}

/// WebSocket endpoint handler
async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, Error> {
    ws::start(DashboardSession::new(state), &req, stream)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "evdash server is running",
        "loaded": state.is_loaded(),
    }))
}

/// Register every route on an app or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/data", web::get().to(get_data))
        .route("/api/summary", web::get().to(get_summary))
        .route("/api/facets", web::get().to(get_facets))
        .route("/api/table", web::get().to(get_table))
        .route("/ws", web::get().to(ws_index))
        .route("/health", web::get().to(health_check));
}

/// Start the HTTP server with WebSocket support
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let source = CsvFileSource::new(config.data.clone());
    let state = web::Data::new(AppState::new(Box::new(source), config.cache_max_age));

    if config.preload {
        if let Err(e) = state.dashboard() {
            warn!("Preload failed, will retry on first request: {}", e);
        }
    }

    info!("evdash server");
    info!("Dataset: {}", config.data.display());
    info!("HTTP API: http://{}:{}/api", config.host, config.port);
    info!("WebSocket: ws://{}:{}/ws", config.host, config.port);
    info!("Health check: http://{}:{}/health", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            // The browser dashboard is served from another origin
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
