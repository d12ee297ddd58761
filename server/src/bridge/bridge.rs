use crate::bridge::model::{
    AircraftQuery, AircraftResponse, ErrorBody, MatchRequest, MatchResponse,
};
use crate::provider::chain::ChainResult;
use crate::provider::{AreaQuery, ProviderChain, RouteResolver};
use crate::workflow::config::ServerConfig;
use log::{debug, info, warn};
use serde_json::json;
use skypointcore::cache::TtlCache;
use skypointcore::interface::Observer;
use skypointcore::prelude::StageConfig;
use skypointcore::processing::{match_aircraft, run_pipeline, MatchConfig};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

/// Radius cap for HTTP queries, in kilometers.
const MAX_QUERY_RADIUS_KM: f64 = 250.0;

/// Extra fetch radius so a cached area covers every observer sharing its key.
const CACHE_MARGIN_KM: f64 = 2.0;

/// Everything the HTTP handlers share. Built once at start-up.
pub struct AppState {
    config: ServerConfig,
    chain: ProviderChain,
    routes: RouteResolver,
    aircraft_cache: Mutex<TtlCache<ChainResult>>,
}

impl AppState {
    pub fn new(config: ServerConfig, chain: ProviderChain, routes: RouteResolver) -> Self {
        let aircraft_cache = Mutex::new(TtlCache::with_capacity(config.aircraft_cache_ttl(), 256));
        Self {
            config,
            chain,
            routes,
            aircraft_cache,
        }
    }
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody::new(message)), status).into_response()
}

/// Provider fetch area shared by every request that rounds to the same cell.
///
/// The center is the observer snapped to 0.01° and the radius is rounded up to a whole
/// kilometer plus a margin, so the fetched circle contains each member's search circle.
/// Only raw provider data is shared; geometry is always computed per request.
fn cache_area(lat: f64, lon: f64, radius_km: f64) -> (String, AreaQuery) {
    let lat = (lat * 100.0).round() / 100.0;
    let lon = (lon * 100.0).round() / 100.0;
    let radius = radius_km.ceil();
    let key = format!("{:.2}:{:.2}:{:.0}", lat, lon, radius);
    (key, AreaQuery::new(lat, lon, radius + CACHE_MARGIN_KM))
}

async fn aircraft_handler(
    query: AircraftQuery,
    state: Arc<AppState>,
) -> Result<Response, Infallible> {
    let observer = Observer::new(query.lat, query.lon);
    if !observer.is_valid() {
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            format!("invalid position {}, {}", query.lat, query.lon),
        ));
    }
    let radius_km = query.radius.unwrap_or(state.config.radius_km);
    if !(radius_km > 0.0 && radius_km <= MAX_QUERY_RADIUS_KM) {
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            format!("radius must be in (0, {MAX_QUERY_RADIUS_KM}] km"),
        ));
    }

    let (key, area) = cache_area(query.lat, query.lon, radius_km);
    let cached = match state.aircraft_cache.lock() {
        Ok(mut cache) => cache.get(&key),
        Err(_) => None,
    };
    let fetched = match cached {
        Some(fetched) => fetched,
        None => match state.chain.fetch(&area).await {
            Ok(fetched) => {
                if let Ok(mut cache) = state.aircraft_cache.lock() {
                    cache.insert(&key, fetched.clone());
                }
                fetched
            }
            Err(err) => {
                warn!("aircraft query failed: {}", err);
                return Ok(error_reply(StatusCode::BAD_GATEWAY, err.to_string()));
            }
        },
    };

    let stage_config = StageConfig {
        observer,
        radius_km,
        min_altitude_m: state.config.min_altitude_m,
        max_results: state.config.max_results,
    };
    let output = match run_pipeline(&stage_config, fetched.aircraft) {
        Ok(output) => output,
        Err(err) => return Ok(error_reply(StatusCode::BAD_REQUEST, err.to_string())),
    };

    let response = AircraftResponse {
        provider: fetched.provider,
        count: output.items.len(),
        aircraft: output.items,
    };
    Ok(warp::reply::json(&response).into_response())
}

/// Callsigns are 1 to 10 ASCII letters or digits once surrounding spaces are trimmed.
fn valid_callsign(callsign: &str) -> bool {
    let callsign = callsign.trim();
    !callsign.is_empty()
        && callsign.len() <= 10
        && callsign.chars().all(|c| c.is_ascii_alphanumeric())
}

async fn route_handler(callsign: String, state: Arc<AppState>) -> Result<Response, Infallible> {
    if !valid_callsign(&callsign) {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "invalid callsign"));
    }
    let route = state.routes.resolve(&callsign).await;
    debug!(
        "route {} resolved ({} cached)",
        route.callsign,
        state.routes.cached_routes()
    );
    Ok(warp::reply::json(&route).into_response())
}

async fn match_handler(request: MatchRequest) -> Result<Response, Infallible> {
    let defaults = MatchConfig::default();
    let config = MatchConfig {
        heading_tolerance_deg: request
            .heading_tolerance
            .unwrap_or(defaults.heading_tolerance_deg),
        elevation_tolerance_deg: request
            .elevation_tolerance
            .unwrap_or(defaults.elevation_tolerance_deg),
        ..defaults
    };
    let matched =
        match_aircraft(request.heading, request.tilt, &request.aircraft, &config).cloned();
    Ok(warp::reply::json(&MatchResponse { matched }).into_response())
}

/// All HTTP routes of the service.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})));

    let aircraft = warp::path("aircraft")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<AircraftQuery>())
        .and(with_state(state.clone()))
        .and_then(aircraft_handler);

    let route = warp::path!("route" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(route_handler);

    let pointing = warp::path("match")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(1024 * 1024))
        .and(warp::body::json())
        .and_then(match_handler);

    health.or(aircraft).or(route).or(pointing)
}

pub async fn serve(state: Arc<AppState>, address: SocketAddr) {
    info!("HTTP API listening on {}", address);
    warp::serve(routes(state)).run(address).await;
}
