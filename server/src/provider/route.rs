use super::{http_client, trim_base_url, ProviderError, ProviderResult};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use skypointcore::cache::{normalize_key, TtlCache};
use skypointcore::interface::FlightRoute;
use skypointcore::lookup::{airline_for_callsign, airport_display, find_airport};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;

/// Callsign → route backend. `Ok(None)` means the backend answered but does not know
/// the flight.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn lookup(&self, callsign: &str) -> ProviderResult<Option<FlightRoute>>;
}

/// adsbdb `v0/callsign/{callsign}` lookup.
pub struct AdsbdbRouteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl AdsbdbRouteProvider {
    pub fn new(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
        })
    }

    /// Lookup URL with the callsign percent-encoded as a single path segment.
    fn endpoint(&self, callsign: &str) -> ProviderResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| ProviderError::Decode(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Decode(format!("base url {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(["v0", "callsign", callsign]);
        Ok(url)
    }
}

#[async_trait]
impl RouteProvider for AdsbdbRouteProvider {
    fn name(&self) -> &str {
        "adsbdb"
    }

    async fn lookup(&self, callsign: &str) -> ProviderResult<Option<FlightRoute>> {
        let response = self
            .client
            .get(self.endpoint(callsign)?)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = response.error_for_status()?.json().await?;
        decode_adsbdb(callsign, &body)
    }
}

fn airport_code(airport: &Value) -> Option<String> {
    airport
        .get("icao_code")
        .or_else(|| airport.get("iata_code"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn airport_name(airport: &Value) -> Option<String> {
    let name = airport.get("name").and_then(Value::as_str)?;
    match airport.get("municipality").and_then(Value::as_str) {
        Some(city) if city != name => Some(format!("{name} ({city})")),
        _ => Some(name.to_string()),
    }
}

/// Decodes an adsbdb callsign response. A string `response` is its "unknown" answer.
pub fn decode_adsbdb(callsign: &str, body: &Value) -> ProviderResult<Option<FlightRoute>> {
    let response = body
        .get("response")
        .ok_or_else(|| ProviderError::Decode("missing response field".into()))?;
    let Some(route) = response.get("flightroute") else {
        return Ok(None);
    };

    let origin = route.get("origin");
    let destination = route.get("destination");
    Ok(Some(FlightRoute {
        callsign: callsign.to_string(),
        origin: origin.and_then(airport_code),
        destination: destination.and_then(airport_code),
        origin_name: origin.and_then(airport_name),
        destination_name: destination.and_then(airport_name),
        airline: route
            .get("airline")
            .and_then(|airline| airline.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }))
}

/// Resolves callsigns to routes through an ordered list of backends and a TTL cache.
///
/// Failures never surface to the caller: the result degrades to the raw callsign with
/// whatever the static tables know.
pub struct RouteResolver {
    providers: Vec<Box<dyn RouteProvider>>,
    cache: Mutex<TtlCache<FlightRoute>>,
    timeout: Duration,
}

impl RouteResolver {
    pub fn new(ttl: Duration, timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            cache: Mutex::new(TtlCache::with_capacity(ttl, 4096)),
            timeout,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn RouteProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn cached_routes(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub async fn resolve(&self, callsign: &str) -> FlightRoute {
        let key = normalize_key(callsign);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(route) = cache.get(&key) {
                return route;
            }
        }

        let mut answered = false;
        let mut found = None;
        for provider in &self.providers {
            match timeout(self.timeout, provider.lookup(&key)).await {
                Ok(Ok(Some(route))) => {
                    found = Some(route);
                    break;
                }
                Ok(Ok(None)) => {
                    debug!("{} has no route for {}", provider.name(), key);
                    answered = true;
                }
                Ok(Err(err)) => warn!("route lookup via {} failed: {}", provider.name(), err),
                Err(_) => warn!("route lookup via {} timed out", provider.name()),
            }
        }

        let cacheable = found.is_some() || answered;
        let route = complete_route(found.unwrap_or_else(|| FlightRoute::unknown(&key)));
        if cacheable {
            if let Ok(mut cache) = self.cache.lock() {
                cache.insert(&key, route.clone());
            }
        }
        route
    }
}

/// Fills display names from the static tables where the backend left them empty.
fn complete_route(mut route: FlightRoute) -> FlightRoute {
    if route.airline.is_none() {
        route.airline = airline_for_callsign(&route.callsign).map(str::to_string);
    }
    if route.origin_name.is_none() {
        route.origin_name = route.origin.as_deref().map(airport_display);
    } else if let Some(airport) = route.origin.as_deref().and_then(find_airport) {
        route.origin_name = Some(airport_display(airport.icao));
    }
    if route.destination_name.is_none() {
        route.destination_name = route.destination.as_deref().map(airport_display);
    } else if let Some(airport) = route.destination.as_deref().and_then(find_airport) {
        route.destination_name = Some(airport_display(airport.icao));
    }
    route
}
