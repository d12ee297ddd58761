use anyhow::Context;
use serde::{Deserialize, Serialize};
use skypointcore::interface::Observer;
use skypointcore::prelude::{StageConfig, DEFAULT_MIN_ALTITUDE_M, DEFAULT_RADIUS_KM};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Aircraft data backends, tried in the order they are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Opensky,
    Readsb,
    Simulated,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub min_altitude_m: f64,
    pub max_results: Option<usize>,
    pub poll_interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub aircraft_cache_ttl_secs: u64,
    pub route_cache_ttl_secs: u64,
    pub providers: Vec<ProviderKind>,
    pub opensky_url: String,
    pub readsb_url: String,
    pub route_url: Option<String>,
    pub simulated_count: usize,
    pub simulated_seed: u64,
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            latitude: 51.5074,
            longitude: -0.1278,
            radius_km: DEFAULT_RADIUS_KM,
            min_altitude_m: DEFAULT_MIN_ALTITUDE_M,
            max_results: None,
            poll_interval_secs: 10,
            fetch_timeout_secs: 15,
            aircraft_cache_ttl_secs: 10,
            route_cache_ttl_secs: 6 * 60 * 60,
            providers: vec![ProviderKind::Opensky, ProviderKind::Readsb],
            opensky_url: "https://opensky-network.org/api".into(),
            readsb_url: "https://api.adsb.lol".into(),
            route_url: Some("https://api.adsbdb.com".into()),
            simulated_count: 24,
            simulated_seed: 7,
            bind: "127.0.0.1:9000".into(),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading server config {}", path_ref.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing server config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies command-line values on top of file or default values.
    pub fn with_overrides(
        mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_km: Option<f64>,
        bind: Option<String>,
        simulate: bool,
    ) -> Self {
        if let Some(latitude) = latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            self.longitude = longitude;
        }
        if let Some(radius_km) = radius_km {
            self.radius_km = radius_km;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if simulate {
            self.providers = vec![ProviderKind::Simulated];
            self.route_url = None;
        }
        self
    }

    pub fn observer(&self) -> Observer {
        Observer::new(self.latitude, self.longitude)
    }

    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            observer: self.observer(),
            radius_km: self.radius_km,
            min_altitude_m: self.min_altitude_m,
            max_results: self.max_results,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn aircraft_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.aircraft_cache_ttl_secs)
    }

    pub fn route_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.route_cache_ttl_secs)
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("parsing bind address {}", self.bind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_defaults_produce_stage_config() {
        let cfg = ServerConfig::default();
        let stage = cfg.to_stage_config();
        assert_eq!(stage.radius_km, 50.0);
        assert_eq!(stage.min_altitude_m, 100.0);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(15));
        assert!(cfg.bind_address().is_ok());
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"latitude: 47.45\nlongitude: -122.3\nradius_km: 25\nproviders: [readsb, simulated]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.latitude, 47.45);
        assert_eq!(cfg.radius_km, 25.0);
        assert_eq!(
            cfg.providers,
            vec![ProviderKind::Readsb, ProviderKind::Simulated]
        );
        assert_eq!(cfg.poll_interval_secs, 10);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"providers: [carrier-pigeon]\n").unwrap();
        let path = temp.into_temp_path();
        assert!(ServerConfig::load(&path).is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let cfg = ServerConfig::default().with_overrides(
            Some(10.0),
            Some(20.0),
            None,
            Some("0.0.0.0:8080".into()),
            true,
        );
        assert_eq!(cfg.observer(), Observer::new(10.0, 20.0));
        assert_eq!(cfg.radius_km, 50.0);
        assert_eq!(cfg.providers, vec![ProviderKind::Simulated]);
        assert!(cfg.route_url.is_none());
        assert_eq!(cfg.bind_address().unwrap().port(), 8080);
    }
}
