use crate::provider::{AreaQuery, ProviderChain};
use crate::workflow::config::ServerConfig;
use anyhow::Context;
use log::{info, warn};
use skypointcore::interface::OrientationSample;
use skypointcore::orientation::SmoothingConfig;
use skypointcore::processing::MatchConfig;
use skypointcore::TrackingSession;
use std::sync::Arc;

/// One match found while sweeping the sky.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepHit {
    pub heading_deg: f64,
    pub tilt_deg: f64,
    pub aircraft_id: String,
    pub label: String,
    pub distance_km: f64,
}

pub struct SweepReport {
    pub provider: String,
    pub aircraft_count: usize,
    pub hits: Vec<SweepHit>,
}

impl SweepReport {
    /// Distinct aircraft matched at least once, in first-hit order.
    pub fn distinct_aircraft(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for hit in &self.hits {
            if !seen.contains(&hit.aircraft_id.as_str()) {
                seen.push(&hit.aircraft_id);
            }
        }
        seen
    }
}

#[derive(Clone)]
pub struct Runner {
    config: ServerConfig,
    chain: Arc<ProviderChain>,
}

impl Runner {
    pub fn new(config: ServerConfig, chain: Arc<ProviderChain>) -> Self {
        Self { config, chain }
    }

    pub fn new_session(&self) -> anyhow::Result<TrackingSession> {
        TrackingSession::new(
            self.config.to_stage_config(),
            SmoothingConfig::default(),
            MatchConfig::default(),
        )
        .context("creating tracking session")
    }

    fn area(&self) -> AreaQuery {
        AreaQuery::new(
            self.config.latitude,
            self.config.longitude,
            self.config.radius_km,
        )
    }

    /// Polls the provider chain once and swaps the result into `session`.
    ///
    /// A failed poll leaves the previous aircraft list in place.
    pub async fn poll_once(&self, session: &mut TrackingSession) -> anyhow::Result<String> {
        let fetched = match self.chain.fetch(&self.area()).await {
            Ok(fetched) => fetched,
            Err(err) => {
                session.metrics().record_failure();
                return Err(err).context("polling aircraft providers");
            }
        };
        let count = session
            .update_from_raw(fetched.aircraft)
            .context("processing aircraft")?;
        info!("{} -> {} aircraft in range", fetched.provider, count);
        Ok(fetched.provider)
    }

    /// Polls until Ctrl+C, logging the nearest aircraft after every successful poll.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut session = self.new_session()?;
        let mut ticker = tokio::time::interval(self.config.poll_interval());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once(&mut session).await {
                        Ok(_) => {
                            if let Some(nearest) = session.aircraft().first() {
                                info!(
                                    "nearest {} at {:.1} km, bearing {:.0}°, elevation {:.1}°",
                                    nearest.label(),
                                    nearest.distance_km,
                                    nearest.bearing_deg,
                                    nearest.elevation_deg
                                );
                            }
                        }
                        Err(err) => warn!("{:#}", err),
                    }
                }
                result = tokio::signal::ctrl_c() => {
                    result.context("awaiting Ctrl+C")?;
                    let metrics = session.metrics().snapshot();
                    info!("stopping after {} polls, {} failures", metrics.polls, metrics.failures);
                    return Ok(());
                }
            }
        }
    }

    /// Polls once, then sweeps a simulated device across the sky and records matches.
    pub async fn sweep(&self, heading_step: f64, tilts: &[f64]) -> anyhow::Result<SweepReport> {
        let mut session = self.new_session()?;
        let provider = self.poll_once(&mut session).await?;
        session.start_tracking();

        let step = heading_step.clamp(1.0, 90.0);
        let mut hits = Vec::new();
        for &tilt in tilts {
            let mut heading = 0.0;
            while heading < 360.0 {
                // tilt t corresponds to device beta t + 90 when held upright
                let sample =
                    OrientationSample::from_device(Some(heading), None, Some(tilt + 90.0));
                let matched = session
                    .ingest(&sample)
                    .map(|a| (a.id.clone(), a.label().to_string(), a.distance_km));
                if let Some((aircraft_id, label, distance_km)) = matched {
                    hits.push(SweepHit {
                        heading_deg: session.heading().unwrap_or(heading),
                        tilt_deg: session.tilt().unwrap_or(tilt),
                        aircraft_id,
                        label,
                        distance_km,
                    });
                }
                heading += step;
            }
        }
        session.stop_tracking();

        Ok(SweepReport {
            provider,
            aircraft_count: session.aircraft().len(),
            hits,
        })
    }
}
