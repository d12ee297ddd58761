use anyhow::Context;
use bridge::AppState;
use clap::Parser;
use log::info;
use provider::simulated::{SimulatedProvider, SimulationConfig};
use provider::{
    AdsbdbRouteProvider, OpenSkyProvider, ProviderChain, ReadsbProvider, RouteResolver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::{ProviderKind, ServerConfig};
use workflow::runner::Runner;

mod bridge;
mod provider;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Find the aircraft your phone is pointing at")]
struct Args {
    /// Load a server config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Observer latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Search radius in kilometers
    #[arg(long)]
    radius_km: Option<f64>,
    /// Poll once, sweep a simulated device around the horizon and print the matches
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Serve the HTTP API instead of polling in the foreground
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Address for the HTTP API, e.g. 127.0.0.1:9000
    #[arg(long)]
    bind: Option<String>,
    /// Use seeded synthetic traffic instead of live providers
    #[arg(long, default_value_t = false)]
    simulate: bool,
}

fn build_chain(config: &ServerConfig) -> anyhow::Result<ProviderChain> {
    let timeout = config.fetch_timeout();
    let mut chain = ProviderChain::new(timeout);
    for kind in &config.providers {
        chain = match kind {
            ProviderKind::Opensky => chain.with_provider(Box::new(
                OpenSkyProvider::new(&config.opensky_url, timeout)
                    .context("building OpenSky client")?,
            )),
            ProviderKind::Readsb => chain.with_provider(Box::new(
                ReadsbProvider::new(&config.readsb_url, timeout)
                    .context("building readsb client")?,
            )),
            ProviderKind::Simulated => {
                chain.with_provider(Box::new(SimulatedProvider::new(SimulationConfig {
                    count: config.simulated_count,
                    seed: config.simulated_seed,
                    ..Default::default()
                })))
            }
        };
    }
    info!("aircraft providers: {}", chain.provider_names().join(" -> "));
    Ok(chain)
}

fn build_routes(config: &ServerConfig) -> anyhow::Result<RouteResolver> {
    let timeout = config.fetch_timeout();
    let mut resolver = RouteResolver::new(config.route_cache_ttl(), timeout);
    if let Some(url) = config.route_url.as_deref() {
        resolver = resolver.with_provider(Box::new(
            AdsbdbRouteProvider::new(url, timeout).context("building route client")?,
        ));
    }
    Ok(resolver)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (offline, serve) = (args.offline, args.serve);

    let file_config = if let Some(path) = args.config {
        ServerConfig::load(path)?
    } else {
        ServerConfig::default()
    };
    let config =
        file_config.with_overrides(args.lat, args.lon, args.radius_km, args.bind, args.simulate);
    if !config.observer().is_valid() {
        anyhow::bail!(
            "observer position {}, {} is out of range",
            config.latitude,
            config.longitude
        );
    }
    info!(
        "observer {:.4}, {:.4}; radius {} km; providers {:?}",
        config.latitude, config.longitude, config.radius_km, config.providers
    );

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    runtime.block_on(async move {
        if offline {
            let runner = Runner::new(config.clone(), Arc::new(build_chain(&config)?));
            let report = runner.sweep(5.0, &[2.0, 5.0, 10.0, 20.0, 35.0, 60.0]).await?;
            println!(
                "Offline sweep via {} -> {} aircraft in range, {} pointing hits",
                report.provider,
                report.aircraft_count,
                report.hits.len()
            );
            for id in report.distinct_aircraft() {
                if let Some(hit) = report.hits.iter().find(|hit| hit.aircraft_id == id) {
                    println!(
                        "  {:<8} first seen at heading {:>5.1}°, tilt {:>4.1}° ({:.1} km)",
                        hit.label, hit.heading_deg, hit.tilt_deg, hit.distance_km
                    );
                }
            }
        } else if serve {
            let address = config.bind_address()?;
            let state =
                AppState::new(config.clone(), build_chain(&config)?, build_routes(&config)?);
            tokio::select! {
                _ = bridge::serve(Arc::new(state), address) => {}
                result = tokio::signal::ctrl_c() => {
                    result.context("awaiting Ctrl+C to exit")?;
                    info!("shutting down HTTP API");
                }
            }
        } else {
            let runner = Runner::new(config.clone(), Arc::new(build_chain(&config)?));
            runner.run().await?;
        }
        Ok::<(), anyhow::Error>(())
    })
}
