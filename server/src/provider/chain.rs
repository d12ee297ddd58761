use super::{AircraftProvider, AreaQuery, ProviderError, ProviderResult};
use log::{debug, warn};
use skypointcore::interface::RawAircraft;
use std::time::Duration;
use tokio::time::timeout;

/// Aircraft from the first provider that answered.
#[derive(Debug, Clone)]
pub struct ChainResult {
    pub provider: String,
    pub aircraft: Vec<RawAircraft>,
}

/// Ordered fallback over several providers.
///
/// Each provider gets the same fixed time budget. A provider that errors or runs out of
/// time is skipped and nothing it produced is kept.
pub struct ProviderChain {
    providers: Vec<Box<dyn AircraftProvider>>,
    timeout: Duration,
}

impl ProviderChain {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn AircraftProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn fetch(&self, query: &AreaQuery) -> ProviderResult<ChainResult> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();
            let outcome = match timeout(self.timeout, provider.fetch(query)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    provider: name.clone(),
                    secs: self.timeout.as_secs(),
                }),
            };

            match outcome {
                Ok(aircraft) => {
                    debug!("{} returned {} aircraft", name, aircraft.len());
                    return Ok(ChainResult {
                        provider: name,
                        aircraft,
                    });
                }
                Err(err) => {
                    warn!("provider {} failed: {}", name, err);
                    failures.push(format!("{name}: {err}"));
                }
            }
        }

        if failures.is_empty() {
            failures.push("no providers configured".into());
        }
        Err(ProviderError::Exhausted(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed {
        name: &'static str,
        aircraft: Vec<RawAircraft>,
    }

    #[async_trait]
    impl AircraftProvider for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
            Ok(self.aircraft.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl AircraftProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self, _query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
            Err(ProviderError::Decode("bad payload".into()))
        }
    }

    struct Slow;

    #[async_trait]
    impl AircraftProvider for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn fetch(&self, _query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![RawAircraft::new("5105ee", 0.0, 0.0, 1000.0)])
        }
    }

    fn query() -> AreaQuery {
        AreaQuery::new(51.5, -0.12, 50.0)
    }

    #[tokio::test]
    async fn chain_falls_back_to_next_provider() {
        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(Box::new(Failing))
            .with_provider(Box::new(Fixed {
                name: "fixed",
                aircraft: vec![RawAircraft::new("abc123", 51.6, -0.1, 3000.0)],
            }));

        let result = chain.fetch(&query()).await.unwrap();
        assert_eq!(result.provider, "fixed");
        assert_eq!(result.aircraft.len(), 1);
    }

    #[tokio::test]
    async fn chain_skips_provider_that_times_out() {
        let chain = ProviderChain::new(Duration::from_millis(50))
            .with_provider(Box::new(Slow))
            .with_provider(Box::new(Fixed {
                name: "fixed",
                aircraft: Vec::new(),
            }));

        let result = chain.fetch(&query()).await.unwrap();
        assert_eq!(result.provider, "fixed");
        assert!(result.aircraft.is_empty());
    }

    #[tokio::test]
    async fn chain_reports_every_failure() {
        let chain = ProviderChain::new(Duration::from_millis(50))
            .with_provider(Box::new(Failing))
            .with_provider(Box::new(Slow));

        match chain.fetch(&query()).await {
            Err(ProviderError::Exhausted(message)) => {
                assert!(message.contains("failing"));
                assert!(message.contains("slow timed out"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_chain_is_an_error() {
        let chain = ProviderChain::new(Duration::from_secs(1));
        assert!(chain.fetch(&query()).await.is_err());
        assert!(chain.provider_names().is_empty());
    }
}
