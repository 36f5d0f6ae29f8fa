//! Upstream Dashboard (Station) HTTP dependency.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::cache::HealthCache;
use crate::config::DashboardConfig;
use crate::health::{CachedHealth, HealthDependency, Probe, ProbeError};
use crate::indicators::SetupError;

pub const CACHE_KEY: &str = "Dashboard:Healthy";

pub struct DashboardDependency {
    client: reqwest::Client,
    ping_url: Url,
    health: CachedHealth,
}

impl DashboardDependency {
    pub fn new(config: &DashboardConfig, cache: Arc<dyn HealthCache>) -> Result<Self, SetupError> {
        let ping_url = Url::parse(&format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            config.ping_path
        ))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("health-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            ping_url,
            health: CachedHealth::new(CACHE_KEY, cache),
        })
    }

    pub fn ping_url(&self) -> &Url {
        &self.ping_url
    }
}

#[async_trait]
impl HealthDependency for DashboardDependency {
    async fn is_healthy(&self) -> Option<bool> {
        self.health.is_healthy().await
    }

    async fn mark_as_healthy(&self) {
        self.health.mark_as_healthy().await
    }

    async fn mark_as_unhealthy(&self) {
        self.health.mark_as_unhealthy().await
    }
}

#[async_trait]
impl Probe for DashboardDependency {
    async fn probe(&self) -> Result<(), ProbeError> {
        let response = self.client.get(self.ping_url.clone()).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedStatus(status.as_u16()))
        }
    }
}
