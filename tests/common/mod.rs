//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use health_gateway::cache::{HealthCache, MemoryHealthCache};
use health_gateway::config::{Environment, GatewayConfig};
use health_gateway::health::{
    BaseHealthIndicator, CachedHealth, HealthDependency, HealthIndicator, Probe, ProbeError,
};
use health_gateway::lifecycle::{Application, Shutdown};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` yields the status code and body for each request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A dependency whose probe outcome the test controls.
pub struct MockDependency {
    health: CachedHealth,
    healthy: AtomicBool,
    delay_ms: AtomicU64,
    probes: AtomicUsize,
}

impl MockDependency {
    pub fn new(cache_key: &str, cache: Arc<dyn HealthCache>, healthy: bool) -> Self {
        Self {
            health: CachedHealth::new(cache_key, cache),
            healthy: AtomicBool::new(healthy),
            delay_ms: AtomicU64::new(0),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Make every probe take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthDependency for MockDependency {
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
impl Probe for MockDependency {
    async fn probe(&self) -> Result<(), ProbeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedReply("mock failure".to_string()))
        }
    }
}

/// The three standard indicators backed by mocks and one memory cache.
pub struct MockStack {
    pub cache: MemoryHealthCache,
    pub database: Arc<MockDependency>,
    pub dashboard: Arc<MockDependency>,
    pub redis: Arc<MockDependency>,
}

impl MockStack {
    pub fn healthy() -> Self {
        let cache = MemoryHealthCache::new();
        let shared: Arc<dyn HealthCache> = Arc::new(cache.clone());
        Self {
            database: Arc::new(MockDependency::new("Database:Healthy", shared.clone(), true)),
            dashboard: Arc::new(MockDependency::new("Dashboard:Healthy", shared.clone(), true)),
            redis: Arc::new(MockDependency::new("Redis:Healthy", shared, true)),
            cache,
        }
    }

    pub fn indicators(&self) -> Vec<Arc<dyn HealthIndicator>> {
        self.indicators_with_timeout(Duration::from_secs(2))
    }

    pub fn indicators_with_timeout(&self, timeout: Duration) -> Vec<Arc<dyn HealthIndicator>> {
        vec![
            Arc::new(BaseHealthIndicator::new("database", self.database.clone(), timeout)),
            Arc::new(BaseHealthIndicator::new("dashboard", self.dashboard.clone(), timeout)),
            Arc::new(BaseHealthIndicator::new("redis", self.redis.clone(), timeout)),
        ]
    }
}

/// Configuration for in-process gateways: polling off, default endpoints.
pub fn test_config(git_sha: Option<&str>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.environment = Environment::Test;
    config.listener.bind_address = "127.0.0.1:0".to_string();
    if let Some(sha) = git_sha {
        config.build.git_sha = sha.to_string();
    }
    config
}

/// A gateway serving on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Arc<Shutdown>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `app` in the background.
pub async fn spawn_gateway(app: Application, shutdown: Arc<Shutdown>) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        app.run(listener, &server_shutdown).await.unwrap();
    });

    TestGateway { addr, shutdown }
}
