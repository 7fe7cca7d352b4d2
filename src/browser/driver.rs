//! Local WebDriver server process (chromedriver).

use crate::config::DriverConfig;
use crate::error::ScrapeError;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

const READY_PROBE_INTERVAL: Duration = Duration::from_millis(100);

/// A running chromedriver. The process is killed when the service is
/// stopped or dropped, so a failed session setup never leaks it.
pub struct DriverService {
    child: Child,
    port: u16,
}

impl DriverService {
    /// Spawns the server and waits until its port accepts connections.
    pub async fn start(config: &DriverConfig) -> Result<Self, ScrapeError> {
        info!("Starting WebDriver server {} on port {}", config.path.display(), config.port);

        if port_open(config.port).await {
            return Err(ScrapeError::PortInUse { port: config.port });
        }

        let child = Command::new(&config.path)
            .arg(format!("--port={}", config.port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScrapeError::DriverStart { path: config.path.clone(), source })?;

        let mut service = Self { child, port: config.port };
        service.wait_ready(config).await?;

        debug!("WebDriver server ready on port {}", service.port);
        Ok(service)
    }

    async fn wait_ready(&mut self, config: &DriverConfig) -> Result<(), ScrapeError> {
        let timeout = config.startup_timeout();
        let deadline = Instant::now() + timeout;

        loop {
            let listening = port_open(self.port).await;

            // An exited child is never ready, even if another process answers on the port
            let exited = self
                .child
                .try_wait()
                .map_err(|source| ScrapeError::DriverStart { path: config.path.clone(), source })?;
            if let Some(status) = exited {
                return Err(ScrapeError::DriverExited { status });
            }

            if listening {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ScrapeError::DriverNotReady { port: self.port, timeout });
            }

            sleep(READY_PROBE_INTERVAL).await;
        }
    }

    /// Kills the server and waits for it to exit.
    pub async fn stop(mut self) {
        debug!("Stopping WebDriver server on port {}", self.port);
        if let Err(e) = self.child.kill().await {
            warn!("Failed to stop WebDriver server: {}", e);
        }
    }
}

async fn port_open(port: u16) -> bool {
    TcpStream::connect(("127.0.0.1", port)).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let config = DriverConfig {
            path: PathBuf::from("/nonexistent/bin/chromedriver"),
            port: free_port(),
            ..DriverConfig::default()
        };

        match DriverService::start(&config).await {
            Err(ScrapeError::DriverStart { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/bin/chromedriver"));
            }
            Err(other) => panic!("expected DriverStart, got {:?}", other),
            Ok(_) => panic!("expected DriverStart, got a running service"),
        }
    }

    #[tokio::test]
    async fn test_port_already_in_use() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = DriverConfig {
            path: PathBuf::from("/nonexistent/bin/chromedriver"),
            port,
            ..DriverConfig::default()
        };

        match DriverService::start(&config).await {
            Err(ScrapeError::PortInUse { port: busy }) => assert_eq!(busy, port),
            Err(other) => panic!("expected PortInUse, got {:?}", other),
            Ok(_) => panic!("expected PortInUse, got a running service"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_server_exits_before_ready() {
        let config = DriverConfig {
            path: PathBuf::from("true"),
            port: free_port(),
            startup_timeout_ms: 5000,
            ..DriverConfig::default()
        };

        let err = DriverService::start(&config).await.err().unwrap();
        assert!(matches!(err, ScrapeError::DriverExited { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_server_never_listens() {
        let config = DriverConfig {
            path: PathBuf::from("sleep"),
            port: free_port(),
            startup_timeout_ms: 300,
            ..DriverConfig::default()
        };

        // `sleep --port=N` rejects the flag and exits, or keeps running without
        // listening; both must end in an error rather than a ready service.
        let err = DriverService::start(&config).await.err().unwrap();
        assert!(matches!(
            err,
            ScrapeError::DriverExited { .. } | ScrapeError::DriverNotReady { .. }
        ));
    }
}
