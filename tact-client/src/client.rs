//! Client root object: wires the allocator, file-I/O façade, transport,
//! logging, statistics, and the remote coordinator into one handle.

use std::sync::Arc;

use ngdp_buffer::{BufferAllocator, SystemAllocator};
use ngdp_cdn::{HttpTransport, Transport};

use crate::config::ClientConfig;
use crate::coordinator::RemoteCoordinator;
use crate::error::{Error, Result};
use crate::file_io::{FileIo, StdFileIo};
use crate::log::{Logger, TracingLogSink};
use crate::stats::{StatsSink, TracingStatsSink};

pub struct Client {
    allocator: Arc<dyn BufferAllocator>,
    file_io: Arc<dyn FileIo>,
    logger: Arc<Logger>,
    stats: Arc<dyn StatsSink>,
    coordinator: RemoteCoordinator,
}

impl Client {
    /// Validates the configuration, installs defaults for any unset
    /// callback, and runs the bootstrap downloads unless
    /// `disable_http_requests` is set. Memory and file callbacks are each a
    /// single trait object, so "all supplied or all omitted" is enforced by
    /// the type itself rather than by a runtime check here.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        if config.ngdp_url.is_empty() || config.game_uid.is_empty() {
            return Err(Error::InvalidConfiguration(
                "ngdp_url and game_uid are required".to_string(),
            ));
        }

        let allocator: Arc<dyn BufferAllocator> = config
            .allocator
            .clone()
            .unwrap_or_else(|| Arc::new(SystemAllocator));
        let file_io: Arc<dyn FileIo> = config.file_io.clone().unwrap_or_else(|| Arc::new(StdFileIo::new()));
        let log_sink = config.log_sink.clone().unwrap_or_else(|| Arc::new(TracingLogSink));
        let logger = Arc::new(Logger::new(log_sink));
        let stats: Arc<dyn StatsSink> = config
            .stats_sink
            .clone()
            .unwrap_or_else(|| Arc::new(TracingStatsSink));

        let transport: Option<Arc<dyn Transport>> = if config.disable_http_requests {
            None
        } else if let Some(transport) = config.transport.clone() {
            Some(transport)
        } else {
            let default_transport =
                HttpTransport::new().map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
            Some(Arc::new(default_transport))
        };

        let mut coordinator = RemoteCoordinator::new(
            config.ngdp_url.clone(),
            config.ngdp_region.as_str().to_string(),
            config.game_uid.clone(),
            config.retry_limit,
            transport,
            logger.clone(),
            stats.clone(),
        );
        coordinator.apply_overrides(&config);

        if !config.disable_http_requests {
            coordinator.bootstrap().await?;
        }

        Ok(Self {
            allocator,
            file_io,
            logger,
            stats,
            coordinator,
        })
    }

    pub fn coordinator(&self) -> &RemoteCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut RemoteCoordinator {
        &mut self.coordinator
    }

    pub fn allocator(&self) -> &Arc<dyn BufferAllocator> {
        &self.allocator
    }

    pub fn file_io(&self) -> &Arc<dyn FileIo> {
        &self.file_io
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn stats(&self) -> &Arc<dyn StatsSink> {
        &self.stats
    }
}
