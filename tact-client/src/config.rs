//! Client configuration surface.

use std::sync::Arc;

use ngdp_buffer::BufferAllocator;
use ngdp_cdn::Transport;
use ngdp_key::ContentKey;

use crate::file_io::FileIo;
use crate::log::LogSink;
use crate::region::Region;
use crate::stats::StatsSink;

/// Configuration for [`crate::client::Client::new`].
///
/// Memory and file callbacks are each modeled as a single trait object
/// rather than a `{malloc, free, realloc}` / `{open, seek, read, write,
/// close}` tuple of function pointers, so the "all supplied or all omitted"
/// requirement on each set is automatically satisfied by the type system:
/// there is nothing left to validate once the value is `Some` or `None`.
pub struct ClientConfig {
    pub ngdp_url: String,
    pub ngdp_region: Region,
    pub game_uid: String,
    /// Local archive path. Unused by the core; carried for parity with the
    /// configuration surface.
    pub casc_path: Option<String>,
    /// Values `<= 0` (and values below 5) are brought up to 5; see
    /// [`crate::coordinator::RemoteCoordinator`]'s retry budget.
    pub retry_limit: i64,
    pub disable_http_requests: bool,
    pub allocator: Option<Arc<dyn BufferAllocator>>,
    pub file_io: Option<Arc<dyn FileIo>>,
    pub transport: Option<Arc<dyn Transport>>,
    pub log_sink: Option<Arc<dyn LogSink>>,
    pub stats_sink: Option<Arc<dyn StatsSink>>,
    /// Overrides the `/cdns` bootstrap step with a caller-supplied path and
    /// host list.
    pub override_cdn_path: Option<String>,
    pub override_cdn_hosts: Option<Vec<String>>,
    /// Overrides the CDN path used for `Config`-typed resource URLs only;
    /// falls back to `override_cdn_path` (or the fetched path) otherwise.
    pub override_cdn_config_path: Option<String>,
    /// Overrides the build-config key the `/versions` bootstrap step would
    /// otherwise extract.
    pub override_build_config_key: Option<ContentKey>,
    /// Overrides the CDN-config key the `/versions` bootstrap step would
    /// otherwise extract.
    pub override_cdn_config_key: Option<ContentKey>,
}

impl ClientConfig {
    pub fn new(ngdp_url: impl Into<String>, ngdp_region: Region, game_uid: impl Into<String>) -> Self {
        Self {
            ngdp_url: ngdp_url.into(),
            ngdp_region,
            game_uid: game_uid.into(),
            casc_path: None,
            retry_limit: 0,
            disable_http_requests: false,
            allocator: None,
            file_io: None,
            transport: None,
            log_sink: None,
            stats_sink: None,
            override_cdn_path: None,
            override_cdn_hosts: None,
            override_cdn_config_path: None,
            override_build_config_key: None,
            override_cdn_config_key: None,
        }
    }

    pub fn with_retry_limit(mut self, retry_limit: i64) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    pub fn with_disable_http_requests(mut self, disable: bool) -> Self {
        self.disable_http_requests = disable;
        self
    }

    pub fn with_casc_path(mut self, path: impl Into<String>) -> Self {
        self.casc_path = Some(path.into());
        self
    }

    pub fn with_allocator(mut self, allocator: Arc<dyn BufferAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    pub fn with_file_io(mut self, file_io: Arc<dyn FileIo>) -> Self {
        self.file_io = Some(file_io);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    pub fn with_stats_sink(mut self, sink: Arc<dyn StatsSink>) -> Self {
        self.stats_sink = Some(sink);
        self
    }

    pub fn with_override_cdns(mut self, path: impl Into<String>, hosts: Vec<String>) -> Self {
        self.override_cdn_path = Some(path.into());
        self.override_cdn_hosts = Some(hosts);
        self
    }

    pub fn with_override_cdn_config_path(mut self, path: impl Into<String>) -> Self {
        self.override_cdn_config_path = Some(path.into());
        self
    }

    pub fn with_override_build_config_key(mut self, key: ContentKey) -> Self {
        self.override_build_config_key = Some(key);
        self
    }

    pub fn with_override_cdn_config_key(mut self, key: ContentKey) -> Self {
        self.override_cdn_config_key = Some(key);
        self
    }
}
