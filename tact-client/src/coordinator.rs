//! Remote coordinator: bootstrap, content-addressed URL construction, host
//! selection, and the retry loop shared by the four public download entry
//! points.
//!
//! The retry loop is attempt-counted rather than time-based, so it runs as
//! a plain bounded loop instead of a sleeping backoff; [`ngdp_cdn::Transport`]
//! supplies the actual network call.
//!
//! **Concurrency.** Every method here takes `&mut self` and nothing
//! suspends except the transport call. The host-rate table and the log
//! scratch buffer are process-local and unguarded, on the assumption that
//! at most one caller drives a given coordinator at a time; a future
//! multi-threaded client would need a mutex around both.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ngdp_bpsv::BpsvDocument;
use ngdp_cdn::{ByteRange, DownloadBuffer, DownloadOutcome, DownloadStatus, Transport};
use ngdp_key::ContentKey;
use ngdp_manifest::{BuildConfig, CdnConfig};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::log::Logger;
use crate::resource::ResourceType;
use crate::stats::{StatEvent, StatsSink};

/// Up to this many CDN hosts are retained from the `/cdns` bootstrap row.
const MAX_HOSTS: usize = 8;

/// Host rates below this many bytes/sec-equivalent are left alone; above
/// it, selecting that host halves its recorded rate so it doesn't
/// permanently win.
const RATE_DECAY_THRESHOLD: f64 = 10.0;

/// Assumed body size for a HEAD-shaped zero-byte success, so host
/// selection still has a rate to compare.
const NOMINAL_HEAD_BYTES: u64 = 512;

pub struct RemoteCoordinator {
    patch_url: String,
    region: String,
    product: String,
    retry_limit: i64,
    transport: Option<Arc<dyn Transport>>,
    logger: Arc<Logger>,
    stats: Arc<dyn StatsSink>,

    cdn_path: String,
    cdn_hosts: Vec<String>,
    cdn_host_count: usize,
    host_rates: Vec<f64>,
    cdn_host_index: usize,
    next_cdn_host_index: usize,

    build_config_key: ContentKey,
    cdn_config_key: ContentKey,
    versions_name: String,

    override_cdns: Option<(String, Vec<String>)>,
    override_cdn_config_path: Option<String>,
    override_build_config_key: Option<ContentKey>,
    override_cdn_config_key: Option<ContentKey>,
}

impl RemoteCoordinator {
    pub fn new(
        patch_url: String,
        region: String,
        product: String,
        retry_limit: i64,
        transport: Option<Arc<dyn Transport>>,
        logger: Arc<Logger>,
        stats: Arc<dyn StatsSink>,
    ) -> Self {
        Self {
            patch_url,
            region,
            product,
            retry_limit,
            transport,
            logger,
            stats,
            cdn_path: String::new(),
            cdn_hosts: Vec::new(),
            cdn_host_count: 0,
            host_rates: Vec::new(),
            cdn_host_index: 0,
            next_cdn_host_index: 0,
            build_config_key: ContentKey::from_bytes([0; 16]),
            cdn_config_key: ContentKey::from_bytes([0; 16]),
            versions_name: String::new(),
            override_cdns: None,
            override_cdn_config_path: None,
            override_build_config_key: None,
            override_cdn_config_key: None,
        }
    }

    pub(crate) fn apply_overrides(&mut self, config: &ClientConfig) {
        if let (Some(path), Some(hosts)) = (&config.override_cdn_path, &config.override_cdn_hosts) {
            self.override_cdns = Some((path.clone(), hosts.clone()));
        }
        self.override_cdn_config_path = config.override_cdn_config_path.clone();
        self.override_build_config_key = config.override_build_config_key;
        self.override_cdn_config_key = config.override_cdn_config_key;
    }

    fn effective_retry_limit(&self) -> u32 {
        self.retry_limit.max(5).try_into().unwrap_or(5)
    }

    // -- bootstrap ---------------------------------------------------------

    pub async fn bootstrap(&mut self) -> Result<()> {
        if let Some((path, hosts)) = self.override_cdns.clone() {
            self.cdn_path = path;
            self.apply_hosts(hosts);
            self.logger.log("cdns bootstrap satisfied from override");
        } else {
            let url = format!("{}/{}/cdns", self.patch_url, self.product);
            let outcome = self.download_allocate_url(&url).await;
            if outcome.status() == DownloadStatus::Success {
                if let Some(body) = outcome.allocated {
                    self.parse_cdns_body(&body)?;
                }
            } else {
                self.logger.log("cdns bootstrap failed; host list left empty");
            }
        }

        let need_build = self.override_build_config_key.is_none();
        let need_cdn_config = self.override_cdn_config_key.is_none();
        if need_build || need_cdn_config {
            let url = format!("{}/{}/versions", self.patch_url, self.product);
            let outcome = self.download_allocate_url(&url).await;
            if outcome.status() == DownloadStatus::Success {
                if let Some(body) = outcome.allocated {
                    self.parse_versions_body(&body)?;
                }
            } else {
                self.logger.log("versions bootstrap failed; config keys left default");
            }
        }

        if let Some(key) = self.override_build_config_key {
            self.build_config_key = key;
        }
        if let Some(key) = self.override_cdn_config_key {
            self.cdn_config_key = key;
        }
        Ok(())
    }

    fn apply_hosts(&mut self, hosts: Vec<String>) {
        self.cdn_hosts = hosts.into_iter().filter(|h| !h.is_empty()).take(MAX_HOSTS).collect();
        self.cdn_host_count = self.cdn_hosts.len();
        self.host_rates = vec![0.0; self.cdn_host_count];
        self.cdn_host_index = 0;
        self.next_cdn_host_index = 0;
    }

    fn parse_cdns_body(&mut self, body: &[u8]) -> Result<()> {
        let content = String::from_utf8_lossy(body).into_owned();
        let doc = BpsvDocument::parse(&content, &self.region)?;
        if let Some(path) = doc.get_cell(0, "Path")? {
            self.cdn_path = path.to_string();
        }
        if let Some(hosts) = doc.get_cell(0, "Hosts")? {
            let list: Vec<String> = hosts.split_whitespace().map(str::to_string).collect();
            self.apply_hosts(list);
        }
        Ok(())
    }

    fn parse_versions_body(&mut self, body: &[u8]) -> Result<()> {
        let content = String::from_utf8_lossy(body).into_owned();
        let doc = BpsvDocument::parse(&content, &self.region)?;
        if self.override_build_config_key.is_none() {
            if let Some(hex) = doc.get_cell(0, "BuildConfig")? {
                self.build_config_key = ContentKey::from_hex(hex)?;
            }
        }
        if self.override_cdn_config_key.is_none() {
            if let Some(hex) = doc.get_cell(0, "CDNConfig")? {
                self.cdn_config_key = ContentKey::from_hex(hex)?;
            }
        }
        if let Some(name) = doc.get_cell(0, "VersionsName")? {
            self.versions_name = name.to_string();
        }
        Ok(())
    }

    // -- host selection ------------------------------------------------

    /// Picks the best-rated host among indices strictly below
    /// `cdn_host_index`, starting the scan at `next_cdn_host_index` and
    /// defaulting to `next_cdn_host_index` itself when no lower index beats
    /// a rate of zero. An unmeasured or all-cold host set therefore always
    /// drifts `cdn_host_index` down toward `next_cdn_host_index` (typically
    /// 0) instead of staying put.
    fn rotate_host(&mut self) {
        if self.cdn_host_count == 0 {
            return;
        }
        let upper = self.cdn_host_index.min(self.cdn_host_count);
        let mut best_index = self.next_cdn_host_index;
        let mut best_rate = 0.0_f64;

        if upper > 0 {
            for offset in 0..upper {
                let i = (self.next_cdn_host_index + offset) % upper;
                if let Some(&rate) = self.host_rates.get(i) {
                    if rate > best_rate {
                        best_rate = rate;
                        best_index = i;
                    }
                }
            }
        }

        if let Some(rate) = self.host_rates.get_mut(best_index) {
            if *rate > RATE_DECAY_THRESHOLD {
                *rate /= 2.0;
            }
        }
        self.cdn_host_index = best_index;
    }

    fn record_rate(&mut self, host_index: usize, size: u64, elapsed: Duration) {
        if host_index >= self.host_rates.len() {
            return;
        }
        let bytes = if size > 0 { size } else { NOMINAL_HEAD_BYTES };
        let secs = elapsed.as_secs_f64().max(1e-6);
        self.host_rates[host_index] = bytes as f64 / secs;
        if self.cdn_host_count > 0 {
            self.next_cdn_host_index = (host_index + 1) % self.cdn_host_count;
        }
    }

    fn build_resource_url(&mut self, resource: ResourceType, is_index: bool, key: &ContentKey) -> String {
        self.rotate_host();
        let host = self.cdn_hosts.get(self.cdn_host_index).cloned().unwrap_or_default();
        let path = if matches!(resource, ResourceType::Config) {
            self.override_cdn_config_path.clone().unwrap_or_else(|| self.cdn_path.clone())
        } else {
            self.cdn_path.clone()
        };
        let suffix = if is_index { ".index" } else { "" };
        format!("http://{host}/{path}{}{}{suffix}", resource.segment(), key.url_fragment())
    }

    // -- retry loop ------------------------------------------------------

    async fn run_retries_allocate(
        &mut self,
        mut url_for_attempt: impl FnMut(&mut Self) -> String,
        range: Option<ByteRange>,
    ) -> DownloadOutcome {
        let Some(transport) = self.transport.clone() else {
            return DownloadOutcome {
                status: Some(DownloadStatus::RetryableServerError),
                ..Default::default()
            };
        };

        let retry_limit = self.effective_retry_limit();
        let start_all = Instant::now();
        let mut outcome = DownloadOutcome::default();
        let mut host_index_used = self.cdn_host_index;

        for attempt in 1..=retry_limit {
            let url = url_for_attempt(&mut *self);
            host_index_used = self.cdn_host_index;
            self.emit_attempt_event(attempt, start_all.elapsed());

            let attempt_start = Instant::now();
            outcome = transport.download(&url, range, DownloadBuffer::Allocate).await;
            self.record_rate(host_index_used, outcome.size, attempt_start.elapsed());

            if outcome.status() != DownloadStatus::RetryableServerError {
                break;
            }
        }

        self.emit_finished_event(host_index_used, &outcome, start_all.elapsed());
        outcome
    }

    async fn run_retries_fixed(
        &mut self,
        mut url_for_attempt: impl FnMut(&mut Self) -> String,
        range: Option<ByteRange>,
        slice: &mut [u8],
    ) -> DownloadOutcome {
        let Some(transport) = self.transport.clone() else {
            return DownloadOutcome {
                status: Some(DownloadStatus::RetryableServerError),
                ..Default::default()
            };
        };

        let retry_limit = self.effective_retry_limit();
        let start_all = Instant::now();
        let mut outcome = DownloadOutcome::default();
        let mut host_index_used = self.cdn_host_index;

        for attempt in 1..=retry_limit {
            let url = url_for_attempt(&mut *self);
            host_index_used = self.cdn_host_index;
            self.emit_attempt_event(attempt, start_all.elapsed());

            let attempt_start = Instant::now();
            outcome = transport.download(&url, range, DownloadBuffer::Fixed(&mut *slice)).await;
            self.record_rate(host_index_used, outcome.size, attempt_start.elapsed());

            if outcome.status() != DownloadStatus::RetryableServerError {
                break;
            }
        }

        self.emit_finished_event(host_index_used, &outcome, start_all.elapsed());
        outcome
    }

    fn emit_attempt_event(&self, attempt: u32, elapsed_since_start: Duration) {
        let elapsed_micros = elapsed_since_start.as_micros().min(i64::MAX as u128) as i64;
        let event = if attempt == 1 { StatEvent::DownloadStarted } else { StatEvent::DownloadRetry };
        self.stats.record(event, elapsed_micros, i64::from(attempt), 0, None);
    }

    fn emit_finished_event(&self, host_index: usize, outcome: &DownloadOutcome, total_elapsed: Duration) {
        let elapsed_micros = total_elapsed.as_micros().min(i64::MAX as u128) as i64;
        self.stats.record(
            StatEvent::DownloadFinished,
            host_index as i64,
            outcome.size as i64,
            elapsed_micros,
            None,
        );
    }

    // -- public entry points ----------------------------------------------

    /// Allocated-mode download of an arbitrary URL (used for the bootstrap
    /// calls, and available for callers that already have a full URL).
    pub async fn download_allocate_url(&mut self, url: &str) -> DownloadOutcome {
        let url = url.to_string();
        self.run_retries_allocate(move |_| url.clone(), None).await
    }

    /// Allocated-mode download of a content-addressed resource.
    pub async fn download_allocate_resource(
        &mut self,
        resource: ResourceType,
        is_index: bool,
        key: ContentKey,
    ) -> DownloadOutcome {
        self.run_retries_allocate(move |c| c.build_resource_url(resource, is_index, &key), None).await
    }

    /// Fixed-buffer download of an arbitrary URL. The caller guarantees
    /// `slice` is at least `range.1 - range.0` bytes when a range is given.
    pub async fn download_url(&mut self, slice: &mut [u8], url: &str, range: Option<ByteRange>) -> DownloadOutcome {
        let url = url.to_string();
        self.run_retries_fixed(move |_| url.clone(), range, slice).await
    }

    /// Fixed-buffer download of a content-addressed resource.
    pub async fn download_resource(
        &mut self,
        slice: &mut [u8],
        resource: ResourceType,
        is_index: bool,
        key: ContentKey,
        range: Option<ByteRange>,
    ) -> DownloadOutcome {
        self.run_retries_fixed(move |c| c.build_resource_url(resource, is_index, &key), range, slice).await
    }

    /// Downloads and parses the bootstrapped CDN-config record.
    pub async fn fetch_cdn_config(&mut self) -> Result<CdnConfig> {
        let key = self.cdn_config_key;
        let outcome = self.download_allocate_resource(ResourceType::Config, false, key).await;
        let body = outcome.allocated.unwrap_or_default();
        Ok(CdnConfig::parse(&String::from_utf8_lossy(&body))?)
    }

    /// Downloads and parses the bootstrapped build-config record.
    pub async fn fetch_build_config(&mut self) -> Result<BuildConfig> {
        let key = self.build_config_key;
        let outcome = self.download_allocate_resource(ResourceType::Config, false, key).await;
        let body = outcome.allocated.unwrap_or_default();
        Ok(BuildConfig::parse(&String::from_utf8_lossy(&body))?)
    }

    // -- accessors ---------------------------------------------------------

    pub fn cdn_path(&self) -> &str {
        &self.cdn_path
    }

    pub fn cdn_hosts(&self) -> &[String] {
        &self.cdn_hosts
    }

    pub fn cdn_host_count(&self) -> usize {
        self.cdn_host_count
    }

    pub fn cdn_host_index(&self) -> usize {
        self.cdn_host_index
    }

    pub fn build_config_key(&self) -> ContentKey {
        self.build_config_key
    }

    pub fn cdn_config_key(&self) -> ContentKey {
        self.cdn_config_key
    }

    pub fn versions_name(&self) -> &str {
        &self.versions_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TracingLogSink;
    use crate::stats::StatEvent;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingStats(Mutex<Vec<(StatEvent, i64, i64, i64)>>);

    impl StatsSink for RecordingStats {
        fn record(&self, event: StatEvent, arg0: i64, arg1: i64, arg2: i64, _key: Option<ContentKey>) {
            self.0.lock().unwrap().push((event, arg0, arg1, arg2));
        }
    }

    struct AlwaysRetryable;

    #[async_trait::async_trait]
    impl Transport for AlwaysRetryable {
        async fn download(&self, _url: &str, _range: Option<ByteRange>, _buffer: DownloadBuffer<'_>) -> DownloadOutcome {
            DownloadOutcome {
                status: Some(DownloadStatus::RetryableServerError),
                ..Default::default()
            }
        }
    }

    struct FailsOnceThenSucceeds(std::sync::atomic::AtomicU32);

    #[async_trait::async_trait]
    impl Transport for FailsOnceThenSucceeds {
        async fn download(&self, _url: &str, _range: Option<ByteRange>, _buffer: DownloadBuffer<'_>) -> DownloadOutcome {
            let n = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n == 0 {
                DownloadOutcome {
                    status: Some(DownloadStatus::NonRetryable4xx),
                    ..Default::default()
                }
            } else {
                DownloadOutcome {
                    status: Some(DownloadStatus::Success),
                    size: 10,
                    allocated: Some(vec![0u8; 10]),
                    written: 0,
                }
            }
        }
    }

    fn coordinator_with(transport: Arc<dyn Transport>, retry_limit: i64, stats: Arc<dyn StatsSink>) -> RemoteCoordinator {
        RemoteCoordinator::new(
            "https://patch.example".to_string(),
            "us".to_string(),
            "wow".to_string(),
            retry_limit,
            Some(transport),
            Arc::new(Logger::new(Arc::new(TracingLogSink))),
            stats,
        )
    }

    #[tokio::test]
    async fn retry_exhaustion_invokes_the_transport_max_of_retry_limit_and_five_times() {
        let stats = Arc::new(RecordingStats::default());
        let mut coordinator = coordinator_with(Arc::new(AlwaysRetryable), 3, stats.clone());

        let outcome = coordinator.download_allocate_url("https://patch.example/probe").await;

        assert_eq!(outcome.status(), DownloadStatus::RetryableServerError);
        let events = stats.0.lock().unwrap();
        assert_eq!(events.len(), 7); // 1 started + 5 retries + 1 finished, since max(3,5) = 5
        assert_eq!(events[0].0, StatEvent::DownloadStarted);
        assert_eq!(events.last().unwrap().0, StatEvent::DownloadFinished);
        for mid in &events[1..6] {
            assert_eq!(mid.0, StatEvent::DownloadRetry);
        }
    }

    #[tokio::test]
    async fn non_retryable_status_stops_after_a_single_attempt() {
        let stats = Arc::new(RecordingStats::default());
        let transport = Arc::new(FailsOnceThenSucceeds(std::sync::atomic::AtomicU32::new(0)));
        let mut coordinator = coordinator_with(transport, 5, stats.clone());

        let outcome = coordinator.download_allocate_url("https://patch.example/probe").await;

        assert_eq!(outcome.status(), DownloadStatus::NonRetryable4xx);
        let events = stats.0.lock().unwrap();
        assert_eq!(events.len(), 2); // started + finished, no retries
    }

    #[tokio::test]
    async fn bootstrap_happy_path_extracts_path_hosts_and_keys() {
        let server = MockServer::start().await;
        let key_a = "aa".repeat(16);
        let key_b = "bb".repeat(16);
        Mock::given(method("GET"))
            .and(path("/wow/cdns"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "Name!STRING:0|Path!STRING:0|Hosts!STRING:0\nus|tpr/wow|h1.example h2.example\neu|tpr/wow|euh.example\n",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wow/versions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "Region!STRING:0|BuildConfig!HEX:16|CDNConfig!HEX:16|VersionsName!STRING:0\nus|{key_a}|{key_b}|8.2.0.30000\n"
            )))
            .mount(&server)
            .await;

        let transport = Arc::new(ngdp_cdn::HttpTransport::new().unwrap());
        let mut coordinator = coordinator_with(transport, 5, Arc::new(TracingStatsSinkForTest));
        coordinator.patch_url = server.uri();
        coordinator.bootstrap().await.unwrap();

        assert_eq!(coordinator.cdn_path(), "tpr/wow");
        assert_eq!(coordinator.cdn_hosts(), &["h1.example".to_string(), "h2.example".to_string()]);
        assert_eq!(coordinator.cdn_host_count(), 2);
        assert_eq!(coordinator.versions_name(), "8.2.0.30000");
        assert_eq!(coordinator.build_config_key(), ContentKey::from_hex(&key_a).unwrap());
        assert_eq!(coordinator.cdn_config_key(), ContentKey::from_hex(&key_b).unwrap());
    }

    #[derive(Default)]
    struct TracingStatsSinkForTest;
    impl StatsSink for TracingStatsSinkForTest {
        fn record(&self, _event: StatEvent, _arg0: i64, _arg1: i64, _arg2: i64, _key: Option<ContentKey>) {}
    }

    #[tokio::test]
    async fn rotate_host_drifts_toward_next_index_when_lower_hosts_are_cold() {
        let stats: Arc<dyn StatsSink> = Arc::new(TracingStatsSinkForTest);
        let mut coordinator = coordinator_with(Arc::new(AlwaysRetryable), 5, stats);
        coordinator.apply_hosts(vec![
            "h0.example".to_string(),
            "h1.example".to_string(),
            "h2.example".to_string(),
        ]);
        coordinator.cdn_host_index = 2;
        coordinator.next_cdn_host_index = 0;
        coordinator.host_rates = vec![0.0, 0.0, 50.0];

        coordinator.rotate_host();

        assert_eq!(coordinator.cdn_host_index(), 0);
    }

    #[tokio::test]
    async fn url_emission_matches_the_content_addressed_shape() {
        let stats: Arc<dyn StatsSink> = Arc::new(TracingStatsSinkForTest);
        let mut coordinator = coordinator_with(Arc::new(AlwaysRetryable), 5, stats);
        coordinator.apply_hosts(vec!["h1.example".to_string(), "h2.example".to_string()]);
        coordinator.cdn_path = "tpr/wow".to_string();

        let key = ContentKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        let url = coordinator.build_resource_url(ResourceType::Data, false, &key);
        assert_eq!(url, "http://h1.example/tpr/wow/data/00/11/00112233445566778899aabbccddeeff");

        let url = coordinator.build_resource_url(ResourceType::Data, true, &key);
        assert!(url.ends_with(".index"));
    }

    #[tokio::test]
    async fn fetch_cdn_config_parses_the_downloaded_body() {
        let server = MockServer::start().await;
        let archive_a = "aa".repeat(16);
        let archive_b = "bb".repeat(16);
        let body = format!("archives = {archive_a} {archive_b}\nbuilds = {archive_a}\n");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let transport = Arc::new(ngdp_cdn::HttpTransport::new().unwrap());
        let stats: Arc<dyn StatsSink> = Arc::new(TracingStatsSinkForTest);
        let mut coordinator = coordinator_with(transport, 5, stats);
        coordinator.apply_hosts(vec![server.address().to_string()]);
        coordinator.cdn_path = "tpr/wow".to_string();

        let config = coordinator.fetch_cdn_config().await.unwrap();
        assert_eq!(config.archives().len(), 2);
        assert_eq!(config.builds().len(), 1);
    }
}
