use serde::Deserialize;

/// Main configuration structure for the page analyzer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Job execution and link probing limits
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Maximum number of analysis jobs running at the same time
    #[serde(rename = "max-concurrent-jobs", default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: u32,

    /// Number of dispatched job ids that may wait for a free worker
    #[serde(rename = "job-queue-capacity", default = "default_job_queue_capacity")]
    pub job_queue_capacity: u32,

    /// Maximum number of in-flight HEAD probes per analyzed page
    #[serde(rename = "max-concurrent-probes", default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: u32,

    /// Capacity of the channel that collects probe outcomes
    #[serde(rename = "probe-channel-capacity", default = "default_probe_channel_capacity")]
    pub probe_channel_capacity: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            job_queue_capacity: default_job_queue_capacity(),
            max_concurrent_probes: default_max_concurrent_probes(),
            probe_channel_capacity: default_probe_channel_capacity(),
        }
    }
}

/// HTTP client configuration
///
/// Unset values keep the reqwest defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with page fetches and link probes
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_max_concurrent_jobs() -> u32 {
    4
}

fn default_job_queue_capacity() -> u32 {
    256
}

fn default_max_concurrent_probes() -> u32 {
    50
}

fn default_probe_channel_capacity() -> u32 {
    100
}

fn default_database_path() -> String {
    "./page-analyzer.db".to_string()
}
