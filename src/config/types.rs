use serde::Deserialize;

/// Main configuration structure for casafeed
///
/// Every section has built-in defaults matching the production crawl
/// profile, so a config file only needs the keys it overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchLimits,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

/// Rate and resource limits for the fetch client
#[derive(Debug, Clone, Deserialize)]
pub struct FetchLimits {
    /// Maximum request-chain depth (index pages are roots, detail fetches
    /// hang off them)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent in-flight requests
    #[serde(rename = "parallelism", default = "default_parallelism")]
    pub parallelism: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fixed delay before each dispatch (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound of the uniformly random extra delay (milliseconds)
    #[serde(rename = "random-delay-ms", default = "default_random_delay_ms")]
    pub random_delay_ms: u64,

    /// User-agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Progress reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Seconds between progress log lines
    #[serde(rename = "interval-secs", default = "default_report_interval")]
    pub interval_secs: u64,
}

/// Local output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the per-crawler JSON artifact is written into
    #[serde(rename = "directory", default = "default_output_directory")]
    pub directory: String,
}

/// Upload collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Whether the artifact is handed to the uploader at all
    #[serde(default)]
    pub enabled: bool,

    /// Destination template; supports {year} {month} {week} {day} {botname}
    #[serde(rename = "destination-template", default = "default_destination_template")]
    pub destination_template: String,

    /// Root the filesystem uploader archives under
    #[serde(rename = "archive-dir", default = "default_archive_dir")]
    pub archive_dir: String,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            parallelism: default_parallelism(),
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
            random_delay_ms: default_random_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_report_interval(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            destination_template: default_destination_template(),
            archive_dir: default_archive_dir(),
        }
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_parallelism() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    250
}

fn default_delay_ms() -> u64 {
    1_000
}

fn default_random_delay_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/88.0.4324.190 Safari/537.36"
        .to_string()
}

fn default_report_interval() -> u64 {
    5
}

fn default_output_directory() -> String {
    "./tmp".to_string()
}

fn default_destination_template() -> String {
    "{year}/{month}/{week}/{botname}.json".to_string()
}

fn default_archive_dir() -> String {
    "./archive".to_string()
}
