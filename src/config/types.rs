use serde::Deserialize;

/// Listing categories crawled when no `sources` are configured
const DEFAULT_SOURCES: &[&str] = &[
    "https://www.dy2018.com/html/gndy/jddyy/",
    "https://www.dy2018.com/html/gndy/jddy/",
    "https://www.dy2018.com/html/gndy/dyzz/",
    "https://www.dy2018.com/html/bikan/",
    "https://www.dy2018.com/html/dongman/index.html",
    "https://www.dy2018.com/html/zongyi2013/index.html",
    "https://www.dy2018.com/html/tv/rihantv/index.html",
    "https://www.dy2018.com/html/tv/oumeitv/index.html",
    "https://www.dy2018.com/html/tv/hytv/index.html",
    "https://www.dy2018.com/html/gndy/rihan/",
    "https://www.dy2018.com/html/gndy/oumei/",
    "https://www.dy2018.com/0/",
    "https://www.dy2018.com/1/",
    "https://www.dy2018.com/2/",
    "https://www.dy2018.com/3/",
    "https://www.dy2018.com/4/",
    "https://www.dy2018.com/5/",
    "https://www.dy2018.com/6/",
    "https://www.dy2018.com/7/",
    "https://www.dy2018.com/8/",
    "https://www.dy2018.com/9/",
    "https://www.dy2018.com/10/",
    "https://www.dy2018.com/11/",
    "https://www.dy2018.com/12/",
    "https://www.dy2018.com/13/",
    "https://www.dy2018.com/14/",
    "https://www.dy2018.com/15/",
    "https://www.dy2018.com/16/",
    "https://www.dy2018.com/17/",
    "https://www.dy2018.com/18/",
    "https://www.dy2018.com/19/",
    "https://www.dy2018.com/20/",
];

/// Main configuration structure for Reel-Harvest
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub delays: DelayConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,

    /// Listing source URLs, crawled in order
    pub sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            fetch: FetchConfig::default(),
            delays: DelayConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The target site
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Origin that relative detail links are resolved against
    pub base_url: String,

    /// The site's own domain; HTTP link candidates containing it are ignored
    pub domain: String,

    /// Encoding label the site serves its pages in
    pub encoding: String,

    /// Encoding label tried when the primary decode fails
    pub fallback_encoding: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.dy2018.com".to_string(),
            domain: "dy2018.com".to_string(),
            encoding: "gb2312".to_string(),
            fallback_encoding: "utf-8".to_string(),
        }
    }
}

/// HTTP request behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// Backoff before the first retry; doubles on every further retry (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound of the random component added to each backoff (milliseconds)
    pub jitter_ms: u64,

    /// Per-attempt timeout (seconds)
    pub timeout_secs: u64,

    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,

    /// Optional Referer header
    pub referer: Option<String>,

    /// Send `Cache-Control: no-cache` and `Pragma: no-cache`
    pub no_cache: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 5000,
            jitter_ms: 3000,
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            referer: Some("https://www.dy2018.com/".to_string()),
            no_cache: true,
        }
    }
}

/// Politeness pauses (milliseconds, zero disables)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DelayConfig {
    /// Before each detail page fetch
    pub detail_ms: u64,

    /// After each listing page beyond the first
    pub page_ms: u64,

    /// After each listing source
    pub source_ms: u64,

    /// Between records during a repair pass
    pub repair_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            detail_ms: 1000,
            page_ms: 2000,
            source_ms: 5000,
            repair_ms: 2000,
        }
    }
}

impl DelayConfig {
    /// A configuration with every pause disabled
    pub fn none() -> Self {
        Self {
            detail_ms: 0,
            page_ms: 0,
            source_ms: 0,
            repair_ms: 0,
        }
    }
}

/// Detail page extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionConfig {
    /// Phrases that mark an anti-scraping block page
    pub block_phrases: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            block_phrases: vec!["访问太频繁".to_string(), "请求被拒绝".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the primary record file
    pub movies_path: String,

    /// Path to the failed-attempt file
    pub failed_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            movies_path: "movies.csv".to_string(),
            failed_path: "failed.csv".to_string(),
        }
    }
}
