use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "creatorkit")]
#[command(about = "Creator tools API server", long_about = None)]
pub struct Config {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout: u64,

    #[arg(long, env = "CORS_ORIGINS", default_value = "")]
    pub cors_origins: String,

    // metadata sources, tried in this order
    #[arg(long, env = "YOUTUBE_API_KEY")]
    pub youtube_api_key: Option<String>,

    #[arg(long, env = "YOUTUBE_API_URL", default_value = "https://www.googleapis.com/youtube/v3")]
    pub youtube_api_url: String,

    #[arg(long, env = "INDEX_URL", default_value = "https://inv.nadeko.net")]
    pub index_url: String,

    #[arg(long, env = "WATCH_URL", default_value = "https://www.youtube.com")]
    pub watch_url: String,

    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value = "15")]
    pub source_timeout: u64,

    // paid generation tier (openai-compatible)
    #[arg(long, env = "AI_API_KEY")]
    pub ai_api_key: Option<String>,

    #[arg(long, env = "AI_BASE_URL", default_value = "https://api.deepinfra.com/v1/openai")]
    pub ai_base_url: String,

    #[arg(long, env = "AI_MODEL", default_value = "meta-llama/Meta-Llama-3.1-8B-Instruct")]
    pub ai_model: String,

    #[arg(long, env = "AI_TIMEOUT_SECS", default_value = "30")]
    pub ai_timeout: u64,

    // result cache
    #[arg(long, env = "CACHE_MAX_ENTRIES", default_value = "2000")]
    pub cache_max_entries: usize,

    #[arg(long, env = "CACHE_INFO_TTL_SECS", default_value = "3600")]
    pub cache_info_ttl: u64,

    #[arg(long, env = "CACHE_DERIVED_TTL_SECS", default_value = "600")]
    pub cache_derived_ttl: u64,

    #[arg(long, env = "CACHE_GENERATION_TTL_SECS", default_value = "900")]
    pub cache_generation_ttl: u64,

    // per-client admission
    #[arg(long, env = "RATE_LIMIT_POINTS", default_value = "120")]
    pub rate_limit_points: u32,

    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value = "300")]
    pub rate_limit_window: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window)
    }

    pub fn cache_generation_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_generation_ttl)
    }
}

#[cfg(test)]
impl Config {
    /// Config as if the binary were started without flags.
    pub fn for_tests() -> Self {
        Self::parse_from(["creatorkit"])
    }
}
