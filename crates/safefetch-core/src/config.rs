use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolution and address-policy settings (`[net]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Nameservers queried concurrently for every hostname. Entries are
    /// `"ip"` (port 53 implied) or explicit `"ip:port"`.
    pub dns_nameservers: Vec<String>,
    /// Per-nameserver query timeout in seconds.
    pub dns_resolution_timeout_seconds: f64,
    /// CIDR ranges no resolved address may fall into.
    pub forbidden_networks: Vec<String>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            dns_nameservers: vec!["1.1.1.1".to_string()],
            dns_resolution_timeout_seconds: 5.0,
            forbidden_networks: vec![
                "192.168.0.0/16".to_string(),
                "10.0.0.0/8".to_string(),
                "172.17.0.0/16".to_string(),
                "127.0.0.0/8".to_string(),
            ],
        }
    }
}

/// HTTP retrieval settings (`[http]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent on every request.
    pub ua_string: String,
    /// Streamed-body size cap in bytes.
    pub max_payload_size_bytes: usize,
    /// Redirect-following cap; loops and long chains fail instead of spinning.
    pub max_redirects: usize,
    pub timeout_connect_seconds: f64,
    pub timeout_read_seconds: f64,
    /// Accept responses classified as binary (off by default).
    pub allow_binary_mime_types: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            ua_string: "safefetch-bot/0.1".to_string(),
            max_payload_size_bytes: 1024 * 1024,
            max_redirects: 3,
            timeout_connect_seconds: 5.0,
            timeout_read_seconds: 5.0,
            allow_binary_mime_types: false,
        }
    }
}

/// Service configuration loaded from `~/.config/safefetch/config.toml`.
///
/// Keys present in the file override the defaults key-by-key at every
/// nesting level; a missing key (or a whole missing section) keeps its
/// default. Non-table values, including arrays, replace wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub net: NetConfig,
    pub http: HttpConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("safefetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, creating a default file if none exists.
pub fn load_or_init(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let default_cfg = AppConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&data)?;
    Ok(cfg)
}
