use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{builder::DefaultState, ConfigBuilder, Environment, File, FileFormat};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

/// The default configuration, embedded into the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variable containing a list of additional config files.
pub const CONFIG_PATH_ENV: &str = "PORTFOLIO_CONFIG";

/// Load the configuration from the default config, the files listed in
/// `PORTFOLIO_CONFIG` and `PORTFOLIO__*` environment variables.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var_os(CONFIG_PATH_ENV)
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();
    load_with_overrides(&paths, &[])
}

/// Like [`load`], but with explicit config files and additional inline toml
/// snippets which take precedence over all other sources.
pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = add_files(config::Config::builder().add_source(default_source()), paths)?
        .add_source(environment());

    overrides
        .iter()
        .fold(builder, |builder, &content| {
            builder.add_source(File::from_str(content, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn default_source() -> File<config::FileSourceString, FileFormat> {
    File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
}

fn add_files(
    builder: ConfigBuilder<DefaultState>,
    paths: &[impl AsRef<Path>],
) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
    })
}

/// `PORTFOLIO__HTTP__PORT=8080` overrides `http.port`. Lists are comma
/// separated.
fn environment() -> Environment {
    Environment::with_prefix("PORTFOLIO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("http.real_ip.trusted_proxies")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origin: String,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    pub static_dir: Option<PathBuf>,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    #[serde(default = "default_real_ip_header")]
    pub header: String,
    pub trusted_proxies: Vec<IpAddr>,
}

fn default_real_ip_header() -> String {
    "X-Forwarded-For".into()
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<Sensitive<String>>,
    pub from: EmailAddressWithName,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub email: Option<EmailAddressWithName>,
    pub subject_prefix: String,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: usize,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}
