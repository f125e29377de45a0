use crate::utils::get_env::{get_env_var_or, get_optional_env_var};
use crate::utils::urls::to_url;
use anyhow::{Context, Error, anyhow, bail};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://ec2-3-90-88-253.compute-1.amazonaws.com";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Which variant of the page is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalMode {
    /// User selects a file and runs upload -> analyze -> fetch.
    Upload,
    /// A fixed report is fetched once when the page is first presented.
    AutoLoad,
}

impl FromStr for PortalMode {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(PortalMode::Upload),
            "autoload" | "auto-load" | "auto_load" => Ok(PortalMode::AutoLoad),
            other => Err(anyhow!(
                "unknown portal mode {other:?}, expected \"upload\" or \"autoload\""
            )),
        }
    }
}

impl fmt::Display for PortalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalMode::Upload => f.write_str("upload"),
            PortalMode::AutoLoad => f.write_str("autoload"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the upload and analyze services.
    pub api_url: Url,
    pub mode: PortalMode,
    /// Pre-computed report fetched in auto-load mode.
    pub report_url: Option<Url>,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl PortalConfig {
    pub fn new(api_url: Url, mode: PortalMode, report_url: Option<Url>) -> Result<Self, Error> {
        if mode == PortalMode::AutoLoad && report_url.is_none() {
            bail!("PORTAL_REPORT_URL must be set when PORTAL_MODE is autoload");
        }

        Ok(Self {
            api_url,
            mode,
            report_url,
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        })
    }

    // Initialize config from environment variables
    pub fn from_env() -> Result<Self, Error> {
        let api_url_raw = get_env_var_or("PORTAL_API_URL", DEFAULT_API_URL);
        let api_url =
            to_url(&api_url_raw).with_context(|| format!("invalid PORTAL_API_URL {api_url_raw:?}"))?;

        let mode: PortalMode = get_env_var_or("PORTAL_MODE", "upload").parse()?;

        let report_url = match get_optional_env_var("PORTAL_REPORT_URL") {
            Some(raw) => Some(
                to_url(&raw).with_context(|| format!("invalid PORTAL_REPORT_URL {raw:?}"))?,
            ),
            None => None,
        };

        let port = match get_optional_env_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let body_limit_bytes = match get_optional_env_var("PORTAL_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("invalid PORTAL_BODY_LIMIT_BYTES {raw:?}"))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        let mut config = Self::new(api_url, mode, report_url)?;
        config.port = port;
        config.body_limit_bytes = body_limit_bytes;
        Ok(config)
    }
}
