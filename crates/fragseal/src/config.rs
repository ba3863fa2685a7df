//! Gateway configuration.
//!
//! Read from environment variables:
//!
//! - `FRAGSEAL_PSK`: pre-shared API key (required)
//! - `FRAGSEAL_PRIVATE_KEY`: private keyset JSON (required, read by the key loader)
//! - `FRAGSEAL_PUBLIC_KEY_DIR`: directory of `<domain>.json` public keysets (default: `keys`)
//! - `FRAGSEAL_RECIPIENTS`: comma-separated recipient domains (required)
//! - `FRAGSEAL_ACCESS_REQUIREMENTS`: comma-separated requirement tokens (default: none)
//! - `FRAGSEAL_PARALLEL_WRAP`: wrap recipients in parallel (default: true)

use std::fmt;
use std::path::PathBuf;

use fragseal_core::AccessRequirements;

use crate::error::{GatewayError, Result};

pub const ENV_PSK: &str = "FRAGSEAL_PSK";
pub const ENV_PRIVATE_KEY: &str = "FRAGSEAL_PRIVATE_KEY";
pub const ENV_PUBLIC_KEY_DIR: &str = "FRAGSEAL_PUBLIC_KEY_DIR";
pub const ENV_RECIPIENTS: &str = "FRAGSEAL_RECIPIENTS";
pub const ENV_ACCESS_REQUIREMENTS: &str = "FRAGSEAL_ACCESS_REQUIREMENTS";
pub const ENV_PARALLEL_WRAP: &str = "FRAGSEAL_PARALLEL_WRAP";

/// Configuration for the gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Pre-shared key expected in `Authorization: Bearer <psk>`.
    pub psk: String,
    /// Recipient domains to load public keys for.
    pub recipients: Vec<String>,
    /// Directory holding recipient public keysets.
    pub public_key_dir: PathBuf,
    /// Requirements bound into every wrapped key.
    pub access_requirements: AccessRequirements,
    /// Wrap each recipient on the blocking pool concurrently.
    pub parallel_wrap: bool,
}

impl GatewayConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(psk: impl Into<String>) -> Self {
        Self {
            psk: psk.into(),
            recipients: Vec::new(),
            public_key_dir: PathBuf::from("keys"),
            access_requirements: AccessRequirements::default(),
            parallel_wrap: true,
        }
    }

    /// Create from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let psk = non_empty(ENV_PSK).ok_or_else(|| {
            GatewayError::Config(format!(
                "cannot start without a pre-shared API key ({ENV_PSK})"
            ))
        })?;

        let recipients = non_empty(ENV_RECIPIENTS)
            .map(|v| split_list(&v))
            .unwrap_or_default();
        if recipients.is_empty() {
            return Err(GatewayError::Config(format!(
                "no recipient domains configured ({ENV_RECIPIENTS})"
            )));
        }

        let mut config = Self::new(psk);
        config.recipients = recipients;

        if let Some(dir) = non_empty(ENV_PUBLIC_KEY_DIR) {
            config.public_key_dir = PathBuf::from(dir);
        }
        if let Some(reqs) = non_empty(ENV_ACCESS_REQUIREMENTS) {
            config.access_requirements = AccessRequirements::new(split_list(&reqs));
        }
        if let Some(flag) = non_empty(ENV_PARALLEL_WRAP) {
            config.parallel_wrap = parse_flag(&flag).ok_or_else(|| {
                GatewayError::Config(format!("{ENV_PARALLEL_WRAP} must be true or false"))
            })?;
        }

        Ok(config)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("psk", &"<redacted>")
            .field("recipients", &self.recipients)
            .field("public_key_dir", &self.public_key_dir)
            .field("access_requirements", &self.access_requirements)
            .field("parallel_wrap", &self.parallel_wrap)
            .finish()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
