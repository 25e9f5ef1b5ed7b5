//! Gateway Configuration
//!
//! JSON file first (written with defaults when missing), then `ECAMPUS_*`
//! environment variables on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::gateway::SUCCESS_CODE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Root of the eCampus REST API.
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    /// Role the class list is filtered for.
    pub role_id: String,
    /// Student whose merit record seeds the workflow.
    pub student_id: String,
    pub success_code: i64,
    pub payment_success_prefix: String,
    pub payment_failure_prefix: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_token: None,
            timeout_secs: 30,
            role_id: "3".to_string(),
            student_id: String::new(),
            success_code: SUCCESS_CODE,
            payment_success_prefix: "http://localhost:5000/Payment/Success".to_string(),
            payment_failure_prefix: "http://localhost:5000/Payment/Failure".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Override fields from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ECAMPUS_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("ECAMPUS_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = get("ECAMPUS_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("ECAMPUS_TIMEOUT_SECS is not a number: {}", v))?;
        }
        if let Some(v) = get("ECAMPUS_ROLE_ID") {
            self.role_id = v;
        }
        if let Some(v) = get("ECAMPUS_STUDENT_ID") {
            self.student_id = v;
        }
        if let Some(v) = get("ECAMPUS_PAYMENT_SUCCESS_PREFIX") {
            self.payment_success_prefix = v;
        }
        if let Some(v) = get("ECAMPUS_PAYMENT_FAILURE_PREFIX") {
            self.payment_failure_prefix = v;
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<GatewayConfig> {
        if !self.path.exists() {
            let default = GatewayConfig::default();
            self.save(&default).await?;
            return Ok(default);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub async fn save(&self, config: &GatewayConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .await
            .context("Failed to write config file")?;
        Ok(())
    }
}
