// src/identity.rs

//! Instance identity (instance id and region) needed to launch.

use std::fmt::Debug;

use anyhow::{anyhow, Result};

use crate::config::IdentitySection;

pub trait IdentityProvider: Send + Sync + Debug {
    fn instance_id(&self) -> Result<String>;
    fn region(&self) -> Result<String>;

    /// Instance id with any path-like prefix removed.
    fn short_instance_id(&self) -> Result<String> {
        let id = self.instance_id()?;
        Ok(id.rsplit('/').next().unwrap_or(&id).to_string())
    }
}

/// Identity from fixed values, typically the `[identity]` config section.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    instance_id: Option<String>,
    region: Option<String>,
}

impl StaticIdentity {
    pub fn new(instance_id: Option<String>, region: Option<String>) -> Self {
        Self {
            instance_id,
            region,
        }
    }

    /// Config values first, then `AWS_INSTANCE_ID` / `AWS_REGION`.
    pub fn from_config_or_env(section: &IdentitySection) -> Self {
        Self {
            instance_id: section
                .instance_id
                .clone()
                .or_else(|| std::env::var("AWS_INSTANCE_ID").ok()),
            region: section
                .region
                .clone()
                .or_else(|| std::env::var("AWS_REGION").ok()),
        }
    }
}

fn required(value: &Option<String>, what: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(anyhow!("{what} is not configured")),
    }
}

impl IdentityProvider for StaticIdentity {
    fn instance_id(&self) -> Result<String> {
        required(&self.instance_id, "instance id")
    }

    fn region(&self) -> Result<String> {
        required(&self.region, "region")
    }
}
