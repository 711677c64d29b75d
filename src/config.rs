/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* File: src/config.rs
*
* This file defines the immutable process-wide configuration, assembled from
* environment variables before any cluster interaction happens. Missing
* required variables and unparseable values are fatal here, so the rest of
* the program can treat the configuration as already validated.
*
* SPDX-License-Identifier: Apache-2.0 */

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_NAMESPACE: &str = "nanovest";
const DEFAULT_SLEEP_SECS: u64 = 900;
const DEFAULT_CATALOG_FILE: &str = "config.yaml";

/// Process-wide parameters for a single run. Immutable after load.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Which entry of the event catalog to apply.
    pub event_name: String,
    /// Slack incoming-webhook URL for run notifications.
    pub webhook_url: String,
    /// Namespace the target autoscalers live in.
    pub namespace: String,
    /// How long the elevated minimums stay in effect.
    pub hold: Duration,
    /// Path of the event catalog file.
    pub catalog_path: PathBuf,
    /// Whether notifications are actually delivered or only logged.
    pub notifications_enabled: bool,
}

impl RunConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    // The lookup closure stands in for `std::env::var` so the parsing rules
    // can be exercised without mutating the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let event_name = lookup("EVENT_NAME")
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingEnv("EVENT_NAME"))?;

        let webhook_url = lookup("SLACK_WEBHOOK_URL")
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingEnv("SLACK_WEBHOOK_URL"))?;

        let namespace =
            lookup("NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let hold = match lookup("SLEEP_TIME") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| Error::InvalidEnv {
                    var: "SLEEP_TIME",
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_SLEEP_SECS),
        };

        let catalog_path = lookup("EVENT_CONFIG_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));

        let notifications_enabled = match lookup("NOTIFICATIONS_ENABLED") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| Error::InvalidEnv {
                var: "NOTIFICATIONS_ENABLED",
                value: raw.clone(),
            })?,
            None => true,
        };

        Ok(Self {
            event_name,
            webhook_url,
            namespace,
            hold,
            catalog_path,
            notifications_enabled,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
