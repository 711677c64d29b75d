/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* File: src/catalog.rs
*
* This file implements the event catalog: a YAML mapping from an event name
* to the ordered list of services that should be pre-scaled for it. The
* catalog is loaded once at startup and read-only afterwards.
*
* SPDX-License-Identifier: Apache-2.0 */

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// One service to pre-scale for an event.
///
/// `minCount` stays optional through parsing; an absent or out-of-range
/// value is rejected by the orchestrator before that service is touched.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTarget {
    pub name: String,
    #[serde(rename = "minCount", default)]
    pub min_count: Option<i32>,
}

/// Mapping from event name to the services it scales, in catalog order.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog(HashMap<String, Vec<ServiceTarget>>);

impl EventCatalog {
    /// Loads the catalog from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Returns the targets for `event_name`, in the order the catalog lists
    /// them. An unknown event and an event with no services are both errors.
    pub fn resolve(&self, event_name: &str) -> Result<&[ServiceTarget]> {
        match self.0.get(event_name) {
            Some(targets) if !targets.is_empty() => Ok(targets),
            _ => Err(Error::UnknownEvent(event_name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_resolve_preserves_order() {
        let file = write_catalog(
            "flash_sale:\n  - name: checkout\n    minCount: 10\n  - name: catalog\n    minCount: 5\n",
        );

        let catalog = EventCatalog::load(file.path()).unwrap();
        let targets = catalog.resolve("flash_sale").unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "checkout");
        assert_eq!(targets[0].min_count, Some(10));
        assert_eq!(targets[1].name, "catalog");
        assert_eq!(targets[1].min_count, Some(5));
    }

    #[test]
    fn test_missing_min_count_parses_as_none() {
        let file = write_catalog("flash_sale:\n  - name: checkout\n");

        let catalog = EventCatalog::load(file.path()).unwrap();
        let targets = catalog.resolve("flash_sale").unwrap();
        assert_eq!(targets[0].min_count, None);
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let path = PathBuf::from("/nonexistent/scalepilot/config.yaml");
        let err = EventCatalog::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(p) if p == path));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let file = write_catalog("flash_sale: [unterminated\n");
        let err = EventCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let file = write_catalog("flash_sale: 3\n");
        let err = EventCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_and_empty_events_are_rejected() {
        let file = write_catalog(
            "flash_sale:\n  - name: checkout\n    minCount: 10\nstale_event: []\n",
        );

        let catalog = EventCatalog::load(file.path()).unwrap();
        assert!(matches!(
            catalog.resolve("year_end_sale").unwrap_err(),
            Error::UnknownEvent(name) if name == "year_end_sale"
        ));
        assert!(matches!(
            catalog.resolve("stale_event").unwrap_err(),
            Error::UnknownEvent(_)
        ));
    }
}
