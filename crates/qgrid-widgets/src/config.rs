#![forbid(unsafe_code)]

//! Screen-level grid settings.
//!
//! Settings come from a JSON document (every field optional) and may then be
//! overridden from `QGRID_*` environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `QGRID_ITEMS_PER_PAGE` | `items_per_page` |
//! | `QGRID_OVERLAY_MARGIN` | `overlay_margin` |
//! | `QGRID_OVERLAY_GAP` | `overlay_gap` |
//! | `QGRID_EXCLUSIVE_OVERLAYS` | `exclusive_overlays` (`1/0/true/false`) |
//! | `QGRID_PAGE_WINDOW` | `page_window` |

use std::str::FromStr;

use qgrid_core::geometry::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::overlay::{self, Alignment, OverlayConfig};
use crate::overlay_group::OverlayPolicy;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

pub const ENV_ITEMS_PER_PAGE: &str = "QGRID_ITEMS_PER_PAGE";
pub const ENV_OVERLAY_MARGIN: &str = "QGRID_OVERLAY_MARGIN";
pub const ENV_OVERLAY_GAP: &str = "QGRID_OVERLAY_GAP";
pub const ENV_EXCLUSIVE_OVERLAYS: &str = "QGRID_EXCLUSIVE_OVERLAYS";
pub const ENV_PAGE_WINDOW: &str = "QGRID_PAGE_WINDOW";

/// Errors from loading a [`GridConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid grid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Settings shared by every table and overlay on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Rows per page; must be at least 1.
    pub items_per_page: usize,
    /// Overlay distance from the viewport edges.
    pub overlay_margin: i32,
    /// Overlay distance from its trigger.
    pub overlay_gap: i32,
    /// Allow only one open overlay per screen.
    pub exclusive_overlays: bool,
    /// Numbered buttons in the pagination strip.
    pub page_window: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            overlay_margin: overlay::DEFAULT_MARGIN,
            overlay_gap: overlay::DEFAULT_GAP,
            exclusive_overlays: false,
            page_window: 5,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Apply `QGRID_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `QGRID_*` overrides from a custom lookup (for tests).
    pub fn with_env_overrides_from<F>(mut self, get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get_env(ENV_ITEMS_PER_PAGE) {
            self.items_per_page = parse_var(ENV_ITEMS_PER_PAGE, &v)?;
        }
        if let Some(v) = get_env(ENV_OVERLAY_MARGIN) {
            self.overlay_margin = parse_var(ENV_OVERLAY_MARGIN, &v)?;
        }
        if let Some(v) = get_env(ENV_OVERLAY_GAP) {
            self.overlay_gap = parse_var(ENV_OVERLAY_GAP, &v)?;
        }
        if let Some(v) = get_env(ENV_EXCLUSIVE_OVERLAYS) {
            self.exclusive_overlays = parse_bool(ENV_EXCLUSIVE_OVERLAYS, &v)?;
        }
        if let Some(v) = get_env(ENV_PAGE_WINDOW) {
            self.page_window = parse_var(ENV_PAGE_WINDOW, &v)?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.items_per_page == 0 {
            return Err(invalid("items_per_page", &self.items_per_page));
        }
        if self.overlay_margin < 0 {
            return Err(invalid("overlay_margin", &self.overlay_margin));
        }
        if self.overlay_gap < 0 {
            return Err(invalid("overlay_gap", &self.overlay_gap));
        }
        Ok(self)
    }

    pub fn overlay_policy(&self) -> OverlayPolicy {
        if self.exclusive_overlays {
            OverlayPolicy::Exclusive
        } else {
            OverlayPolicy::Independent
        }
    }

    /// Overlay settings for one call site, using this screen's spacing.
    pub fn overlay_config(&self, alignment: Alignment, estimated_size: Size) -> OverlayConfig {
        OverlayConfig::new(estimated_size)
            .alignment(alignment)
            .margin(self.overlay_margin)
            .gap(self.overlay_gap)
    }
}

fn invalid(key: &str, value: &dyn ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_owned(),
        value: value.to_string(),
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}
