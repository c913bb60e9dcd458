//! Runner configuration
//!
//! Defines the tracker connection settings and the layout catalog
//! extensions. Everything is read once at startup.

use anyhow::Context;
use stagehand_core::domain::layout::{LayoutDescriptor, default_layouts};
use std::time::Duration;

/// Donation tracker settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Whether the tracker is polled at all
    pub enable: bool,

    /// Tracker base URL (e.g., "https://tracker.example.org/tracker")
    pub url: String,

    /// Tracker identifier of the event
    pub event_id: String,

    /// How often totals and bids are refreshed
    pub refresh_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enable: false,
            url: String::new(),
            event_id: String::new(),
            refresh_interval: Duration::from_secs(60),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tracker: TrackerConfig,

    /// Layouts appended after the stock catalog
    pub extra_layouts: Vec<LayoutDescriptor>,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TRACKER_ENABLE (optional, default: false)
    /// - TRACKER_URL (required when the tracker is enabled)
    /// - TRACKER_EVENT_ID (required when the tracker is enabled)
    /// - TRACKER_REFRESH_INTERVAL (optional, seconds, default: 60)
    /// - EXTRA_LAYOUTS (optional, JSON array of `{"name", "code"}`)
    pub fn from_env() -> anyhow::Result<Self> {
        let enable = std::env::var("TRACKER_ENABLE")
            .ok()
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        let url = std::env::var("TRACKER_URL").unwrap_or_default();
        let event_id = std::env::var("TRACKER_EVENT_ID").unwrap_or_default();

        let refresh_interval = std::env::var("TRACKER_REFRESH_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        let extra_layouts = match std::env::var("EXTRA_LAYOUTS") {
            Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .context("EXTRA_LAYOUTS must be a JSON array of {\"name\", \"code\"} objects")?,
            _ => Vec::new(),
        };

        Ok(Self {
            tracker: TrackerConfig {
                enable,
                url,
                event_id,
                refresh_interval,
            },
            extra_layouts,
        })
    }

    /// Adds a layout after the stock catalog
    #[allow(dead_code)]
    pub fn with_extra_layout(mut self, layout: LayoutDescriptor) -> Self {
        self.extra_layouts.push(layout);
        self
    }

    /// The full layout catalog: stock layouts, then the extras in order
    pub fn layouts(&self) -> Vec<LayoutDescriptor> {
        let mut layouts = default_layouts();
        layouts.extend(self.extra_layouts.iter().cloned());
        layouts
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let layouts = self.layouts();
        for (i, layout) in layouts.iter().enumerate() {
            if layout.code.trim().is_empty() {
                anyhow::bail!("layout {:?} has an empty code", layout.name);
            }
            if let Some(earlier) = layouts[..i].iter().find(|l| l.matches(&layout.code)) {
                anyhow::bail!(
                    "layout code {:?} is already used by {:?}",
                    layout.code,
                    earlier.name
                );
            }
        }

        if !self.tracker.enable {
            return Ok(());
        }

        if self.tracker.url.is_empty() {
            anyhow::bail!("tracker url cannot be empty when the tracker is enabled");
        }

        if !self.tracker.url.starts_with("http://") && !self.tracker.url.starts_with("https://") {
            anyhow::bail!("tracker url must start with http:// or https://");
        }

        if self.tracker.event_id.trim().is_empty() {
            anyhow::bail!("tracker event id cannot be empty when the tracker is enabled");
        }

        if self.tracker.refresh_interval.is_zero() {
            anyhow::bail!("tracker refresh interval must be greater than 0");
        }

        Ok(())
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> Config {
        Config {
            tracker: TrackerConfig {
                enable: true,
                url: "https://tracker.example.org/tracker".to_string(),
                event_id: "42".to_string(),
                ..TrackerConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.tracker.enable);
        assert_eq!(config.tracker.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.layouts().len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tracker_validation() {
        let mut config = enabled();
        assert!(config.validate().is_ok());

        config.tracker.url = "tracker.example.org".to_string();
        assert!(config.validate().is_err());

        config.tracker.url = "http://localhost:8000/tracker".to_string();
        config.tracker.event_id = String::new();
        assert!(config.validate().is_err());

        config.tracker.event_id = "42".to_string();
        config.tracker.refresh_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_tracker_needs_no_url() {
        let mut config = enabled();
        config.tracker.enable = false;
        config.tracker.url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extra_layouts_are_appended() {
        let config = Config::default()
            .with_extra_layout(LayoutDescriptor::new("21:9 1 Player", "21_9"))
            .with_extra_layout(LayoutDescriptor::new("GBA 2 Player", "gba_2p"));
        let layouts = config.layouts();
        assert_eq!(layouts.len(), 12);
        assert_eq!(layouts[10].code, "21_9");
        assert_eq!(layouts[11].code, "gba_2p");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_layout_code_rejected() {
        let config =
            Config::default().with_extra_layout(LayoutDescriptor::new("Another 4:3", "4_3"));
        assert!(config.validate().is_err());

        let config =
            Config::default().with_extra_layout(LayoutDescriptor::new("Shouting", "16_9_3P"));
        assert!(config.validate().is_err());

        let config = Config::default().with_extra_layout(LayoutDescriptor::new("Blank", " "));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
