//! Configuration settings for the page runtime.
//!
//! This module defines the timings and thresholds the page components use:
//! banner lifetime, the artificial submission delays, and reveal-on-scroll
//! tuning. Configuration can be loaded from environment variables or
//! constructed programmatically.

use core::time::Duration;
use std::env;

use crate::window::Viewport;

/// Runtime configuration for a page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    /// Lifetime of a banner shown without an explicit duration
    pub alert_duration_ms: u64,
    /// Busy period of the login form before it submits
    pub login_delay_ms: u64,
    /// Busy period of the profile and reservation forms
    pub submit_delay_ms: u64,
    /// Busy period before a cancelled reservation disappears
    pub cancel_delay_ms: u64,
    /// Fraction of an element that must be visible before it is revealed
    pub reveal_threshold: f64,
    /// Pixels trimmed off the bottom of the viewport for reveal checks
    pub reveal_margin_px: f64,
    /// Initial viewport size
    pub viewport: Viewport,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            alert_duration_ms: 5000,
            login_delay_ms: 1000,
            submit_delay_ms: 1500,
            cancel_delay_ms: 1000,
            reveal_threshold: 0.1,
            reveal_margin_px: 50.0,
            viewport: Viewport::new(1280.0, 800.0),
        }
    }
}

fn env_millis(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|val| val.is_finite() && *val >= 0.0)
        .unwrap_or(default)
}

/// Parse a `WIDTHxHEIGHT` viewport such as `1280x800`.
pub fn parse_viewport(raw: &str) -> Option<Viewport> {
    let (width, height) = raw.trim().split_once(['x', 'X'])?;
    let width = width.trim().parse::<f64>().ok()?;
    let height = height.trim().parse::<f64>().ok()?;
    (width > 0.0 && height > 0.0).then(|| Viewport::new(width, height))
}

impl PageConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables, falling back to the
    /// defaults for anything missing or unparsable:
    /// - `MEDICONECTA_ALERT_DURATION_MS` (default: 5000)
    /// - `MEDICONECTA_LOGIN_DELAY_MS` (default: 1000)
    /// - `MEDICONECTA_SUBMIT_DELAY_MS` (default: 1500)
    /// - `MEDICONECTA_CANCEL_DELAY_MS` (default: 1000)
    /// - `MEDICONECTA_REVEAL_THRESHOLD` (default: 0.1)
    /// - `MEDICONECTA_REVEAL_MARGIN_PX` (default: 50)
    /// - `MEDICONECTA_VIEWPORT` as `WIDTHxHEIGHT` (default: 1280x800)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            alert_duration_ms: env_millis("MEDICONECTA_ALERT_DURATION_MS", defaults.alert_duration_ms),
            login_delay_ms: env_millis("MEDICONECTA_LOGIN_DELAY_MS", defaults.login_delay_ms),
            submit_delay_ms: env_millis("MEDICONECTA_SUBMIT_DELAY_MS", defaults.submit_delay_ms),
            cancel_delay_ms: env_millis("MEDICONECTA_CANCEL_DELAY_MS", defaults.cancel_delay_ms),
            reveal_threshold: env_f64("MEDICONECTA_REVEAL_THRESHOLD", defaults.reveal_threshold)
                .min(1.0),
            reveal_margin_px: env_f64("MEDICONECTA_REVEAL_MARGIN_PX", defaults.reveal_margin_px),
            viewport: env::var("MEDICONECTA_VIEWPORT")
                .ok()
                .and_then(|val| parse_viewport(&val))
                .unwrap_or(defaults.viewport),
        }
    }

    #[must_use]
    pub const fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_duration_ms)
    }

    #[must_use]
    pub const fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    #[must_use]
    pub const fn cancel_delay(&self) -> Duration {
        Duration::from_millis(self.cancel_delay_ms)
    }
}
