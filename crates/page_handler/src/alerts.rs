//! Transient Bootstrap banners.
//!
//! Banners are appended to `body` as
//! `div.alert.alert-{severity}.alert-dismissible.fade.show.position-fixed`
//! with a close button. Each banner owns its own removal timer; calls never
//! queue or deduplicate.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use anyhow::{Result, anyhow};
use html::{Document, NodeId};
use log::debug;

use crate::component::{Component, Context};
use crate::events::Event;
use crate::timers::TimerTask;
use crate::window::Window;

const BANNER_STYLE: &str = "top: 100px; right: 20px; z-index: 9999; min-width: 300px;";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    #[default]
    Info,
    Warning,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "success" => Ok(Self::Success),
            "danger" => Ok(Self::Danger),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            other => Err(anyhow!("unknown alert severity {other:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
    /// Zero keeps the banner until it is dismissed.
    pub duration: Duration,
}

impl Alert {
    pub fn new(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            message: message.into(),
            severity,
            duration,
        }
    }
}

/// Renders banners into a window. Cheap to clone; components that report
/// outcomes each hold their own copy.
#[derive(Copy, Clone, Debug)]
pub struct AlertPresenter {
    default_duration: Duration,
}

impl Default for AlertPresenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

impl AlertPresenter {
    pub const fn new(default_duration: Duration) -> Self {
        Self { default_duration }
    }

    pub const fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Show a banner with the default lifetime.
    ///
    /// # Errors
    /// See [`AlertPresenter::present`].
    pub fn show_default(
        &self,
        window: &mut Window,
        message: &str,
        severity: Severity,
    ) -> Result<Option<NodeId>> {
        Self::show(window, message, severity, self.default_duration)
    }

    /// Show a banner that removes itself after `duration` (never, if zero).
    ///
    /// # Errors
    /// See [`AlertPresenter::present`].
    pub fn show(
        window: &mut Window,
        message: &str,
        severity: Severity,
        duration: Duration,
    ) -> Result<Option<NodeId>> {
        Self::present(window, &Alert::new(message, severity, duration))
    }

    /// Append the banner for `alert` to `body`. Returns `None` when the
    /// document has no body.
    ///
    /// # Errors
    /// Returns an error if the banner cannot be attached to the document.
    pub fn present(window: &mut Window, alert: &Alert) -> Result<Option<NodeId>> {
        let doc = window.document_mut();
        let Some(body) = doc.body() else {
            debug!("no body to show alert {:?}", alert.message);
            return Ok(None);
        };
        let banner = doc.create_element("div");
        doc.set_class_name(
            banner,
            &format!(
                "alert alert-{} alert-dismissible fade show position-fixed",
                alert.severity
            ),
        );
        doc.set_attribute(banner, "style", BANNER_STYLE);
        let text = doc.create_text(&alert.message);
        doc.append_child(banner, text)?;
        let close = doc.append_element(banner, "button")?;
        doc.set_attribute(close, "type", "button");
        doc.set_class_name(close, "btn-close");
        doc.set_attribute(close, "data-bs-dismiss", "alert");
        doc.append_child(body, banner)?;

        if !alert.duration.is_zero() {
            window.set_timeout(alert.duration, TimerTask::RemoveNode(banner));
        }
        debug!("showing {} alert {:?}", alert.severity, alert.message);
        Ok(Some(banner))
    }

    /// Remove a banner right away and release its nodes. Its pending timer
    /// becomes a no-op.
    pub fn dismiss(window: &mut Window, banner: NodeId) {
        window.document_mut().free(banner);
    }

    /// Banners currently in the document, in order.
    ///
    /// # Errors
    /// Returns an error if the document cannot be queried.
    pub fn visible(doc: &Document) -> Result<Vec<Alert>> {
        let banners = doc.select_all(".alert.alert-dismissible")?;
        Ok(banners
            .into_iter()
            .filter_map(|banner| {
                let severity = doc
                    .classes(banner)
                    .into_iter()
                    .filter_map(|class| class.strip_prefix("alert-"))
                    .find_map(|name| name.parse().ok())?;
                Some(Alert::new(
                    doc.text_content(banner).trim(),
                    severity,
                    Duration::ZERO,
                ))
            })
            .collect())
    }
}

/// Removes a banner when its close button is clicked.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlertDismissal;

impl Component for AlertDismissal {
    fn name(&self) -> &'static str {
        "alert-dismissal"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        let Event::Click { target } = *event else {
            return Ok(());
        };
        let doc = cx.doc();
        let Some(close) = doc.closest(target, "[data-bs-dismiss=alert]")? else {
            return Ok(());
        };
        if let Some(banner) = doc.closest(close, ".alert")? {
            AlertPresenter::dismiss(cx.window_mut(), banner);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::state::HtmlPage;

    fn page() -> Result<HtmlPage> {
        HtmlPage::parse("<main></main>", PageConfig::default())
    }

    #[test]
    fn banner_markup() -> Result<()> {
        let mut page = page()?;
        let banner = AlertPresenter::show(
            page.window_mut(),
            "Saved",
            Severity::Success,
            Duration::from_millis(100),
        )?
        .ok_or_else(|| anyhow!("no banner"))?;
        let doc = page.document();
        assert_eq!(
            doc.classes(banner),
            vec!["alert", "alert-success", "alert-dismissible", "fade", "show", "position-fixed"]
        );
        assert_eq!(doc.select_all("button.btn-close[data-bs-dismiss=alert]")?.len(), 1);
        assert_eq!(
            AlertPresenter::visible(doc)?,
            vec![Alert::new("Saved", Severity::Success, Duration::ZERO)]
        );
        Ok(())
    }

    #[test]
    fn message_is_text_not_markup() -> Result<()> {
        let mut page = page()?;
        AlertPresenter::default().show_default(page.window_mut(), "<b>hola</b>", Severity::Info)?;
        assert!(page.document().select("b")?.is_none());
        Ok(())
    }

    #[test]
    fn zero_duration_never_expires() -> Result<()> {
        let mut page = page()?;
        AlertPresenter::show(page.window_mut(), "fijo", Severity::Warning, Duration::ZERO)?;
        assert!(page.window().timers().is_empty());
        Ok(())
    }

    #[test]
    fn severities_parse() {
        assert_eq!("danger".parse::<Severity>().ok(), Some(Severity::Danger));
        assert!("fatal".parse::<Severity>().is_err());
    }
}
