//! The three page types the site serves and the components each one loads.

use core::str::FromStr;

use anyhow::{Result, bail};

use crate::alerts::{AlertDismissal, AlertPresenter};
use crate::behaviors::install_site_behaviors;
use crate::config::PageConfig;
use crate::dashboard::PatientDashboard;
use crate::login::LoginForm;
use crate::state::HtmlPage;
use crate::submission::SubmissionBackend;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PageKind {
    /// Generic site page: behaviors and banners only.
    #[default]
    Site,
    Login,
    Patient,
}

impl FromStr for PageKind {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "site" => Ok(Self::Site),
            "login" => Ok(Self::Login),
            "patient" | "paciente" => Ok(Self::Patient),
            other => bail!("unknown page kind {other:?} (expected site, login or patient)"),
        }
    }
}

impl PageKind {
    /// Attach the components for this page type. Site behaviors go first,
    /// then banner dismissal, then the page's own form logic.
    pub fn install(self, page: &mut HtmlPage, config: &PageConfig, backend: Box<dyn SubmissionBackend>) {
        let alerts = AlertPresenter::new(config.alert_duration());
        install_site_behaviors(page, config);
        page.attach(Box::new(AlertDismissal));
        match self {
            Self::Site => {}
            Self::Login => {
                page.attach(Box::new(LoginForm::new(config, alerts, backend)));
            }
            Self::Patient => {
                page.attach(Box::new(PatientDashboard::new(config, alerts, backend)));
            }
        }
    }
}
