#![allow(dead_code, reason = "Each test binary uses a different subset of helpers")]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use chrono::NaiveDate;
use html::NodeId;
use page_handler::{HtmlPage, PageConfig, PageKind, SimulatedBackend, SubmissionBackend};

pub fn init_logging() {
    let _ignored = env_logger::builder().is_test(true).try_init();
}

/// Directory containing the HTML fixtures for integration tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture(name: &str) -> Result<String> {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

/// The date every test page treats as today.
pub fn today() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 10, 19).ok_or_else(|| anyhow!("bad test date"))
}

/// Parse a fixture, install the components for `kind` and fire
/// `DOMContentLoaded`.
pub fn load_page_with(name: &str, kind: PageKind, backend: Box<dyn SubmissionBackend>) -> Result<HtmlPage> {
    init_logging();
    let config = PageConfig::default();
    let mut page = HtmlPage::parse(&fixture(name)?, config.clone())?;
    page.window_mut().set_today(today()?);
    kind.install(&mut page, &config, backend);
    page.load();
    Ok(page)
}

pub fn load_page(name: &str, kind: PageKind) -> Result<(HtmlPage, SimulatedBackend)> {
    let backend = SimulatedBackend::new();
    let page = load_page_with(name, kind, Box::new(backend.clone()))?;
    Ok((page, backend))
}

pub fn by_id(page: &HtmlPage, id: &str) -> Result<NodeId> {
    page.document()
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("no element with id {id:?}"))
}

/// Error messages currently rendered in `.invalid-feedback` nodes.
pub fn error_messages(page: &HtmlPage) -> Result<Vec<String>> {
    let doc = page.document();
    Ok(doc
        .select_all(".invalid-feedback")?
        .into_iter()
        .map(|node| doc.text_content(node).trim().to_owned())
        .collect())
}
