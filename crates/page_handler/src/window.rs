//! The host window: document, viewport, scroll position, clock, timers, and the
//! side effects a page produces that a browser would hand to the user agent
//! (native form submissions, scroll requests, confirm prompts).

use core::mem;
use core::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use html::{Document, NodeId};
use log::debug;
use url::Url;

use crate::config::PageConfig;
use crate::timers::{TimerId, TimerQueue, TimerTask};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

/// A recorded `scrollIntoView` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// A form handed to the user agent for a real HTTP submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeSubmission {
    pub form: NodeId,
    pub action: Option<String>,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

/// Answers `confirm()` prompts.
pub trait ConfirmDialog {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Answers every prompt with a fixed value.
#[derive(Copy, Clone, Debug)]
pub struct AutoConfirm(pub bool);

impl ConfirmDialog for AutoConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        debug!("confirm({message:?}) -> {}", self.0);
        self.0
    }
}

pub struct Window {
    document: Document,
    config: PageConfig,
    location: Url,
    viewport: Viewport,
    scroll_y: f64,
    /// Set when a script moved the scroll offset; the page turns it into a
    /// `Scroll` event once the current handler returns.
    scroll_dirty: bool,
    cookie: String,
    today: NaiveDate,
    now: Duration,
    timers: TimerQueue,
    confirm: Box<dyn ConfirmDialog>,
    prompts: Vec<String>,
    submissions: Vec<NativeSubmission>,
    scrolls: Vec<ScrollRequest>,
}

impl Window {
    /// Create a window over `document` at `about:blank`.
    ///
    /// # Errors
    /// Returns an error if the blank location cannot be parsed.
    pub fn new(document: Document, config: PageConfig) -> Result<Self> {
        Ok(Self {
            document,
            viewport: config.viewport,
            config,
            location: Url::parse("about:blank")?,
            scroll_y: 0.0,
            scroll_dirty: false,
            cookie: String::new(),
            today: Local::now().date_naive(),
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            confirm: Box::new(AutoConfirm(true)),
            prompts: Vec::new(),
            submissions: Vec::new(),
            scrolls: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn set_location(&mut self, location: Url) {
        self.location = location;
    }

    /// Apply an in-page `#fragment` navigation to the location.
    pub fn navigate_to_fragment(&mut self, href: &str) {
        let fragment = href.strip_prefix('#').unwrap_or(href);
        self.location
            .set_fragment((!fragment.is_empty()).then_some(fragment));
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Move the scroll offset without raising a `Scroll` event.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub(crate) fn take_scroll_change(&mut self) -> bool {
        mem::take(&mut self.scroll_dirty)
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        cookie.clone_into(&mut self.cookie);
    }

    /// The calendar date date-based rules compare against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// Virtual time elapsed since the page was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub(crate) fn timers_mut(&mut self) -> &mut TimerQueue {
        &mut self.timers
    }

    /// Schedule `task` to run `delay` from now.
    pub fn set_timeout(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let due = self.now.saturating_add(delay);
        self.timers.schedule(due, task)
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn set_confirm(&mut self, confirm: Box<dyn ConfirmDialog>) {
        self.confirm = confirm;
    }

    /// Ask the user to confirm `message`.
    pub fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_owned());
        self.confirm.confirm(message)
    }

    /// Every message passed to [`Window::confirm`], in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Drain the recorded confirm prompts.
    pub fn take_prompts(&mut self) -> Vec<String> {
        mem::take(&mut self.prompts)
    }

    /// Scroll `target` into view and move the scroll offset to its measured top.
    pub fn scroll_into_view(&mut self, target: NodeId, behavior: ScrollBehavior, block: ScrollBlock) {
        self.scrolls.push(ScrollRequest {
            target,
            behavior,
            block,
        });
        if let Some(layout) = self.document.layout_box(target) {
            let height = self.viewport.height;
            let y = match block {
                ScrollBlock::Start | ScrollBlock::Nearest => layout.top,
                ScrollBlock::Center => layout.top + layout.height / 2.0 - height / 2.0,
                ScrollBlock::End => layout.top + layout.height - height,
            };
            self.set_scroll_y(y);
            self.scroll_dirty = true;
        }
    }

    pub fn scrolls(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    /// Drain the recorded scroll requests.
    pub fn take_scrolls(&mut self) -> Vec<ScrollRequest> {
        mem::take(&mut self.scrolls)
    }

    /// Hand `form` to the user agent for a native submission. Mirrors
    /// `HTMLFormElement.submit()`: no `submit` event and no validation.
    pub fn submit_form(&mut self, form: NodeId) {
        let doc = &self.document;
        let submission = NativeSubmission {
            form,
            action: doc.attribute(form, "action").map(str::to_owned),
            method: doc
                .attribute(form, "method")
                .map_or_else(|| String::from("get"), str::to_ascii_lowercase),
            fields: doc.form_data(form),
        };
        debug!(
            "native submission of {form} ({} {:?}) with {} fields",
            submission.method,
            submission.action,
            submission.fields.len()
        );
        self.submissions.push(submission);
    }

    pub fn submissions(&self) -> &[NativeSubmission] {
        &self.submissions
    }

    /// Drain the recorded native submissions, handing them to the host.
    pub fn take_submissions(&mut self) -> Vec<NativeSubmission> {
        mem::take(&mut self.submissions)
    }
}
