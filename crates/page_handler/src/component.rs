//! The seam between the page host and the behaviors attached to it.

use core::fmt;
use core::time::Duration;

use anyhow::Result;
use html::Document;

use crate::events::Event;
use crate::timers::{TimerId, TimerTask};
use crate::window::Window;

/// Index of a component in its page's attach order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

impl ComponentId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "component#{}", self.0)
    }
}

/// Handed to a component for the duration of one handler call.
pub struct Context<'page> {
    window: &'page mut Window,
    owner: ComponentId,
    default_prevented: bool,
}

impl<'page> Context<'page> {
    pub fn new(window: &'page mut Window, owner: ComponentId) -> Self {
        Self {
            window,
            owner,
            default_prevented: false,
        }
    }

    pub fn window(&self) -> &Window {
        self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        self.window
    }

    pub fn doc(&self) -> &Document {
        self.window.document()
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        self.window.document_mut()
    }

    pub fn owner(&self) -> ComponentId {
        self.owner
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Schedule a callback into this component's [`Component::on_timer`].
    pub fn set_timeout(&mut self, delay: Duration, token: u64) -> TimerId {
        let owner = self.owner;
        self.window
            .set_timeout(delay, TimerTask::Component { owner, token })
    }
}

/// A behavior attached to a page. Handlers run synchronously, in attach
/// order, for every dispatched event.
pub trait Component {
    fn name(&self) -> &'static str;

    /// # Errors
    /// Internal failures (bad selectors, DOM misuse). The page logs them and
    /// keeps dispatching to the remaining components.
    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()>;

    /// Called when a timer set through [`Context::set_timeout`] fires.
    ///
    /// # Errors
    /// Same contract as [`Component::handle_event`].
    fn on_timer(&mut self, _cx: &mut Context<'_>, _token: u64) -> Result<()> {
        Ok(())
    }
}
