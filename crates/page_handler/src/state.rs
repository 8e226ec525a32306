use core::time::Duration;

use anyhow::Result;
use html::{Document, NodeId, parse_document};
use log::{debug, error, info, trace, warn};

use crate::component::{Component, ComponentId, Context};
use crate::config::PageConfig;
use crate::events::{DispatchOutcome, Event};
use crate::timers::{Timer, TimerTask};
use crate::window::{Viewport, Window};

/// Upper bound on timers fired by one `run_until_idle` call.
const MAX_IDLE_TIMERS: usize = 10_000;

/// A loaded page: the window it lives in plus the components attached to it.
pub struct HtmlPage {
    window: Window,
    components: Vec<Box<dyn Component>>,
    loaded: bool,
}

impl HtmlPage {
    /// # Errors
    /// Returns an error if the window cannot be created.
    pub fn new(document: Document, config: PageConfig) -> Result<Self> {
        Ok(Self {
            window: Window::new(document, config)?,
            components: Vec::new(),
            loaded: false,
        })
    }

    /// Parse `html` and wrap it in a page.
    ///
    /// # Errors
    /// Returns an error if the markup cannot be converted into a document.
    pub fn parse(html: &str, config: PageConfig) -> Result<Self> {
        Self::new(parse_document(html)?, config)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn document(&self) -> &Document {
        self.window.document()
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.window.document_mut()
    }

    /// Attach a component. Components see events in attach order.
    pub fn attach(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId::new(self.components.len());
        debug!("attaching {} as {id}", component.name());
        self.components.push(component);
        id
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fire `DOMContentLoaded`. Only the first call has an effect.
    pub fn load(&mut self) -> DispatchOutcome {
        if self.loaded {
            return DispatchOutcome::default();
        }
        self.loaded = true;
        info!(
            "page loaded with {} components at {}",
            self.components.len(),
            self.window.location()
        );
        self.dispatch(Event::DomContentLoaded)
    }

    /// Deliver `event` to every component, then run the default action
    /// unless a handler prevented it.
    pub fn dispatch(&mut self, event: Event) -> DispatchOutcome {
        trace!("dispatch {} to {:?}", event.name(), event.target());
        let mut outcome = DispatchOutcome::default();
        for (index, component) in self.components.iter_mut().enumerate() {
            let mut cx = Context::new(&mut self.window, ComponentId::new(index));
            if let Err(err) = component.handle_event(&mut cx, &event) {
                error!("{} failed handling {}: {err:#}", component.name(), event.name());
                outcome.failed_handlers += 1;
            }
            outcome.default_prevented |= cx.default_prevented();
        }
        if !outcome.default_prevented {
            self.run_default_action(event);
        }
        self.flush_scroll();
        outcome
    }

    fn run_default_action(&mut self, event: Event) {
        match event {
            Event::Submit { form } => self.window.submit_form(form),
            Event::Click { target } => self.activate(target),
            _ => {}
        }
    }

    /// Default action of a click: follow in-page links and let submit
    /// buttons submit their form.
    fn activate(&mut self, target: NodeId) {
        let doc = self.window.document();
        let link = doc
            .closest(target, "a[href]")
            .ok()
            .flatten()
            .and_then(|anchor| doc.attribute(anchor, "href"))
            .filter(|href| href.starts_with('#'))
            .map(str::to_owned);
        if let Some(href) = link {
            self.window.navigate_to_fragment(&href);
            return;
        }
        let Some(button) = doc.closest(target, "button, input").ok().flatten() else {
            return;
        };
        let is_submit = match doc.tag(button) {
            Some("button") => doc.attribute(button, "type").is_none_or(|kind| kind.eq_ignore_ascii_case("submit")),
            _ => doc.input_type(button) == "submit",
        };
        if !is_submit || doc.disabled(button) {
            return;
        }
        if let Some(form) = doc.closest(button, "form").ok().flatten() {
            self.dispatch(Event::Submit { form });
        }
    }

    fn flush_scroll(&mut self) {
        if self.window.take_scroll_change() {
            let y = self.window.scroll_y();
            self.dispatch(Event::Scroll { y });
        }
    }

    /// Move the virtual clock forward by `duration`, firing every timer that
    /// comes due on the way. Returns the number of timers fired.
    pub fn advance(&mut self, duration: Duration) -> usize {
        let target = self.window.now().saturating_add(duration);
        let mut fired = 0;
        while let Some(timer) = self.window.timers_mut().pop_due(target) {
            self.window.set_now(timer.due);
            self.run_timer(timer);
            fired += 1;
        }
        self.window.set_now(target);
        fired
    }

    /// Fire every pending timer, including ones scheduled along the way.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.window.timers().next_due() {
            if fired >= MAX_IDLE_TIMERS {
                warn!("giving up after {fired} timers; {} still pending", self.window.timers().len());
                break;
            }
            let delta = due.saturating_sub(self.window.now());
            fired += self.advance(delta);
        }
        fired
    }

    fn run_timer(&mut self, timer: Timer) {
        trace!("timer {:?} fired at {:?}", timer.id, timer.due);
        match timer.task {
            TimerTask::RemoveNode(node) => {
                let doc = self.window.document_mut();
                if doc.is_attached(node) {
                    doc.free(node);
                } else {
                    debug!("timer target {node} already detached");
                }
            }
            TimerTask::Component { owner, token } => {
                let Some(component) = self.components.get_mut(owner.index()) else {
                    warn!("timer for unknown {owner}");
                    return;
                };
                let mut cx = Context::new(&mut self.window, owner);
                if let Err(err) = component.on_timer(&mut cx, token) {
                    error!("{} failed handling timer {token}: {err:#}", component.name());
                }
            }
        }
        self.flush_scroll();
    }

    /// Leave the page. Pending timers are discarded without running.
    pub fn unload(&mut self) -> usize {
        let dropped = self.window.timers_mut().clear();
        if dropped > 0 {
            info!("unloading page with {dropped} pending timers");
        }
        dropped
    }

    // Host-side interaction helpers.

    /// Replace the value of `control` and fire `input`.
    pub fn type_into(&mut self, control: NodeId, value: &str) -> DispatchOutcome {
        self.window.document_mut().set_value(control, value);
        self.dispatch(Event::Input { target: control })
    }

    pub fn blur(&mut self, control: NodeId) -> DispatchOutcome {
        self.dispatch(Event::Blur { target: control })
    }

    /// Click `target`. Disabled controls swallow the click entirely.
    pub fn click(&mut self, target: NodeId) -> DispatchOutcome {
        let doc = self.window.document();
        let disabled = doc
            .closest(target, "button, input")
            .ok()
            .flatten()
            .is_some_and(|control| doc.disabled(control));
        if disabled {
            debug!("click on disabled control {target} ignored");
            return DispatchOutcome::default();
        }
        self.dispatch(Event::Click { target })
    }

    /// Fire `submit` on `form`, as pressing Enter in one of its fields would.
    pub fn submit(&mut self, form: NodeId) -> DispatchOutcome {
        self.dispatch(Event::Submit { form })
    }

    /// Toggle a checkbox and fire `change`.
    pub fn set_checked(&mut self, control: NodeId, checked: bool) -> DispatchOutcome {
        self.window.document_mut().set_checked(control, checked);
        self.dispatch(Event::Change { target: control })
    }

    pub fn resize(&mut self, viewport: Viewport) -> DispatchOutcome {
        self.window.set_viewport(viewport);
        self.dispatch(Event::Resize(viewport))
    }

    pub fn orientation_change(&mut self, viewport: Viewport) -> DispatchOutcome {
        self.window.set_viewport(viewport);
        self.dispatch(Event::OrientationChange)
    }

    /// User scroll to `y`.
    pub fn scroll_to(&mut self, y: f64) -> DispatchOutcome {
        self.window.set_scroll_y(y);
        let y = self.window.scroll_y();
        self.dispatch(Event::Scroll { y })
    }
}
