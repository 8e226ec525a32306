use html::NodeId;

use crate::window::Viewport;

/// A DOM or window event delivered to every attached component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    /// The document finished parsing; components wire themselves up.
    DomContentLoaded,
    /// A control's value changed through user input.
    Input { target: NodeId },
    /// A checkbox, radio or select committed a new value.
    Change { target: NodeId },
    /// A control lost focus.
    Blur { target: NodeId },
    Click { target: NodeId },
    Submit { form: NodeId },
    Resize(Viewport),
    OrientationChange,
    Scroll { y: f64 },
}

impl Event {
    /// Node the event is aimed at, if any.
    pub fn target(&self) -> Option<NodeId> {
        match *self {
            Self::Input { target }
            | Self::Change { target }
            | Self::Blur { target }
            | Self::Click { target } => Some(target),
            Self::Submit { form } => Some(form),
            Self::DomContentLoaded | Self::Resize(_) | Self::OrientationChange | Self::Scroll { .. } => {
                None
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Input { .. } => "input",
            Self::Change { .. } => "change",
            Self::Blur { .. } => "blur",
            Self::Click { .. } => "click",
            Self::Submit { .. } => "submit",
            Self::Resize(_) => "resize",
            Self::OrientationChange => "orientationchange",
            Self::Scroll { .. } => "scroll",
        }
    }
}

/// Result of dispatching one event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Some handler called `prevent_default`.
    pub default_prevented: bool,
    /// Number of handlers that returned an error.
    pub failed_handlers: usize,
}
