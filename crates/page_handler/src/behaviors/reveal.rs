use anyhow::Result;
use html::{LayoutBox, NodeId};
use log::debug;

use crate::component::{Component, Context};
use crate::events::Event;

const OBSERVED: &str = ".animate-on-scroll";
const REVEALED: &str = "fade-in";

/// Fraction of `element` visible between `view_top` and `view_bottom`, all in
/// document coordinates. Zero-height elements count as fully visible when
/// their top edge lies in the view.
pub fn intersection_ratio(element: LayoutBox, view_top: f64, view_bottom: f64) -> f64 {
    let bottom = element.top + element.height;
    if element.height <= 0.0 {
        let inside = element.top >= view_top && element.top <= view_bottom;
        return if inside { 1.0 } else { 0.0 };
    }
    let visible = bottom.min(view_bottom) - element.top.max(view_top);
    (visible / element.height).clamp(0.0, 1.0)
}

/// One-shot reveal of `.animate-on-scroll` elements as they scroll into view.
#[derive(Clone, Debug)]
pub struct RevealOnScroll {
    threshold: f64,
    bottom_margin: f64,
    observed: Vec<NodeId>,
}

impl RevealOnScroll {
    pub const fn new(threshold: f64, bottom_margin: f64) -> Self {
        Self {
            threshold,
            bottom_margin,
            observed: Vec::new(),
        }
    }

    /// Elements still waiting to be revealed.
    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    fn check(&mut self, cx: &mut Context<'_>) {
        let window = cx.window();
        let view_top = window.scroll_y();
        let view_bottom = view_top + (window.viewport().height - self.bottom_margin).max(0.0);
        let threshold = self.threshold;

        let mut revealed = Vec::new();
        self.observed.retain(|node| {
            let Some(layout) = window.document().layout_box(*node) else {
                return true;
            };
            let ratio = intersection_ratio(layout, view_top, view_bottom);
            let intersecting = ratio > 0.0 && ratio >= threshold;
            if intersecting {
                revealed.push(*node);
            }
            !intersecting
        });

        for node in revealed {
            debug!("revealing {node}");
            cx.doc_mut().add_class(node, REVEALED);
        }
    }
}

impl Component for RevealOnScroll {
    fn name(&self) -> &'static str {
        "reveal-on-scroll"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        match event {
            Event::DomContentLoaded => {
                self.observed = cx.doc().select_all(OBSERVED)?;
                self.check(cx);
            }
            Event::Scroll { .. } | Event::Resize(_) | Event::OrientationChange => self.check(cx),
            _ => {}
        }
        Ok(())
    }
}
