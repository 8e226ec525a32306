use anyhow::Result;
use log::debug;

use crate::component::{Component, Context};
use crate::events::Event;
use crate::window::{ScrollBehavior, ScrollBlock};

/// Turns clicks on `#fragment` links into smooth scrolls to the target.
#[derive(Copy, Clone, Debug, Default)]
pub struct SmoothScroll;

impl Component for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth-scroll"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        let Event::Click { target } = *event else {
            return Ok(());
        };
        let doc = cx.doc();
        let Some(anchor) = doc.closest(target, r##"a[href^="#"]"##)? else {
            return Ok(());
        };
        let href = doc.attribute(anchor, "href").unwrap_or_default().to_owned();
        cx.prevent_default();

        // "#" alone is not a selector
        let destination = match cx.doc().select(&href) {
            Ok(found) => found,
            Err(err) => {
                debug!("link {href:?} is not a selector: {err}");
                None
            }
        };
        if let Some(destination) = destination {
            cx.window_mut()
                .scroll_into_view(destination, ScrollBehavior::Smooth, ScrollBlock::Start);
        }
        Ok(())
    }
}
