//! Site-wide page behaviors attached to every page: in-page smooth scrolling,
//! the native constraint-validation bridge, reveal-on-scroll animations and
//! footer layout adjustment.

mod layout;
mod native_validation;
mod reveal;
mod smooth_scroll;

pub use layout::{LayoutAdjuster, min_content_height};
pub use native_validation::NativeValidation;
pub use reveal::{RevealOnScroll, intersection_ratio};
pub use smooth_scroll::SmoothScroll;

use crate::config::PageConfig;
use crate::state::HtmlPage;

/// Attach the behaviors every site page loads, in the order the site wires them.
pub fn install_site_behaviors(page: &mut HtmlPage, config: &PageConfig) {
    page.attach(Box::new(SmoothScroll));
    page.attach(Box::new(NativeValidation));
    page.attach(Box::new(RevealOnScroll::new(
        config.reveal_threshold,
        config.reveal_margin_px,
    )));
    page.attach(Box::new(LayoutAdjuster));
}
