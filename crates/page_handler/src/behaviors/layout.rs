use anyhow::Result;
use log::{debug, info};

use crate::component::{Component, Context};
use crate::events::Event;

/// Height left for the main content once the navbar and footer are placed,
/// never negative.
pub fn min_content_height(viewport: f64, navbar: f64, footer: f64) -> f64 {
    (viewport - navbar - footer).max(0.0)
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Keeps the footer at the bottom of short pages by giving `main` a minimum
/// height.
#[derive(Copy, Clone, Debug, Default)]
pub struct LayoutAdjuster;

impl LayoutAdjuster {
    fn adjust(cx: &mut Context<'_>) -> Result<()> {
        let doc = cx.doc();
        let (Some(main), Some(footer), Some(navbar)) = (
            doc.select("main")?,
            doc.select("footer")?,
            doc.select(".navbar")?,
        ) else {
            debug!("layout adjustment skipped: main, footer or .navbar missing");
            return Ok(());
        };

        let window_height = cx.window().viewport().height;
        let navbar_height = doc.offset_height(navbar);
        let footer_height = doc.offset_height(footer);
        let min_main = min_content_height(window_height, navbar_height, footer_height);
        let forced = doc.select(".force-footer-visible")?;
        let wrapper = match forced {
            Some(container) => doc.query_selector(container, ".content-wrapper")?,
            None => None,
        };

        let dom = cx.doc_mut();
        dom.set_style_property(main, "min-height", &px(min_main));
        if let Some(container) = forced {
            dom.set_style_property(container, "min-height", &px(window_height));
        }
        if let Some(wrapper) = wrapper {
            dom.set_style_property(wrapper, "min-height", &px(min_main));
        }

        info!(
            "Footer visibility adjusted: window={window_height} navbar={navbar_height} \
             footer={footer_height} main={min_main}"
        );
        Ok(())
    }
}

impl Component for LayoutAdjuster {
    fn name(&self) -> &'static str {
        "layout-adjuster"
    }

    fn handle_event(&mut self, cx: &mut Context<'_>, event: &Event) -> Result<()> {
        match event {
            Event::DomContentLoaded | Event::Resize(_) | Event::OrientationChange => Self::adjust(cx),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_height_subtracts_chrome() {
        assert!((min_content_height(800.0, 56.0, 120.0) - 624.0).abs() < f64::EPSILON);
        assert!(min_content_height(100.0, 56.0, 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pixel_values_drop_trailing_zeroes() {
        assert_eq!(px(624.0), "624px");
        assert_eq!(px(56.5), "56.5px");
    }
}
