mod common;

use anyhow::Result;
use common::{by_id, load_page};
use html::LayoutBox;
use page_handler::window::{ScrollBehavior, ScrollBlock};
use page_handler::{PageKind, Viewport};

#[test]
fn fragment_links_scroll_smoothly_instead_of_jumping() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let servicios = by_id(&page, "servicios")?;

    let outcome = page.click(by_id(&page, "ir-servicios")?);
    assert!(outcome.default_prevented);
    assert_eq!(page.window().location().fragment(), None);

    let scrolls = page.window().scrolls();
    assert_eq!(scrolls.len(), 1);
    assert_eq!(scrolls[0].target, servicios);
    assert_eq!(scrolls[0].behavior, ScrollBehavior::Smooth);
    assert_eq!(scrolls[0].block, ScrollBlock::Start);
    Ok(())
}

#[test]
fn bare_hash_link_does_nothing() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    assert!(page.click(by_id(&page, "arriba")?).default_prevented);
    assert!(page.window().scrolls().is_empty());
    assert_eq!(page.window().location().fragment(), None);
    Ok(())
}

#[test]
fn invalid_native_form_is_held_back() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let form = by_id(&page, "contacto-form")?;

    assert!(page.submit(form).default_prevented);
    assert!(page.document().has_class(form, "was-validated"));
    assert!(page.window().submissions().is_empty());

    page.type_into(by_id(&page, "contacto-nombre")?, "Lu");
    page.type_into(by_id(&page, "contacto-email")?, "lu@example.com");
    page.click(by_id(&page, "enviar")?);

    let submissions = page.window().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].action.as_deref(), Some("/contacto/"));
    Ok(())
}

#[test]
fn typing_styles_controls_from_their_constraints() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let nombre = by_id(&page, "contacto-nombre")?;
    let email = by_id(&page, "contacto-email")?;

    page.type_into(nombre, "L");
    page.type_into(email, "no-es-correo");
    assert!(page.document().has_class(nombre, "is-invalid"));
    assert!(page.document().has_class(email, "is-invalid"));

    page.type_into(nombre, "Luz");
    assert!(page.document().has_class(nombre, "is-valid"));
    assert!(!page.document().has_class(nombre, "is-invalid"));
    Ok(())
}

#[test]
fn sections_fade_in_once_scrolled_into_view() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let servicios = by_id(&page, "servicios")?;
    let contacto = by_id(&page, "contacto")?;
    page.document_mut().set_layout_box(servicios, LayoutBox { top: 100.0, height: 200.0 });
    page.document_mut().set_layout_box(contacto, LayoutBox { top: 2000.0, height: 400.0 });

    page.scroll_to(0.0);
    assert!(page.document().has_class(servicios, "fade-in"));
    assert!(!page.document().has_class(contacto, "fade-in"));

    page.scroll_to(1800.0);
    assert!(page.document().has_class(contacto, "fade-in"));

    // revealed elements are no longer watched
    page.document_mut().remove_class(servicios, "fade-in");
    page.scroll_to(0.0);
    assert!(!page.document().has_class(servicios, "fade-in"));
    Ok(())
}

#[test]
fn smooth_scroll_reveals_its_target() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let servicios = by_id(&page, "servicios")?;
    page.document_mut().set_layout_box(servicios, LayoutBox { top: 1500.0, height: 300.0 });

    page.click(by_id(&page, "ir-servicios")?);
    assert!((page.window().scroll_y() - 1500.0).abs() < f64::EPSILON);
    assert!(page.document().has_class(servicios, "fade-in"));
    Ok(())
}

#[test]
fn main_fills_the_space_between_navbar_and_footer() -> Result<()> {
    let (mut page, _) = load_page("site.html", PageKind::Site)?;
    let nav = by_id(&page, "nav")?;
    let pie = by_id(&page, "pie")?;
    page.document_mut().set_layout_box(nav, LayoutBox { top: 0.0, height: 56.0 });
    page.document_mut().set_layout_box(pie, LayoutBox { top: 900.0, height: 120.0 });

    page.resize(Viewport::new(1280.0, 800.0));

    let doc = page.document();
    let min_height = |id: &str| -> Result<Option<String>> { Ok(doc.style_property(by_id(&page, id)?, "min-height")) };
    assert_eq!(min_height("principal")?.as_deref(), Some("624px"));
    assert_eq!(min_height("forzado")?.as_deref(), Some("800px"));
    assert_eq!(min_height("envoltorio")?.as_deref(), Some("624px"));
    assert_eq!(doc.attribute(by_id(&page, "principal")?, "style"), Some("min-height: 624px;"));

    page.orientation_change(Viewport::new(800.0, 1280.0));
    let main = by_id(&page, "principal")?;
    assert_eq!(page.document().style_property(main, "min-height").as_deref(), Some("1104px"));
    Ok(())
}
