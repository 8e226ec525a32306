mod common;

use core::time::Duration;
use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use common::{by_id, error_messages, load_page, load_page_with};
use page_handler::{AlertPresenter, LoginForm, PageKind, Severity, SubmissionBackend, SubmissionRequest};
use validation::messages;

struct Unavailable;

impl SubmissionBackend for Unavailable {
    fn submit(&mut self, _request: &SubmissionRequest) -> Result<()> {
        Err(anyhow!("Servidor no disponible"))
    }
}

#[test]
fn empty_username_and_short_password_are_both_reported() -> Result<()> {
    let (mut page, _) = load_page("login.html", PageKind::Login)?;
    let form = by_id(&page, "login")?;
    let username = by_id(&page, "id_username")?;
    let password = by_id(&page, "id_password")?;
    page.type_into(password, "abc12");

    let outcome = page.submit(form);
    assert!(outcome.default_prevented);
    assert!(page.window().submissions().is_empty());

    let doc = page.document();
    assert!(doc.has_class(username, "is-invalid"));
    assert!(doc.has_class(password, "is-invalid"));
    assert_eq!(
        error_messages(&page)?,
        vec![messages::USERNAME_REQUIRED, messages::PASSWORD_TOO_SHORT]
    );
    Ok(())
}

#[test]
fn valid_login_submits_after_the_busy_period() -> Result<()> {
    let (mut page, backend) = load_page("login.html", PageKind::Login)?;
    let form = by_id(&page, "login")?;
    let button = by_id(&page, "entrar")?;
    page.type_into(by_id(&page, "id_username")?, "ana");
    page.type_into(by_id(&page, "id_password")?, "secreto1");

    page.submit(form);
    assert!(page.document().disabled(button));
    assert_eq!(page.document().text_content(button), "Iniciando sesión...");

    // a second submit while busy is swallowed
    assert!(page.submit(form).default_prevented);
    assert_eq!(page.window().timers().len(), 1);

    page.advance(Duration::from_millis(999));
    assert!(page.window().submissions().is_empty());
    page.advance(Duration::from_millis(1));

    let submissions = page.window().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].action.as_deref(), Some("/accounts/login/"));
    assert!(submissions[0].fields.contains(&(String::from("username"), String::from("ana"))));
    assert_eq!(backend.accepted().len(), 1);

    assert!(!page.document().disabled(button));
    assert_eq!(page.document().text_content(button), "Iniciar sesión");
    Ok(())
}

#[test]
fn clicking_the_submit_button_goes_through_validation() -> Result<()> {
    let (mut page, _) = load_page("login.html", PageKind::Login)?;
    page.click(by_id(&page, "entrar")?);
    assert_eq!(error_messages(&page)?.len(), 2);
    assert!(page.document().has_class(by_id(&page, "login")?, "was-validated"));
    assert!(page.window().timers().is_empty());
    Ok(())
}

#[test]
fn blur_validates_and_typing_clears() -> Result<()> {
    let (mut page, _) = load_page("login.html", PageKind::Login)?;
    let password = by_id(&page, "id_password")?;

    page.blur(password);
    assert_eq!(error_messages(&page)?, vec![messages::PASSWORD_REQUIRED]);

    page.type_into(password, "s");
    assert!(error_messages(&page)?.is_empty());
    assert!(!page.document().has_class(password, "is-invalid"));

    page.type_into(password, "secreto");
    page.blur(password);
    assert!(page.document().has_class(password, "is-valid"));
    Ok(())
}

#[test]
fn rejected_login_shows_a_danger_banner() -> Result<()> {
    let mut page = load_page_with("login.html", PageKind::Login, Box::new(Unavailable))?;
    page.type_into(by_id(&page, "id_username")?, "ana");
    page.type_into(by_id(&page, "id_password")?, "secreto1");
    page.submit(by_id(&page, "login")?);
    page.advance(Duration::from_secs(1));

    assert!(page.window().submissions().is_empty());
    let alerts = AlertPresenter::visible(page.document())?;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Danger);
    assert_eq!(alerts[0].message, "Servidor no disponible");
    assert!(!page.document().disabled(by_id(&page, "entrar")?));
    Ok(())
}

#[test]
fn leaving_mid_submission_drops_the_submission() -> Result<()> {
    let (mut page, _) = load_page("login.html", PageKind::Login)?;
    page.type_into(by_id(&page, "id_username")?, "ana");
    page.type_into(by_id(&page, "id_password")?, "secreto1");
    page.submit(by_id(&page, "login")?);

    assert_eq!(page.unload(), 1);
    page.run_until_idle();
    assert!(page.window().submissions().is_empty());
    Ok(())
}

#[test]
fn server_errors_land_on_their_fields() -> Result<()> {
    let (mut page, _) = load_page("login.html", PageKind::Login)?;
    let errors = BTreeMap::from([
        (
            String::from("username"),
            vec![String::from("Usuario o contraseña incorrectos"), String::from("otro")],
        ),
        (String::from("inexistente"), vec![String::from("ignorado")]),
        (String::from("password"), Vec::new()),
    ]);
    LoginForm::handle_server_errors(page.document_mut(), &errors)?;

    assert_eq!(error_messages(&page)?, vec!["Usuario o contraseña incorrectos"]);
    assert!(page.document().has_class(by_id(&page, "id_username")?, "is-invalid"));
    Ok(())
}
