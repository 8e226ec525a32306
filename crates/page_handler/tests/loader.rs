mod common;

use core::net::SocketAddr;

use anyhow::{Context as _, Result, anyhow};
use common::{by_id, load_page};
use page_handler::loader::LOAD_FAILED;
use page_handler::{AlertPresenter, DataLoader, HtmlPage, LoadOptions, PageKind, Severity};
use reqwest::{Client, Method};
use serde_json::json;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Answer a single request with `status` and `body`, handing back the raw
/// request text.
async fn serve_once(status: &'static str, body: String) -> Result<(SocketAddr, JoinHandle<Result<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await?;
        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let read = stream.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&request);
            if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                let expected = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if rest.len() >= expected {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await?;
        Ok::<_, anyhow::Error>(String::from_utf8(request)?)
    });
    Ok((addr, handle))
}

fn loader() -> Result<DataLoader> {
    let client = Client::builder().no_proxy().build()?;
    Ok(DataLoader::with_client(client, AlertPresenter::default()))
}

fn page_at(addr: SocketAddr) -> Result<HtmlPage> {
    let (mut page, _) = load_page("patient.html", PageKind::Patient)?;
    let location = Url::parse(&format!("http://{addr}/pacientes/panel/"))?;
    page.window_mut().set_location(location);
    page.window_mut().set_cookie("sessionid=xyz; csrftoken=tok%2B123");
    Ok(page)
}

fn alerts(page: &HtmlPage) -> Result<Vec<(String, Severity)>> {
    Ok(AlertPresenter::visible(page.document())?
        .into_iter()
        .map(|alert| (alert.message, alert.severity))
        .collect())
}

#[tokio::test]
async fn loaded_html_replaces_the_container() -> Result<()> {
    let body = json!({"html": "<p id=\"cargado\">Tres citas</p>", "message": "Listo", "success": true});
    let (addr, server) = serve_once("200 OK", body.to_string()).await?;
    let mut page = page_at(addr)?;
    let container = by_id(&page, "contenido")?;

    loader()?
        .load_data(&mut page, "/api/citas/", Some(container), &LoadOptions::default())
        .await?;

    let request = server.await.context("server task panicked")??.to_ascii_lowercase();
    assert!(request.starts_with("get /api/citas/ "), "{request}");
    assert!(request.contains("x-csrftoken: tok+123"), "{request}");
    assert!(request.contains("content-type: application/json"), "{request}");

    let loaded = by_id(&page, "cargado")?;
    assert_eq!(page.document().text_content(loaded), "Tres citas");
    assert_eq!(alerts(&page)?, vec![(String::from("Listo"), Severity::Success)]);
    Ok(())
}

#[tokio::test]
async fn message_is_used_when_there_is_no_html() -> Result<()> {
    let (addr, server) = serve_once("200 OK", json!({"message": "Sin citas"}).to_string()).await?;
    let mut page = page_at(addr)?;
    let container = by_id(&page, "contenido")?;
    let options = LoadOptions {
        method: Method::POST,
        data: Some(json!({"mes": 11})),
        headers: vec![(String::from("X-Requested-With"), String::from("XMLHttpRequest"))],
    };

    loader()?
        .load_data(&mut page, "filtrar/", Some(container), &options)
        .await?;

    let request = server.await.context("server task panicked")??;
    let lowered = request.to_ascii_lowercase();
    assert!(lowered.starts_with("post /pacientes/panel/filtrar/ "), "{request}");
    assert!(lowered.contains("x-requested-with: xmlhttprequest"), "{request}");
    assert!(request.ends_with(r#"{"mes":11}"#), "{request}");

    assert_eq!(page.document().text_content(container), "Sin citas");
    // not a success, so no banner
    assert!(alerts(&page)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn json_error_replies_are_rendered() -> Result<()> {
    let body = json!({"success": false, "message": "Nombre de medicamento requerido"});
    let (addr, server) = serve_once("400 Bad Request", body.to_string()).await?;
    let mut page = page_at(addr)?;
    let container = by_id(&page, "contenido")?;

    loader()?
        .load_data(&mut page, "/api/medicamentos/", Some(container), &LoadOptions::default())
        .await?;
    server.await.context("server task panicked")??;

    assert_eq!(page.document().text_content(container), "Nombre de medicamento requerido");
    assert!(alerts(&page)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_json_reply_gets_the_default_notice() -> Result<()> {
    let (addr, server) = serve_once("500 Internal Server Error", String::from("{}")).await?;
    let mut page = page_at(addr)?;
    let container = by_id(&page, "contenido")?;

    loader()?
        .load_data(&mut page, "/api/citas/", Some(container), &LoadOptions::default())
        .await?;
    server.await.context("server task panicked")??;

    assert_eq!(page.document().text_content(container), "Datos cargados");
    assert!(alerts(&page)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_json_reply_shows_the_generic_banner() -> Result<()> {
    let (addr, server) = serve_once("502 Bad Gateway", String::from("<h1>Bad Gateway</h1>")).await?;
    let mut page = page_at(addr)?;
    let container = by_id(&page, "contenido")?;

    loader()?
        .load_data(&mut page, "/api/citas/", Some(container), &LoadOptions::default())
        .await?;
    server.await.context("server task panicked")??;

    assert_eq!(page.document().inner_html(container), "");
    assert_eq!(alerts(&page)?, vec![(String::from(LOAD_FAILED), Severity::Danger)]);
    Ok(())
}

#[tokio::test]
async fn unreachable_server_shows_the_generic_banner() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    let mut page = page_at(addr)?;
    page.window_mut().set_cookie("");

    loader()?
        .load_data(&mut page, "/api/citas/", None, &LoadOptions::default())
        .await?;

    let shown = alerts(&page)?;
    let first = shown.first().ok_or_else(|| anyhow!("no banner shown"))?;
    assert_eq!(first, &(String::from(LOAD_FAILED), Severity::Danger));
    Ok(())
}
