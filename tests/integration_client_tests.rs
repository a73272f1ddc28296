/*
 * Client integration tests against a mocked WebDAV endpoint.
 *
 * Covers name-based verb dispatch, OAuth header injection, path resolution
 * through the navigation stack and end-to-end normalization of both
 * response shapes.
 */

use std::sync::Once;

use anyhow::Result;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use davshell::{DavClient, DavConfig, DavError, RequestArgs, ResponsePayload};

// Global tracing initialization - ensures it only happens once
static INIT_TRACING: Once = Once::new();

fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

fn client_for(server: &MockServer) -> Result<DavClient> {
    let config = DavConfig::new(server.uri(), "test-token");
    Ok(DavClient::new(config)?)
}

const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/docs/report.txt</d:href>
    <d:propstat>
      <d:prop>
        <d:displayname>report.txt</d:displayname>
        <d:getcontentlength>1024</d:getcontentlength>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

#[tokio::test]
async fn ls_normalizes_a_multistatus_listing() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/docs"))
        .and(header("Depth", "1"))
        .and(header("Authorization", "OAuth test-token"))
        .respond_with(
            ResponseTemplate::new(207).set_body_raw(LISTING, "application/xml; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let payload = client.request("ls", RequestArgs::path("/docs")).await?;

    assert!(matches!(payload, ResponsePayload::Structured(_)));
    let records = payload.canonicalize();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["href"], "/docs/report.txt");
    let propstat = records[0]["propstat"].as_object().unwrap();
    assert_eq!(propstat["prop"]["displayname"], "report.txt");
    Ok(())
}

#[tokio::test]
async fn get_falls_back_to_the_plain_payload_for_text_bodies() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("size:1024:type:file", "text/plain"))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let payload = client.request("get", RequestArgs::path("/info")).await?;

    assert!(matches!(payload, ResponsePayload::Plain(_)));
    let records = payload.canonicalize();
    let propstat = records[0]["propstat"].as_object().unwrap();
    assert_eq!(propstat["status"], "HTTP/1.1 200 OK");
    assert_eq!(propstat["prop"]["size"], "1024");

    // the same pairs come back through the structured re-serialization
    let fragment = payload.to_document_fragment();
    assert_eq!(fragment.canonicalize(), payload.canonicalize());
    Ok(())
}

#[tokio::test]
async fn relative_paths_resolve_through_the_navigation_stack() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs/report.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok:1", "text/plain"))
        .mount(&server)
        .await;

    let mut client = client_for(&server)?;
    client.cd("/docs");
    let payload = client
        .request("get", RequestArgs::path("report.txt"))
        .await?;
    assert!(matches!(payload, ResponsePayload::Plain(_)));
    Ok(())
}

#[tokio::test]
async fn mv_sends_the_resolved_destination_header() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("MOVE"))
        .and(path("/old.txt"))
        .and(header("Destination", "/archive/old.txt"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let args = RequestArgs::path("/old.txt").with_destination("/archive/old.txt");
    client.request("mv", args).await?;
    Ok(())
}

#[tokio::test]
async fn mkdir_issues_mkcol() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("MKCOL"))
        .and(path("/new-folder"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    client
        .request("mkdir", RequestArgs::path("/new-folder"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn put_uploads_with_the_binary_default_content_type() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/notes.txt"))
        .and(header("Content-Type", "application/binary"))
        .and(body_string_contains("hello"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let args = RequestArgs {
        path: Some("/notes.txt".to_string()),
        data: Some(b"hello".to_vec()),
        ..Default::default()
    };
    client.request("put", args).await?;
    Ok(())
}

#[tokio::test]
async fn chmod_patches_the_public_url_property() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("PROPPATCH"))
        .and(path("/shared.txt"))
        .and(body_string_contains("<set>"))
        .and(body_string_contains("public_url"))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_raw("<multistatus xmlns=\"DAV:\"/>", "application/xml"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let args = RequestArgs {
        path: Some("/shared.txt".to_string()),
        mode: Some("a+r".to_string()),
        ..Default::default()
    };
    client.request("chmod", args).await?;
    Ok(())
}

#[tokio::test]
async fn df_asks_for_quota_with_depth_zero() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    let quota = r#"<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:propstat>
      <d:prop>
        <d:quota-available-bytes>312475648</d:quota-available-bytes>
        <d:quota-used-bytes>3253515</d:quota-used-bytes>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    Mock::given(method("PROPFIND"))
        .and(path("/"))
        .and(header("Depth", "0"))
        .and(body_string_contains("quota-available-bytes"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(quota, "application/xml"))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let payload = client.request("df", RequestArgs::default()).await?;
    let records = payload.canonicalize();
    let propstat = records[0]["propstat"].as_object().unwrap();
    assert_eq!(propstat["prop"]["quota-used-bytes"], "3253515");
    Ok(())
}

#[tokio::test]
async fn id_queries_userinfo_on_the_service_root() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("userinfo", ""))
        .respond_with(ResponseTemplate::new(200).set_body_raw("login:somebody", "text/plain"))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let payload = client.request("id", RequestArgs::default()).await?;
    let records = payload.canonicalize();
    let propstat = records[0]["propstat"].as_object().unwrap();
    assert_eq!(propstat["prop"]["login"], "somebody");
    Ok(())
}

#[tokio::test]
async fn get_preview_passes_the_size_hint() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .and(query_param("preview", ""))
        .and(query_param("size", "S"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok:1", "text/plain"))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let args = RequestArgs {
        path: Some("/photo.jpg".to_string()),
        size: Some("S".to_string()),
        ..Default::default()
    };
    client.request("get_preview", args).await?;
    Ok(())
}

#[tokio::test]
async fn unknown_operations_are_rejected_without_a_request() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    let client = client_for(&server)?;
    let error = client
        .request("frobnicate", RequestArgs::default())
        .await
        .unwrap_err();

    match error {
        DavError::UnknownOperation(name) => assert_eq!(name, "frobnicate"),
        other => panic!("expected UnknownOperation, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn server_errors_propagate_unmodified() -> Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("not found", "text/plain"))
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let error = client
        .request("get", RequestArgs::path("/missing.txt"))
        .await
        .unwrap_err();

    match error {
        DavError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "not found");
        }
        other => panic!("expected Status, got {other:?}"),
    }
    Ok(())
}
