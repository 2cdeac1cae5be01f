//! Integration tests for `DkimApiClient` using wiremock HTTP mocks.

use dkimdb_api::{ApiError, DkimApiClient, SessionStatus};
use dkimdb_core::DomainSelectorPair;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> DkimApiClient {
    DkimApiClient::with_base_url(base_url, 5, "dkimdb-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_gmail_page_sends_token_and_parses_pairs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gmail"))
        .and(query_param("pageToken", "X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "Y",
            "domainSelectorPairs": [
                { "domain": "d1.com", "selector": "s1" },
                { "domain": "d2.com", "selector": "s2" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client.fetch_gmail_page("X").await.expect("should parse page");

    assert_eq!(page.next_page_token, "Y");
    assert_eq!(
        page.pairs,
        vec![
            DomainSelectorPair::new("d1.com", "s1"),
            DomainSelectorPair::new("d2.com", "s2"),
        ]
    );
}

#[tokio::test]
async fn fetch_gmail_page_sends_empty_token_for_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gmail"))
        .and(query_param("pageToken", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "",
            "domainSelectorPairs": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client.fetch_gmail_page("").await.unwrap();
    assert!(page.is_last_page());
    assert!(page.pairs.is_empty());
}

#[tokio::test]
async fn error_status_carries_server_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gmail"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized: no access token"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_gmail_page("").await.unwrap_err();

    assert!(
        matches!(err, ApiError::Status { status: 401, .. }),
        "expected Status(401), got: {err:?}"
    );
    assert_eq!(err.payload(), Some("Unauthorized: no access token"));
}

#[tokio::test]
async fn error_status_without_body_has_no_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/upsert_dkim_record"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .upsert_dkim_record(&DomainSelectorPair::new("a.com", "s1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 502, .. }));
    assert_eq!(err.payload(), None);
}

#[tokio::test]
async fn malformed_page_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gmail"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_gmail_page("").await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn upsert_dkim_record_passes_domain_and_selector() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/upsert_dkim_record"))
        .and(query_param("domain", "example.com"))
        .and(query_param("selector", "google"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "added new record" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .upsert_dkim_record(&DomainSelectorPair::new("example.com", "google"))
        .await
        .unwrap();
    assert_eq!(response.message, "added new record");
}

#[tokio::test]
async fn add_domain_selector_pair_accepts_empty_body_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/add_dsp"))
        .and(query_param("domain", "example.com"))
        .and(query_param("selector", "s2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .add_domain_selector_pair(&DomainSelectorPair::new("example.com", "s2024"))
        .await
        .unwrap();
    assert_eq!(response.message, "");
}

#[tokio::test]
async fn session_cookie_is_sent_with_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .and(header("cookie", "next-auth.session-token=tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "email": "alice@example.com", "name": "Alice" },
            "expires": "2026-11-16T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_session_cookie("next-auth.session-token", "tok-123");

    let status = client.get_session().await.unwrap();
    let SessionStatus::Authenticated(session) = status else {
        panic!("expected authenticated session, got: {status:?}");
    };
    assert_eq!(session.email(), Some("alice@example.com"));
    assert_eq!(session.expires.as_deref(), Some("2026-11-16T00:00:00.000Z"));
}

#[tokio::test]
async fn empty_session_object_is_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.get_session().await.unwrap(),
        SessionStatus::Unauthenticated
    );
}

#[tokio::test]
async fn null_session_is_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.get_session().await.unwrap(),
        SessionStatus::Unauthenticated
    );
}

#[tokio::test]
async fn refresh_session_posts_csrf_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrfToken": "csrf-1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/session"))
        .and(body_json(json!({ "csrfToken": "csrf-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "email": "alice@example.com" },
            "expires": "2026-11-16T00:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let session = client.refresh_session().await.expect("refresh should succeed");
    assert_eq!(session.email(), Some("alice@example.com"));
}

#[tokio::test]
async fn refresh_session_fails_when_session_is_gone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrfToken": "csrf-1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.refresh_session().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated), "got: {err:?}");
}

#[tokio::test]
async fn sign_out_posts_csrf_form() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrfToken": "csrf-9" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "url": "http://localhost:3000" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.sign_out().await.expect("sign-out should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let sign_out = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/signout")
        .expect("sign-out request recorded");
    let form = String::from_utf8_lossy(&sign_out.body);
    assert!(form.contains("csrfToken=csrf-9"), "form body: {form}");
    assert!(form.contains("json=true"), "form body: {form}");
}

#[test]
fn sign_in_url_points_at_provider_page() {
    let client = test_client("https://archive.example.org");
    assert_eq!(
        client.sign_in_url().unwrap().as_str(),
        "https://archive.example.org/api/auth/signin"
    );
}

#[tokio::test]
async fn upsert_succeeds_on_status_alone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/add_dsp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/upsert_dkim_record"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let pair = DomainSelectorPair::new("d1.com", "s1");

    let empty = client.add_domain_selector_pair(&pair).await.unwrap();
    let text = client.upsert_dkim_record(&pair).await.unwrap();

    assert_eq!(empty.message, "");
    assert_eq!(text.message, "");
}
