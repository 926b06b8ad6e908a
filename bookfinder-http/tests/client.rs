use bookfinder_http::{ClientSettings, HttpClient, HttpError, RequestOpts, StatusCode};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_json_decodes_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works/OL45804W.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Fantastic Mr Fox"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: Value = client
        .get_json("/works/OL45804W.json", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(got["title"], "Fantastic Mr Fox");
}

#[tokio::test]
async fn query_pairs_are_sent_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("title", "Harry Potter"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"docs": []})))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let opts = RequestOpts {
        query: Some(vec![
            ("title", Cow::Borrowed("Harry Potter")),
            ("limit", Cow::Borrowed("20")),
        ]),
        ..Default::default()
    };
    let _: Value = client.get_json("/search.json", opts).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("title=Harry+Potter&limit=20"));
}

#[tokio::test]
async fn non_success_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "notfound"})))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("/works/missing.json", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Api { status, message, .. } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "notfound");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_bytes("/search.json", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, HttpError::Api { status: StatusCode::SERVICE_UNAVAILABLE, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn retry_budget_recovers_from_one_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap().with_retries(1);
    let body = client
        .get_bytes("/anything", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<Value>("/search.json", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snip) if snip.contains("maintenance")));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let client = HttpClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = client
        .get_bytes("/search.json", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(err.is_network(), "got {err:?}");
}

#[tokio::test]
async fn absolute_urls_bypass_the_base_when_allowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = HttpClient::new("https://openlibrary.invalid").unwrap();
    let opts = RequestOpts {
        allow_absolute: true,
        ..Default::default()
    };
    let got: Value = client
        .get_json(&format!("{}/raw", server.uri()), opts)
        .await
        .unwrap();
    assert_eq!(got["ok"], true);
}

#[tokio::test]
async fn client_timeout_from_settings_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        timeout: Duration::from_millis(100),
        ..ClientSettings::default()
    };
    let client = HttpClient::with_settings(&server.uri(), &settings).unwrap();
    let err = client
        .get_bytes("/search.json", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(err.is_network(), "got {err:?}");
}
