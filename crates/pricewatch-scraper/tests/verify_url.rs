//! Integration tests for `UrlVerifier` against a local `wiremock` server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricewatch_core::Source;
use pricewatch_scraper::UrlVerifier;

fn verifier() -> UrlVerifier {
    UrlVerifier::new().expect("failed to build UrlVerifier")
}

#[tokio::test]
async fn head_below_400_verifies_without_get() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/dp/B0AAAA1111"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/dp/B0AAAA1111", server.uri());
    assert!(verifier().verify(&url, Source::Amazon).await);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), "HEAD");
}

#[tokio::test]
async fn head_405_falls_back_to_get() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>product</html>"))
        .mount(&server)
        .await;

    let url = format!("{}/dp/B0AAAA1111", server.uri());
    assert!(verifier().verify(&url, Source::Amazon).await);

    let methods: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.method.as_str().to_owned())
        .collect();
    assert_eq!(methods, ["HEAD", "GET"]);
}

#[tokio::test]
async fn head_403_falls_back_to_get() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    assert!(verifier().verify(&server.uri(), Source::Flipkart).await);
}

#[tokio::test]
async fn dead_page_fails_verification() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(!verifier().verify(&server.uri(), Source::Amazon).await);
    // 404 is a definitive answer, no GET fallback.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_fallback_below_400_after_failed_head_connection() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(!verifier().verify(&server.uri(), Source::Meesho).await);
}

#[tokio::test]
async fn unreachable_host_never_propagates_an_error() {
    // Nothing listens on this port; both probes fail at the socket.
    assert!(
        !verifier()
            .verify("http://127.0.0.1:9/dp/B0AAAA1111", Source::Amazon)
            .await
    );
}
