//! Signed calls through a recording transport.

mod common;

use std::time::Duration;

use common::*;
use http::StatusCode;
use jwplatform_core::ErrorKind;
use jwplatform_v1::{ApiResponse, Client, Config, Credential, Failure, Method};
use pretty_assertions::assert_eq;
use sha1::{Digest, Sha1};
use test_case::test_case;

const SHOW_SIGNED: &str = "api_format=json&api_key=testKey&api_nonce=80684843\
    &api_timestamp=1700000000&video_key=MEDIA_ID\
    &api_signature=e57d6e966e482e90a40f39bd4704c3b8dcf06855";

const SPECIAL_SIGNED: &str = "api_format=json&api_key=testKey&api_nonce=80684843\
    &api_timestamp=1700000000&special_characters=te%24t%20media%26%2A&video_key=MEDIA_ID\
    &api_signature=12387637eca6b9dbe64d0c5bf1dade4bcb6ea318";

#[tokio::test]
async fn test_get_video_show() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let resp = client
        .get("/videos/show", Some(&params(&[("video_key", "MEDIA_ID")])))
        .await
        .unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.status_message(), Some("Ok"));
    assert_eq!(resp.status_code(), Some(200));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, http::Method::GET);
    assert_eq!(requests[0].uri.host(), Some("api.jwplatform.com"));
    assert_eq!(requests[0].uri.path(), "/v1/videos/show");
    assert_eq!(requests[0].query(), SHOW_SIGNED);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_get_with_special_characters() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let params = params(&[
        ("video_key", "MEDIA_ID"),
        ("special_characters", "te$t media&*"),
    ]);
    let resp = client.get("/videos/show", Some(&params)).await.unwrap();

    assert!(resp.is_success());
    assert_eq!(mock.requests()[0].query(), SPECIAL_SIGNED);
}

#[tokio::test]
async fn test_post_with_body_params() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let params = params(&[
        ("video_key", "MEDIA_ID"),
        ("special_characters", "te$t media&*"),
    ]);
    let resp = client
        .post("/videos/update", Some(&params), true)
        .await
        .unwrap();
    assert!(resp.is_success());

    let req = &mock.requests()[0];
    assert_eq!(req.method, http::Method::POST);
    assert_eq!(req.uri.path(), "/v1/videos/update");
    assert_eq!(req.uri.query(), None);
    assert_eq!(
        req.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(req.body_str(), SPECIAL_SIGNED);
}

#[tokio::test]
async fn test_post_without_body_params() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    client
        .post("/videos/show", Some(&params(&[("video_key", "MEDIA_ID")])), false)
        .await
        .unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.method, http::Method::POST);
    assert_eq!(req.query(), SHOW_SIGNED);
    assert_eq!(req.content_type, None);
    assert!(req.body.is_empty());
}

#[test_case(Method::Get, ""; "get empty")]
#[test_case(Method::Get, "  "; "get blank")]
#[test_case(Method::Post, ""; "post empty")]
#[tokio::test]
async fn test_missing_path(method: Method, path: &str) {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let err = client.call(method, path, None, true).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PathMissing);
    assert!(err.is_caller_error());
    assert!(mock.requests().is_empty());
}

#[test_case("PATCH", "/videos/show", ErrorKind::MethodUnsupported; "unsupported method")]
#[test_case("", "/videos/show", ErrorKind::MethodUnsupported; "empty method")]
#[test_case("PATCH", "", ErrorKind::PathMissing; "path checked first")]
#[tokio::test]
async fn test_call_by_name_rejected(method: &str, path: &str, kind: ErrorKind) {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let err = client
        .call_by_name(method, path, None, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), kind);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_call_by_name_lowercase() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    client
        .call_by_name(
            "get",
            "videos/show",
            Some(&params(&[("video_key", "MEDIA_ID")])),
            false,
        )
        .await
        .unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri.path(), "/v1/videos/show");
    assert_eq!(req.query(), SHOW_SIGNED);
}

#[tokio::test]
async fn test_reserved_parameter() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock);

    let err = client
        .get("/videos/show", Some(&params(&[("api_key", "other")])))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ParameterReserved);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_failure_keeps_raw_body() {
    let body = "<html><body>Not Found</body></html>";
    let mock = MockHttpSend::new().respond(404, body);
    let client = test_client(&mock);

    let resp = client.get("/videos/show", None).await.unwrap();
    assert_eq!(
        resp,
        ApiResponse::Failure(Failure::Http {
            status: StatusCode::NOT_FOUND,
            body: body.to_string(),
        })
    );

    let err = resp.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseFailed);
    assert!(!err.is_caller_error());
}

#[tokio::test]
async fn test_success_with_invalid_json() {
    let mock = MockHttpSend::new().respond(200, "not json");
    let client = test_client(&mock);

    let err = client.get("/videos/show", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
}

#[tokio::test]
async fn test_timeout() {
    let mock = MockHttpSend::new()
        .respond(200, SHOW_OK)
        .with_delay(Duration::from_millis(500));
    let client = test_client(&mock).with_timeout(Duration::from_millis(10));

    let err = client.get("/videos/show", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_call_with_deadline_overrides_timeout() {
    let mock = MockHttpSend::new()
        .respond(200, SHOW_OK)
        .with_delay(Duration::from_millis(20));
    let client = test_client(&mock).with_timeout(Duration::from_millis(1));

    let resp = client
        .call_with_deadline(Method::Get, "/videos/show", None, false, None)
        .await
        .unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_signature_with_fresh_nonce() {
    let mock = MockHttpSend::new()
        .respond(200, SHOW_OK)
        .respond(200, SHOW_OK);
    let cred = Credential::new("testKey", "testSecret").unwrap();
    let client = Client::new(context(&mock), cred);

    let other = client.clone();
    let (first, second) = tokio::join!(
        client.get("/videos/show", None),
        other.get("/videos/list", None)
    );
    assert!(first.unwrap().is_success());
    assert!(second.unwrap().is_success());

    for req in mock.requests() {
        let (encoded, sig) = req.query().rsplit_once("&api_signature=").unwrap();

        let mut hasher = Sha1::new();
        hasher.update(encoded.as_bytes());
        hasher.update(b"testSecret");
        assert_eq!(sig, hex::encode(hasher.finalize()));

        let nonce = encoded
            .split('&')
            .find_map(|kv| kv.strip_prefix("api_nonce="))
            .unwrap();
        assert_eq!(nonce.len(), 8);
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
    }
}

#[tokio::test]
async fn test_custom_endpoint() {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);
    let client = test_client(&mock)
        .with_endpoint("http://localhost:8080/v1/")
        .unwrap();

    client.get("/videos/show", None).await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri.authority().unwrap().as_str(), "localhost:8080");
    assert_eq!(req.uri.path(), "/v1/videos/show");
}

#[test_case("", ""; "both empty")]
#[test_case("testKey", ""; "empty secret")]
#[test_case("", "testSecret"; "empty key")]
#[tokio::test]
async fn test_empty_credential_is_never_sent(key: &str, secret: &str) {
    let mock = MockHttpSend::new().respond(200, SHOW_OK);

    let err = Credential::new(key, secret).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

    let config = Config::new().with_api_key(key).with_api_secret(secret);
    let err = Client::from_config(context(&mock), &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

    assert!(mock.requests().is_empty());
}
