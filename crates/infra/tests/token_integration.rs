//! Token caching and refresh through the facade.

mod support;

use serde_json::json;
use support::{client_for, config_for, init_tracing, mount_token, ok, service_error, CORP_ID};
use wecom_common::TokenCheck;
use wecom_infra::{ApiError, Wecom};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn token_is_fetched_once_and_reused() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ok(json!({"access_token": "T1", "expires_in": 7200})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/list"))
        .and(query_param("access_token", "T1"))
        .respond_with(ok(json!({"taglist": []})))
        .expect(3)
        .mount(&server)
        .await;

    let wecom = client_for(&server);
    assert_eq!(wecom.auth().check().await, Err(TokenCheck::Missing));
    for _ in 0..3 {
        wecom.tags().list().await.unwrap();
    }
    assert!(wecom.auth().check().await.is_ok());
    let token = wecom.auth().current_token().await.unwrap();
    assert_eq!(token.secret(), "T1");
    assert_eq!(token.expires_in(), 7200);
}

#[tokio::test]
async fn expired_token_is_refreshed_and_call_retried() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token(&server, "T2").await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/list"))
        .and(query_param("access_token", "T2"))
        .respond_with(service_error(42001, "access_token expired"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/list"))
        .respond_with(ok(json!({"taglist": [{"tagid": 1, "tagname": "ops"}]})))
        .mount(&server)
        .await;

    let wecom = client_for(&server);
    let tags = wecom.tags().list().await.unwrap();
    assert_eq!(tags.len(), 1);

    let token_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/cgi-bin/gettoken")
        .count();
    assert_eq!(token_requests, 2);
}

#[tokio::test]
async fn rejected_credentials_fail_the_call() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .and(query_param("corpid", CORP_ID))
        .respond_with(service_error(40001, "invalid credential"))
        .mount(&server)
        .await;

    let wecom = client_for(&server);
    let err = wecom.users().get("zhangsan").await.unwrap_err();
    assert_eq!(err.service_code(), Some(40001));
    assert!(wecom.auth().current_token().await.is_none());
}

#[tokio::test]
async fn http_status_errors_are_mapped() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token(&server, "T3").await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/get"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/department/get"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let wecom = Wecom::new(config_for(&server)).unwrap();
    assert!(matches!(wecom.users().get("a").await, Err(ApiError::RateLimit(_))));
    assert!(matches!(wecom.departments().get(1).await, Err(ApiError::Auth(_))));
}
