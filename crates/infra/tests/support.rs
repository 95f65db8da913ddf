//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use serde_json::{json, Value};
use wecom_domain::WecomConfig;
use wecom_infra::Wecom;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CORP_ID: &str = "ww-test-corp";
pub const CORP_SECRET: &str = "test-secret";
pub const TOKEN: &str = "ACCESS_TOKEN_1";

static TRACING: Once = Once::new();

/// Route test logs through the test writer; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Server with a working token endpoint handing out [`TOKEN`].
pub async fn server_with_token() -> MockServer {
    init_tracing();
    let server = MockServer::start().await;
    mount_token(&server, TOKEN).await;
    server
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .and(query_param("corpid", CORP_ID))
        .and(query_param("corpsecret", CORP_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "access_token": token,
            "expires_in": 7200
        })))
        .mount(server)
        .await;
}

pub fn config_for(server: &MockServer) -> WecomConfig {
    let mut config = WecomConfig::new(CORP_ID, CORP_SECRET)
        .with_base_urls(format!("{}/cgi-bin", server.uri()), server.uri());
    config.timeout_secs = 5;
    config.max_attempts = 1;
    config
}

pub fn client_for(server: &MockServer) -> Wecom {
    Wecom::new(config_for(server)).expect("client should build")
}

/// `{"errcode":0,"errmsg":"ok"}` merged with `payload`.
pub fn ok(payload: Value) -> ResponseTemplate {
    let mut body = json!({"errcode": 0, "errmsg": "ok"});
    if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), payload) {
        target.extend(fields);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn service_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"errcode": code, "errmsg": message}))
}
