//! Login flow and callback parsing.

mod support;

use serde_json::json;
use support::{client_for, ok, server_with_token, service_error};
use url::Url;
use wecom_domain::{AuthRequest, ChangeType, EventKind, JobType};
use wecom_infra::{parse_batch_jobs, parse_event, ApiError};
use wiremock::matchers::{method, path, query_param};
use wiremock::Mock;

#[tokio::test]
async fn authorize_url_round_trips_through_url_parser() {
    let server = server_with_token().await;
    let wecom = client_for(&server);
    let redirect = "https://app.example.com/login?next=/home";
    let request = AuthRequest::new("ww-test-corp", "1000002", redirect)
        .with_state("csrf-42")
        .with_lang("en");

    let url = Url::parse(&wecom.authorize_url(&request).unwrap()).unwrap();
    assert_eq!(url.path(), "/wwopen/sso/qrConnect");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("appid".to_string(), "ww-test-corp".to_string()),
            ("agentid".to_string(), "1000002".to_string()),
            ("redirect_uri".to_string(), "https://app.example.com/login?next=/home".to_string()),
            ("state".to_string(), "csrf-42".to_string()),
            ("lang".to_string(), "en".to_string()),
        ]
    );
}

#[tokio::test]
async fn user_info_resolves_code() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/getuserinfo"))
        .and(query_param("code", "good"))
        .respond_with(ok(json!({"UserId": "zhangsan", "DeviceId": "d1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/getuserinfo"))
        .and(query_param("code", "outsider"))
        .respond_with(ok(json!({"OpenId": "o-123", "DeviceId": "d2"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/getuserinfo"))
        .and(query_param("code", "used"))
        .respond_with(service_error(40029, "invalid code"))
        .mount(&server)
        .await;

    let oauth = client_for(&server).oauth();
    assert_eq!(oauth.user_info("good").await.unwrap(), "zhangsan");
    assert!(matches!(oauth.user_info("outsider").await, Err(ApiError::Auth(_))));
    assert_eq!(oauth.user_info("used").await.unwrap_err().service_code(), Some(40029));
    assert!(matches!(oauth.user_info("").await, Err(ApiError::InvalidInput(_))));
}

#[test]
fn callback_documents_are_classified() {
    let party = parse_event(
        "<xml><ToUserName><![CDATA[ww1]]></ToUserName><FromUserName><![CDATA[sys]]></FromUserName>\
         <CreateTime>1700000000</CreateTime><MsgType><![CDATA[event]]></MsgType>\
         <Event><![CDATA[change_contact]]></Event><ChangeType><![CDATA[update_party]]></ChangeType>\
         <Id>7</Id></xml>",
    )
    .unwrap();
    assert_eq!(party.party_id, Some(7));
    assert_eq!(party.kind(), EventKind::ChangeContact(ChangeType::UpdateParty));

    let tag = parse_event(concat!(
        "<xml><Event>change_contact</Event>",
        "<ChangeType>update_tag</ChangeType><TagId>3</TagId></xml>",
    ))
    .unwrap();
    assert_eq!(tag.tag_id, Some(3));
    assert_eq!(tag.kind(), EventKind::ChangeContact(ChangeType::UpdateTag));

    let jobs = parse_batch_jobs(
        "<xml><Event>batch_job_result</Event><BatchJob><JobId>j1</JobId>\
         <JobType>replace_party</JobType><ErrCode>60123</ErrCode><ErrMsg>invalid party</ErrMsg>\
         </BatchJob></xml>",
    )
    .unwrap();
    assert_eq!(jobs[0].kind(), JobType::ReplaceParty);
    assert!(jobs[0].status().check().is_err());
}
