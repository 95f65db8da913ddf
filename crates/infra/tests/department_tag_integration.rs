//! Department and tag endpoints against a mock server.

mod support;

use serde_json::json;
use support::{client_for, ok, server_with_token};
use wecom_domain::Department;
use wecom_infra::ApiError;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::Mock;

#[tokio::test]
async fn department_create_returns_numeric_id() {
    let server = server_with_token().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/department/create"))
        .and(body_json(json!({"name": "R&D", "parentid": 1})))
        .respond_with(ok(json!({"id": 70_000})))
        .mount(&server)
        .await;

    let departments = client_for(&server).departments();
    assert_eq!(departments.create(&Department::new("R&D", 1)).await.unwrap(), 70_000);

    let orphan = Department { name: "orphan".into(), ..Department::default() };
    assert!(matches!(departments.create(&orphan).await, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn department_update_requires_id() {
    let server = server_with_token().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/department/update"))
        .and(body_json(json!({"id": 2, "name": "Sales"})))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let departments = client_for(&server).departments();
    let renamed = Department { id: Some(2), name: "Sales".into(), ..Department::default() };
    departments.update(&renamed).await.unwrap();

    let err = departments.update(&Department::new("Sales", 1)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn department_get_uses_get_endpoint() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/department/get"))
        .and(query_param("id", "2"))
        .respond_with(ok(json!({
            "department": {
                "id": 2,
                "name": "Sales",
                "parentid": 1,
                "order": 10,
                "department_leader": ["lisi"]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/department/delete"))
        .and(query_param("id", "2"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let departments = client_for(&server).departments();
    let department = departments.get(2).await.unwrap();
    assert_eq!(department.name, "Sales");
    assert_eq!(department.department_leader, vec!["lisi"]);
    departments.delete(2).await.unwrap();
}

#[tokio::test]
async fn department_lists_with_and_without_root() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/department/list"))
        .and(query_param("id", "1"))
        .respond_with(ok(json!({
            "department": [
                {"id": 1, "name": "Corp", "parentid": 0},
                {"id": 2, "name": "Sales", "parentid": 1}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/department/simplelist"))
        .respond_with(ok(json!({
            "department_id": [
                {"id": 1, "parentid": 0, "order": 100},
                {"id": 2, "parentid": 1, "order": 50}
            ]
        })))
        .mount(&server)
        .await;

    let departments = client_for(&server).departments();
    let tree = departments.list(Some(1)).await.unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[1].parentid, Some(1));

    let ids = departments.simple_list(None).await.unwrap();
    assert_eq!(ids[0].order, 100);
    assert_eq!(ids[1].id, 2);

    let requests = server.received_requests().await.unwrap();
    let simple = requests.iter().find(|r| r.url.path().ends_with("simplelist")).unwrap();
    assert!(!simple.url.query_pairs().any(|(k, _)| k == "id"));
}

#[tokio::test]
async fn tag_lifecycle() {
    let server = server_with_token().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/tag/create"))
        .and(body_json(json!({"tagname": "ops"})))
        .respond_with(ok(json!({"tagid": 12})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/tag/update"))
        .and(body_json(json!({"tagname": "sre", "tagid": 12})))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/list"))
        .respond_with(ok(json!({"taglist": [{"tagid": 12, "tagname": "sre"}]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/delete"))
        .and(query_param("tagid", "12"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let tags = client_for(&server).tags();
    let tagid = tags.create("ops", None).await.unwrap();
    assert_eq!(tagid, 12);
    tags.update(tagid, "sre").await.unwrap();
    let all = tags.list().await.unwrap();
    assert_eq!(all[0].tagname, "sre");
    tags.delete(tagid).await.unwrap();

    assert!(matches!(tags.create(" ", None).await, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn tag_members_and_membership_changes() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/tag/get"))
        .and(query_param("tagid", "12"))
        .respond_with(ok(json!({
            "tagname": "sre",
            "userlist": [{"userid": "zhangsan", "name": "Zhang San"}],
            "partylist": [2]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/tag/addtagusers"))
        .and(body_json(json!({
            "tagid": 12,
            "userlist": ["a", "ghost1", "ghost2"],
            "partylist": [9]
        })))
        .respond_with(ok(json!({"invalidlist": "ghost1|ghost2", "invalidparty": [9]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/tag/deltagusers"))
        .and(body_json(json!({"tagid": 12, "userlist": ["a"]})))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    let tags = client_for(&server).tags();
    let members = tags.members(12).await.unwrap();
    assert_eq!(members.tagname, "sre");
    assert_eq!(members.userlist[0].userid, "zhangsan");
    assert_eq!(members.partylist, vec![2]);

    let users: Vec<String> = ["a", "ghost1", "ghost2"].map(String::from).to_vec();
    let added = tags.add_members(12, &users, &[9]).await.unwrap();
    assert_eq!(added.invalid_users, vec!["ghost1", "ghost2"]);
    assert_eq!(added.invalid_parties, vec![9]);

    let removed = tags.remove_members(12, &users[..1], &[]).await.unwrap();
    assert!(removed.is_clean());

    assert!(matches!(tags.add_members(12, &[], &[]).await, Err(ApiError::InvalidInput(_))));
}
