mod common;

use pulse_core::ErrorKind;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{document_json, user_json, DOCUMENTS};

fn session_json(secret: &str) -> serde_json::Value {
    json!({ "$id": "sess1", "userId": "u1", "secret": secret, "provider": "email" })
}

#[tokio::test]
async fn login_stores_secret_for_later_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .and(header("X-Appwrite-Project", "proj"))
        .and(body_json(json!({ "email": "ann@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json("s3cret")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("X-Appwrite-Session", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend(&server);
    let session = backend.login("ann@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user_id, "u1");

    let user = backend.get_current_user().await.unwrap().expect("signed in");
    assert_eq!(user.name, "Ann");
}

#[tokio::test]
async fn rejected_login_reads_as_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials.",
            "code": 401,
            "type": "user_invalid_credentials"
        })))
        .mount(&server)
        .await;

    let backend = common::backend(&server);
    let err = backend.login("ann@example.com", "nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(backend.session().await.is_none());
}

#[tokio::test]
async fn missing_session_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "missing scope" })),
        )
        .mount(&server)
        .await;

    let user = common::backend(&server).get_current_user().await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn create_account_then_logs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account"))
        .and(body_partial_json(json!({ "userId": "unique()", "name": "Ann" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json("u1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json("abc")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend(&server);
    let session = backend
        .create_account("ann@example.com", "hunter22", "Ann")
        .await
        .unwrap();
    assert_eq!(session.secret, "abc");
}

#[tokio::test]
async fn duplicate_account_skips_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "A user with the same id, email, or phone already exists."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json("abc")))
        .expect(0)
        .mount(&server)
        .await;

    let err = common::backend(&server)
        .create_account("ann@example.com", "hunter22", "Ann")
        .await
        .unwrap_err();
    assert!(err.user_message().contains("already exists"));
}

#[tokio::test]
async fn create_preferences_restricts_access_to_owner() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCUMENTS))
        .and(body_partial_json(json!({
            "documentId": "unique()",
            "data": { "userid": "u1", "interested_categories": ["Social Events"] },
            "permissions": ["read(\"user:u1\")", "write(\"user:u1\")"]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(document_json("doc1", "u1", &["Social Events"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let doc = common::backend(&server)
        .create_preferences("u1", &["Social Events".to_string()])
        .await
        .unwrap();
    assert_eq!(doc.id, "doc1");
}

#[tokio::test]
async fn get_preferences_queries_by_owner() {
    let server = MockServer::start().await;

    let query = json!({ "method": "equal", "attribute": "userid", "values": ["u1"] }).to_string();
    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .and(query_param("queries[]", query.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "documents": [document_json("doc1", "u1", &["Ideas Festivals"])]
        })))
        .mount(&server)
        .await;

    let doc = common::backend(&server).get_preferences("u1").await.unwrap();
    assert_eq!(doc.interested_categories, vec!["Ideas Festivals".to_string()]);
}

#[tokio::test]
async fn empty_query_result_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "documents": [] })),
        )
        .mount(&server)
        .await;

    let err = common::backend(&server)
        .get_preferences("u1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.user_message(), "No saved preferences found");
}

#[tokio::test]
async fn logout_drops_credential_even_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json("abc")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/account/sessions/current"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend(&server);
    backend.login("ann@example.com", "hunter22").await.unwrap();
    assert!(backend.session().await.is_some());

    let err = backend.logout().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(backend.session().await.is_none());
}

#[tokio::test]
async fn password_reset_sends_old_and_new() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/account/password"))
        .and(body_json(json!({ "password": "new-password", "oldPassword": "old-password" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1")))
        .expect(1)
        .mount(&server)
        .await;

    let user = common::backend(&server)
        .reset_user_password("old-password", "new-password")
        .await
        .unwrap();
    assert_eq!(user.id, "u1");
}
