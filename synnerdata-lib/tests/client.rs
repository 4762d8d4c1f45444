//! Client behavior against a mock Synnerdata API.

use std::sync::Arc;
use std::sync::Mutex;

use serde_json::json;
use synnerdata_lib::SynnerdataClient;
use synnerdata_lib::auth::AccessToken;
use synnerdata_lib::auth::Session;
use synnerdata_lib::auth::SignOutReason;
use synnerdata_lib::error::ApiError;
use synnerdata_lib::error::AuthError;
use synnerdata_lib::error::Error;
use synnerdata_lib::model::Resource;
use synnerdata_lib::model::Row;
use synnerdata_lib::notice::Notice;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

type SignOuts = Arc<Mutex<Vec<SignOutReason>>>;

fn session() -> (Arc<Session>, SignOuts) {
    let seen: SignOuts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let session = Session::new().on_sign_out(move |reason| sink.lock().unwrap().push(reason));
    let session = Arc::new(session);
    (session, seen)
}

async fn signed_in_client(server: &MockServer) -> (SynnerdataClient, Arc<Session>, SignOuts) {
    let (session, seen) = session();
    session.sign_in(AccessToken::new("token-123"), None).await;
    let client = SynnerdataClient::builder()
        .url(server.uri())
        .token_provider(Arc::clone(&session))
        .build()
        .unwrap();
    (client, session, seen)
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/employees/company/c-1"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e-1", "name": "Ana", "status": "A"},
            {"id": "e-2", "name": "Bob", "status": "I"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _, _) = signed_in_client(&server).await;
    let rows = client
        .list_by_company(&Resource::Employees, "c-1")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id().as_deref(), Some("e-1"));
}

#[tokio::test]
async fn test_envelope_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/departments/d-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"id": "d-9", "name": "RH"}})),
        )
        .mount(&server)
        .await;

    let (client, _, _) = signed_in_client(&server).await;
    let row = client.get(&Resource::Departments, "d-9").await.unwrap();
    assert_eq!(row.get_string("name").unwrap(), Some("RH"));
}

#[tokio::test]
async fn test_unauthorized_signs_out_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/absences/company/c-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, seen) = signed_in_client(&server).await;

    let err = client
        .list_by_company(&Resource::Absences, "c-1")
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!session.is_authenticated().await);
    assert_eq!(*seen.lock().unwrap(), vec![SignOutReason::Unauthorized]);

    // the next call never reaches the server
    let err = client
        .list_by_company(&Resource::Absences, "c-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/employees"))
        .and(body_json(json!({"name": "Ana", "cpf": "123"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "CPF inválido",
            "errors": [{"field": "cpf", "message": "deve ter 11 dígitos"}]
        })))
        .mount(&server)
        .await;

    let (client, session, _) = signed_in_client(&server).await;
    let body = Row::new().set("name", "Ana").set("cpf", "123");
    let err = client.create(&Resource::Employees, &body).await.unwrap_err();

    match &err {
        Error::Api(api @ ApiError::Http { status, .. }) => {
            assert_eq!(*status, 422);
            assert_eq!(api.field_errors()[0].field, "cpf");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(Notice::from_error(&err).message, "CPF inválido");
    // only 401 ends the session
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/cost-centers/cc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cc-1", "name": "Obras"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/cost-centers/cc-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _, _) = signed_in_client(&server).await;
    let updated = client
        .update(&Resource::CostCenters, "cc-1", &json!({"name": "Obras"}))
        .await
        .unwrap();
    assert_eq!(updated.get_string("name").unwrap(), Some("Obras"));

    client.delete(&Resource::CostCenters, "cc-1").await.unwrap();
}

#[tokio::test]
async fn test_signed_out_session_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (session, _) = session();
    let client = SynnerdataClient::builder()
        .url(server.uri())
        .token_provider(session)
        .build()
        .unwrap();

    let err = client.list(&Resource::Companies).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
}
