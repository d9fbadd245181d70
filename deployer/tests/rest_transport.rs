//! REST transport against a mock admin endpoint

use std::io::Write;
use std::time::Duration;

use asdeploy::http::client::RestTransport;
use asdeploy::http::transport::{InvocationResult, Transport, TransportRequest, REPORT_CONTENT_TYPE};
use asdeploy::models::target::ServerTarget;
use secrecy::SecretString;
use wiremock::matchers::{body_bytes, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEPLOYED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<action-report description="deploy AdminCommand" exit-code="SUCCESS">
  <message-part message="Application deployed with name app.">
    <property name="name" value="app"/>
  </message-part>
</action-report>"#;

fn target_for(server: &MockServer) -> ServerTarget {
    let address = server.address();
    let mut target = ServerTarget::local("mock");
    target.host = address.ip().to_string();
    target.admin_port = address.port();
    target
}

fn deploy_request(operation_path: &str) -> TransportRequest {
    TransportRequest {
        operation_path: operation_path.to_string(),
        content_type: REPORT_CONTENT_TYPE.to_string(),
        upload_file: None,
    }
}

#[tokio::test]
async fn test_success_report_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/__asadmin/deploy"))
        .and(query_param("force", "true"))
        .and(query_param("DEFAULT", "/srv/app/app.war"))
        .and(query_param("name", "app"))
        .and(header("accept", "application/xml"))
        .and(header_exists("x-requested-by"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEPLOYED))
        .expect(1)
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport
        .invoke(deploy_request(
            "deploy?force=true&DEFAULT=%2Fsrv%2Fapp%2Fapp.war&name=app",
        ))
        .await;

    match result {
        InvocationResult::Completed(report) => assert_eq!(report.property("name"), Some("app")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_report_uses_server_message() {
    let server = MockServer::start().await;
    let body = r#"<action-report exit-code="FAILURE"><message-part message="Archive not found"/></action-report>"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport.invoke(deploy_request("deploy?force=true&name=app")).await;

    assert_eq!(
        result,
        InvocationResult::Failed {
            status: Some(500),
            message: "Archive not found".to_string(),
        }
    );
}

#[tokio::test]
async fn test_failed_command_with_ok_status_is_a_failure() {
    let server = MockServer::start().await;
    let body = r#"<action-report exit-code="FAILURE"><message-part message="Invalid option"/></action-report>"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport.invoke(deploy_request("deploy?force=true&name=app")).await;

    assert!(matches!(
        result,
        InvocationResult::Failed { status: Some(200), ref message } if message == "Invalid option"
    ));
}

#[tokio::test]
async fn test_plain_text_success_is_unreadable_not_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Command deploy executed successfully."),
        )
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport.invoke(deploy_request("deploy?force=true&name=app")).await;

    assert!(matches!(
        result,
        InvocationResult::Unreadable { status: 200, .. }
    ));
}

#[tokio::test]
async fn test_unparseable_body_is_reported_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport.invoke(deploy_request("deploy?force=true&name=app")).await;

    assert_eq!(
        result,
        InvocationResult::Failed {
            status: Some(401),
            message: "Unauthorized".to_string(),
        }
    );
}

#[tokio::test]
async fn test_upload_streams_file_with_credentials() {
    let server = MockServer::start().await;
    let mut artifact = tempfile::NamedTempFile::new().unwrap();
    artifact.write_all(b"PK\x03\x04 war bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/__asadmin/deploy"))
        .and(query_param("upload", "true"))
        .and(header("content-type", "application/octet-stream"))
        // admin:secret
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .and(body_bytes(b"PK\x03\x04 war bytes".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEPLOYED))
        .expect(1)
        .mount(&server)
        .await;

    let mut target = target_for(&server);
    target.username = Some("admin".to_string());
    target.password = Some(SecretString::from("secret".to_string()));

    let transport = RestTransport::new(&target, Duration::from_secs(5)).unwrap();
    let result = transport
        .invoke(TransportRequest {
            operation_path: "deploy?force=true&upload=true&name=app".to_string(),
            content_type: REPORT_CONTENT_TYPE.to_string(),
            upload_file: Some(artifact.path().to_path_buf()),
        })
        .await;

    assert!(matches!(result, InvocationResult::Completed(_)));
}

#[tokio::test]
async fn test_missing_upload_file_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEPLOYED))
        .expect(0)
        .mount(&server)
        .await;

    let transport = RestTransport::new(&target_for(&server), Duration::from_secs(5)).unwrap();
    let result = transport
        .invoke(TransportRequest {
            operation_path: "deploy?force=true&upload=true&name=app".to_string(),
            content_type: REPORT_CONTENT_TYPE.to_string(),
            upload_file: Some("/nonexistent/app.war".into()),
        })
        .await;

    assert!(matches!(result, InvocationResult::Failed { status: None, .. }));
}

#[test]
fn test_endpoint_url() {
    let mut target = ServerTarget::local("local");
    target.https = true;
    let transport = RestTransport::new(&target, Duration::from_secs(5)).unwrap();
    let url = transport
        .endpoint("deploy?force=true&DEFAULT=%2Fa%2Fb.war&name=b")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://localhost:4848/__asadmin/deploy?force=true&DEFAULT=%2Fa%2Fb.war&name=b"
    );
}
