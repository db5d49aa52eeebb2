use room_service_registry::action::JSON_UTF8;
use room_service_registry::{Error, RegistryTransport};
use room_service_test_helpers::configuration::unreachable_registry;
use room_service_test_helpers::fake_registry::FakeRegistry;

use super::{builder, transport, APP_NAME};

#[tokio::test]
async fn it_should_find_the_registered_instance_with_the_generated_instance_id() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());
    let identity = builder().build();

    assert!(transport.register(&identity.to_document()).await);

    let instances = transport.query_instances(APP_NAME).await.unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].id(), Some(identity.metadata_instance_id().as_str()));
    assert_eq!(instances[0].ip_addr, "10.0.0.5");
    assert_eq!(instances[0].port.map(|port| port.port), Some(8096));

    registry.stop().await;
}

#[tokio::test]
async fn it_should_list_the_registered_applications() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());

    assert!(transport.register(&builder().build().to_document()).await);

    let applications = transport.query_applications().await.unwrap();

    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].name, APP_NAME);
    assert_eq!(applications[0].instance.len(), 1);

    registry.stop().await;
}

#[tokio::test]
async fn it_should_renew_the_lease_of_a_registered_instance() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());
    let identity = builder().build();

    assert!(transport.register(&identity.to_document()).await);
    assert!(transport.heartbeat(&identity).await);

    let heartbeats = registry.requests_with_method("PUT");

    assert_eq!(heartbeats.len(), 1);
    assert_eq!(heartbeats[0].path, format!("/eureka/apps/{APP_NAME}/{}", identity.instance_key()));

    registry.stop().await;
}

#[tokio::test]
async fn it_should_report_a_heartbeat_for_an_unknown_instance_as_failed() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());

    assert!(!transport.heartbeat(&builder().build()).await);

    registry.stop().await;
}

#[tokio::test]
async fn it_should_not_change_the_registry_when_deregistering_twice() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());
    let identity = builder().build();
    let other = builder().build();

    assert!(transport.register(&identity.to_document()).await);
    assert!(transport.register(&other.to_document()).await);

    assert!(transport.deregister(&identity).await);
    let after_first = registry.instance_keys(APP_NAME);

    assert!(!transport.deregister(&identity).await);
    let after_second = registry.instance_keys(APP_NAME);

    assert_eq!(after_first, vec![other.instance_key()]);
    assert_eq!(after_second, after_first);

    registry.stop().await;
}

#[tokio::test]
async fn it_should_return_an_error_when_the_registry_answers_with_malformed_json() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());

    assert!(transport.register(&builder().build().to_document()).await);
    registry.serve_malformed_json(true);

    let instances = transport.query_instances(APP_NAME).await;
    let applications = transport.query_applications().await;

    assert!(matches!(instances, Err(Error::MalformedResponse { .. })));
    assert!(matches!(applications, Err(Error::MalformedResponse { .. })));

    registry.stop().await;
}

#[tokio::test]
async fn it_should_return_an_error_when_querying_an_unknown_application() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());

    let result = transport.query_instances("nobody").await;

    assert!(matches!(result, Err(Error::UnexpectedStatus { status, .. }) if status == reqwest::StatusCode::NOT_FOUND));

    registry.stop().await;
}

#[tokio::test]
async fn it_should_report_failures_instead_of_raising_when_the_registry_is_unreachable() {
    let transport = transport(&unreachable_registry());
    let identity = builder().build();

    assert!(!transport.register(&identity.to_document()).await);
    assert!(!transport.heartbeat(&identity).await);
    assert!(!transport.deregister(&identity).await);
    assert!(matches!(
        transport.query_instances(APP_NAME).await,
        Err(Error::RequestFailed { .. })
    ));
}

#[tokio::test]
async fn it_should_send_json_content_type_and_accept_on_every_request() {
    let registry = FakeRegistry::start().await;
    let transport = transport(&registry.base_url());
    let identity = builder().build();

    assert!(transport.register(&identity.to_document()).await);
    transport.query_instances(APP_NAME).await.unwrap();
    transport.query_applications().await.unwrap();
    assert!(transport.heartbeat(&identity).await);
    assert!(transport.deregister(&identity).await);

    let requests = registry.requests();

    assert_eq!(requests.len(), 5);

    for request in &requests {
        assert_eq!(request.content_type.as_deref(), Some(JSON_UTF8), "{} {}", request.method, request.path);
        assert_eq!(request.accept.as_deref(), Some(JSON_UTF8), "{} {}", request.method, request.path);
    }

    registry.stop().await;
}
