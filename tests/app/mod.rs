use std::time::Duration;

use room_service::app;
use room_service::servers::status_api::resources::Info;
use room_service_registry::Outcome;
use room_service_test_helpers::configuration;
use room_service_test_helpers::fake_registry::FakeRegistry;
use tokio_util::sync::CancellationToken;

async fn wait_until_registered(registry: &FakeRegistry, app_name: &str) -> String {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let Some(instance_key) = registry.instance_keys(app_name).pop() {
                return instance_key;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("the service should register")
}

#[tokio::test]
async fn it_should_register_serve_the_advertised_pages_and_deregister_on_shutdown() {
    let registry = FakeRegistry::start().await;
    let config = configuration::ephemeral_with_registry(&registry.base_url());
    let app_name = config.service.app_name.clone();
    let shutdown = CancellationToken::new();

    let running = app::start(&config, shutdown.clone()).await.unwrap();
    let status_api = running.status_api.local_addr;

    let instance_key = wait_until_registered(&registry, &app_name).await;

    assert!(instance_key.starts_with(&format!("127.0.0.1:{app_name}:")));

    let info: Info = reqwest::get(format!("http://{status_api}/info"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(info.app, app_name);
    assert_eq!(info.registration, "registered");

    shutdown.cancel();

    let Outcome::Deregistered(deregistered) = running.wait().await.unwrap() else {
        panic!("the service should have been registered");
    };

    assert_eq!(deregistered.identity().instance_key(), instance_key);
    assert!(deregistered.acknowledged());
    assert!(registry.instance_keys(&app_name).is_empty());
    assert!(reqwest::get(format!("http://{status_api}/health")).await.is_err());

    registry.stop().await;
}

#[tokio::test]
async fn it_should_keep_retrying_while_the_registry_is_unreachable_and_stop_on_shutdown() {
    let config = configuration::ephemeral_with_unreachable_registry();
    let shutdown = CancellationToken::new();

    let running = app::start(&config, shutdown.clone()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    shutdown.cancel();

    let outcome = running.wait().await.unwrap();

    assert!(matches!(outcome, Outcome::NeverRegistered { attempts } if attempts >= 2));
}

#[tokio::test]
async fn it_should_fail_to_start_when_the_status_api_address_is_taken() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

    let mut config = configuration::ephemeral_with_unreachable_registry();
    config.service.bind_address = taken.local_addr().unwrap();

    let result = app::start(&config, CancellationToken::new()).await;

    assert!(matches!(result, Err(app::Error::StatusApi { .. })));
}
