use std::time::Duration;

use room_service_registry::states::Unregistered;
use room_service_registry::{run_until_shutdown, Client, Outcome, RegistrationState};
use room_service_test_helpers::fake_registry::FakeRegistry;
use tokio_util::sync::CancellationToken;

use super::{builder, fast_timing, transport, APP_NAME};

#[tokio::test]
async fn it_should_register_after_the_registry_recovers_and_deregister_on_shutdown() {
    let registry = FakeRegistry::start().await;
    registry.reject_next_registrations(2);

    let client = Client::new(transport(&registry.base_url()), fast_timing());
    let mut state = client.subscribe();
    let shutdown = CancellationToken::new();

    let lifecycle = tokio::spawn(run_until_shutdown(Unregistered::new(client.clone(), builder()), shutdown.clone()));

    state
        .wait_for(|state| *state == RegistrationState::Registered)
        .await
        .unwrap();

    assert_eq!(registry.requests_with_method("POST").len(), 3);

    let instance_keys = registry.instance_keys(APP_NAME);
    assert_eq!(instance_keys.len(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;

    shutdown.cancel();

    let Outcome::Deregistered(deregistered) = lifecycle.await.unwrap() else {
        panic!("the instance should have been registered");
    };

    let instance_key = deregistered.identity().instance_key();
    let instance_path = format!("/eureka/apps/{APP_NAME}/{instance_key}");

    assert_eq!(instance_keys, vec![instance_key]);
    assert!(deregistered.acknowledged());
    assert!(deregistered.heartbeats() >= 1);
    assert!(registry.instance_keys(APP_NAME).is_empty());
    assert_eq!(client.state(), RegistrationState::Deregistered);

    let deregistrations = registry.requests_with_method("DELETE");
    assert_eq!(deregistrations.len(), 1);
    assert_eq!(deregistrations[0].path, instance_path);

    let heartbeats = registry.requests_with_method("PUT");
    assert!(heartbeats.iter().all(|request| request.path == instance_path));

    let last = registry.requests().last().cloned().unwrap();
    assert_eq!(last.method, "DELETE");

    registry.stop().await;
}
