use room_service::servers::status_api::resources::{Info, Report};
use room_service_registry::RegistrationState;
use room_service_test_helpers::configuration;
use serde_json::{json, Value};

use super::environment::{Environment, Running};

#[tokio::test]
async fn it_should_serve_an_empty_json_object_as_home_page() {
    let env = Environment::<Running>::new(&configuration::ephemeral().service).await;

    let response = reqwest::get(env.url("/")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({}));

    env.stop().await;
}

#[tokio::test]
async fn it_should_report_the_service_as_up() {
    let env = Environment::<Running>::new(&configuration::ephemeral().service).await;

    let response = reqwest::get(env.url("/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Report>().await.unwrap(), Report::up());

    env.stop().await;
}

#[tokio::test]
async fn it_should_report_the_current_registration_state() {
    let config = configuration::ephemeral();
    let env = Environment::<Running>::new(&config.service).await;

    let before: Info = reqwest::get(env.url("/info")).await.unwrap().json().await.unwrap();

    env.registration.send_replace(RegistrationState::Registered);

    let after: Info = reqwest::get(env.url("/info")).await.unwrap().json().await.unwrap();

    assert_eq!(before.app, config.service.app_name);
    assert_eq!(before.registration, "unregistered");
    assert_eq!(after.registration, "registered");

    env.stop().await;
}

#[tokio::test]
async fn it_should_return_a_request_id_with_every_response() {
    let env = Environment::<Running>::new(&configuration::ephemeral().service).await;

    let response = reqwest::get(env.url("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));

    env.stop().await;
}

#[tokio::test]
async fn it_should_stop_serving_once_shut_down() {
    let env = Environment::<Running>::new(&configuration::ephemeral().service).await;
    let url = env.url("/health");

    env.stop().await;

    assert!(reqwest::get(url).await.is_err());
}
