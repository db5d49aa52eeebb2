use axum::extract::State;
use axum::Json;

use super::resources::{Info, Report};
use super::routes::Status;

pub async fn info_handler(State(status): State<Status>) -> Json<Info> {
    Json(Info {
        app: status.app_name.to_string(),
        registration: status.registration.borrow().to_string(),
    })
}

pub async fn health_handler() -> Json<Report> {
    Json(Report::up())
}
