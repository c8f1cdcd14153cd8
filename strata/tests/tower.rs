#![cfg(feature = "tower")]

use http::{Request, StatusCode};
use strata::{Handler, actions::render, tower::HandlerService};
use tower::{ServiceBuilder, ServiceExt};

mod common;
use common::templates;

fn handler() -> Handler {
    Handler::new()
        .with_template_store(templates().unwrap())
        .with_action(render("inner", "layout"))
}

#[tokio::test]
async fn test_handler_service_oneshot() {
    let service = HandlerService::new(handler());

    let response = service
        .oneshot(Request::get("/").body(()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_slice(), b"LAYOUT: INNER");
}

#[tokio::test]
async fn test_handler_service_failure_is_a_response() {
    let service = HandlerService::new(Handler::new());

    let response = service
        .oneshot(Request::get("/").body(()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_handler_service_behind_layers() {
    let service = ServiceBuilder::new()
        .map_response(|response: http::Response<Vec<u8>>| response.status())
        .service(HandlerService::new(handler()));

    let status = service
        .oneshot(Request::get("/").body(()).unwrap())
        .await
        .unwrap();

    assert_eq!(status, StatusCode::OK);
}
