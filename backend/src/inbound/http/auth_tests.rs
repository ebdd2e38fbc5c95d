//! Tests for account HTTP handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{FixtureWeatherCache, FixtureWeatherSource};
use crate::domain::{FavouriteLocationsService, WeatherCachePolicy, WeatherService};
use crate::inbound::http::locations::{add_location, list_locations};
use crate::inbound::http::test_utils::test_session_middleware;
use crate::test_support::accounts::in_memory_account_service;
use crate::test_support::weather::InMemoryFavourites;

fn state() -> HttpState {
    let weather = WeatherService::new(
        Arc::new(FixtureWeatherCache::default()),
        Arc::new(FixtureWeatherSource),
        WeatherCachePolicy::default(),
    );
    HttpState::new(
        Arc::new(weather),
        Arc::new(FavouriteLocationsService::new(Arc::new(
            InMemoryFavourites::new(),
        ))),
        in_memory_account_service(),
    )
}

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state()))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(signup)
                        .service(login)
                        .service(logout),
                )
                .service(add_location)
                .service(list_locations),
        )
}

fn session_cookie(response: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

fn post(uri: &str, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request()
}

fn ada_signup() -> Value {
    json!({"email": "Ada@Example.com", "name": "Ada Lovelace", "password": "secret1"})
}

#[actix_web::test]
async fn signup_signs_the_new_account_in() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(&app, post("/api/v1/auth/signup", ada_signup())).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).expect("session cookie");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["name"], "Ada Lovelace");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let added = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/locations")
            .cookie(cookie)
            .set_json(json!({"city": "Lisbon"}))
            .to_request(),
    )
    .await;
    assert_eq!(added.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn second_signup_with_the_same_email_is_a_conflict() {
    let app = actix_test::init_service(test_app()).await;
    actix_test::call_service(&app, post("/api/v1/auth/signup", ada_signup())).await;

    let response = actix_test::call_service(
        &app,
        post(
            "/api/v1/auth/signup",
            json!({"email": "ada@example.com", "name": "Impostor", "password": "another1"}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Email is already registered");
}

#[rstest]
#[case::short_password(
    json!({"email": "ada@example.com", "name": "Ada", "password": "12345"}),
    "password",
    "password_too_short"
)]
#[case::bad_email(
    json!({"email": "ada", "name": "Ada", "password": "secret1"}),
    "email",
    "invalid_email"
)]
#[case::blank_name(
    json!({"email": "ada@example.com", "name": " ", "password": "secret1"}),
    "name",
    "empty_name"
)]
#[actix_web::test]
async fn invalid_signup_is_a_bad_request(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(&app, post("/api/v1/auth/signup", payload)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case::right_password("secret1", StatusCode::OK)]
#[case::wrong_password("secret2", StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn login_checks_the_stored_password(#[case] password: &str, #[case] expected: StatusCode) {
    let app = actix_test::init_service(test_app()).await;
    actix_test::call_service(&app, post("/api/v1/auth/signup", ada_signup())).await;

    let response = actix_test::call_service(
        &app,
        post(
            "/api/v1/auth/login",
            json!({"email": "ada@example.com", "password": password}),
        ),
    )
    .await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::OK {
        assert!(session_cookie(&response).is_some());
    } else {
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[actix_web::test]
async fn unknown_email_cannot_log_in() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        post(
            "/api/v1/auth/login",
            json!({"email": "nobody@example.com", "password": "secret1"}),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = actix_test::init_service(test_app()).await;
    let signed_up =
        actix_test::call_service(&app, post("/api/v1/auth/signup", ada_signup())).await;
    let cookie = session_cookie(&signed_up).expect("session cookie");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&response).expect("removal cookie");

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/locations")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::UNAUTHORIZED);
}
