//! Tests for the GraphQL endpoint.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{FixtureWeatherCache, WeatherSourceError};
use crate::domain::{FavouriteLocationsService, WeatherCachePolicy, WeatherService};
use crate::inbound::http::test_utils::{login_cookie, session_login_route, test_session_middleware};
use crate::test_support::accounts::in_memory_account_service;
use crate::test_support::weather::{InMemoryFavourites, ScriptedWeatherSource};

const ALICE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn schema() -> GatewaySchema {
    let source = ScriptedWeatherSource::new()
        .failing_for("Atlantis", WeatherSourceError::not_found("Atlantis"))
        .failing_for(
            "Gotham",
            WeatherSourceError::upstream_unavailable("upstream said: maintenance"),
        );
    let weather = WeatherService::new(
        Arc::new(FixtureWeatherCache::default()),
        Arc::new(source),
        WeatherCachePolicy::default(),
    );
    build_schema(HttpState::new(
        Arc::new(weather),
        Arc::new(FavouriteLocationsService::new(Arc::new(
            InMemoryFavourites::new(),
        ))),
        in_memory_account_service(),
    ))
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
        .app_data(web::Data::new(schema()))
        .wrap(test_session_middleware())
        .service(session_login_route())
        .service(graphql_resource())
}

async fn execute(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    cookie: Option<&Cookie<'static>>,
    query: &str,
) -> Value {
    let mut request = actix_test::TestRequest::post()
        .uri(GRAPHQL_PATH)
        .set_json(json!({ "query": query }));
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    actix_test::read_body_json(response).await
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[actix_web::test]
async fn get_serves_the_explorer() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(GRAPHQL_PATH).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    assert!(std::str::from_utf8(&body).expect("utf8").contains("graphiql"));
}

#[actix_web::test]
async fn known_city_returns_the_snapshot() {
    let app = actix_test::init_service(test_app()).await;

    let body = execute(&app, None, r#"{ getWeather(input: {city: "Lisbon"}) }"#).await;

    assert!(body.get("errors").is_none(), "unexpected errors: {body}");
    assert_eq!(body["data"]["getWeather"]["name"], "Lisbon");
}

#[actix_web::test]
async fn forecast_is_served() {
    let app = actix_test::init_service(test_app()).await;

    let body = execute(&app, None, r#"{ getForecast(input: {city: "Lisbon"}) }"#).await;

    assert_eq!(body["data"]["getForecast"]["city"]["name"], "Lisbon");
}

#[rstest]
#[case::unknown_city("Atlantis", "City 'Atlantis' not found", "NOT_FOUND", 404)]
#[case::provider_down(
    "Gotham",
    "Weather service temporarily unavailable",
    "BAD_GATEWAY",
    502
)]
#[actix_web::test]
async fn weather_failures_carry_status_extensions(
    #[case] city: &str,
    #[case] message: &str,
    #[case] code: &str,
    #[case] status: u16,
) {
    let app = actix_test::init_service(test_app()).await;

    let body = execute(
        &app,
        None,
        &format!(r#"{{ getWeather(input: {{city: "{city}"}}) }}"#),
    )
    .await;

    let error = first_error(&body);
    assert_eq!(error["message"], message);
    assert_eq!(error["extensions"]["code"], code);
    assert_eq!(error["extensions"]["httpStatus"], status);
}

#[actix_web::test]
async fn invalid_city_reports_bad_request_status() {
    let app = actix_test::init_service(test_app()).await;

    let body = execute(&app, None, r#"{ getForecast(input: {city: "X"}) }"#).await;

    assert_eq!(first_error(&body)["extensions"]["httpStatus"], 400);
}

#[rstest]
#[case::list("{ getFavoriteLocations { id city } }")]
#[case::add(r#"mutation { favoriteLocation(input: {city: "Lisbon"}) }"#)]
#[case::delete("mutation { deleteFavoriteLocation(id: 1) }")]
#[actix_web::test]
async fn favourites_require_a_session(#[case] query: &str) {
    let app = actix_test::init_service(test_app()).await;

    let body = execute(&app, None, query).await;

    let error = first_error(&body);
    assert_eq!(error["message"], "login required");
    assert_eq!(error["extensions"]["code"], "UNAUTHORIZED");
    assert_eq!(error["extensions"]["httpStatus"], 401);
}

#[actix_web::test]
async fn favourites_round_trip_for_the_viewer() {
    let app = actix_test::init_service(test_app()).await;
    let cookie = login_cookie(&app, ALICE).await;

    let added = execute(
        &app,
        Some(&cookie),
        r#"mutation { favoriteLocation(input: {city: "Lisbon"}) }"#,
    )
    .await;
    assert_eq!(
        added["data"]["favoriteLocation"],
        "Location added successfully to favorites"
    );

    let duplicate = execute(
        &app,
        Some(&cookie),
        r#"mutation { favoriteLocation(input: {city: "Lisbon"}) }"#,
    )
    .await;
    assert_eq!(
        first_error(&duplicate)["extensions"]["code"],
        "DATA_EXISTS_ALREADY"
    );

    let listed = execute(
        &app,
        Some(&cookie),
        "{ getFavoriteLocations { id city createdAt } }",
    )
    .await;
    let locations = listed["data"]["getFavoriteLocations"]
        .as_array()
        .expect("list of locations");
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["city"], "Lisbon");
    let id = locations[0]["id"].as_i64().expect("numeric id");

    let deleted = execute(
        &app,
        Some(&cookie),
        &format!("mutation {{ deleteFavoriteLocation(id: {id}) }}"),
    )
    .await;
    assert_eq!(
        deleted["data"]["deleteFavoriteLocation"],
        "Location deleted successfully"
    );

    let again = execute(
        &app,
        Some(&cookie),
        &format!("mutation {{ deleteFavoriteLocation(id: {id}) }}"),
    )
    .await;
    assert_eq!(first_error(&again)["extensions"]["code"], "NOT_FOUND");
}
