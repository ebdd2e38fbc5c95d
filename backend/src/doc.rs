//! OpenAPI document for the gateway's REST surface.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccountProfile, Clouds, Coordinates, FavouriteLocation, ForecastCity, ForecastItem, ForecastSnapshot,
    ForecastSystem, MainReadings, WeatherCondition, WeatherSnapshot, WeatherSystem, Wind,
};
use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::locations::{AddLocationRequest, MessageResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Registers the session cookie set by signup and login.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/signup or /api/v1/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Weather gateway API",
        description = "Cached OpenWeather lookups and per-user favourite locations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::weather::current_weather,
        crate::inbound::http::weather::forecast,
        crate::inbound::http::locations::add_location,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        WeatherSnapshot,
        ForecastSnapshot,
        ForecastItem,
        ForecastCity,
        ForecastSystem,
        Coordinates,
        WeatherCondition,
        MainReadings,
        Wind,
        Clouds,
        WeatherSystem,
        FavouriteLocation,
        AddLocationRequest,
        MessageResponse,
        SignupRequest,
        LoginRequest,
        AccountProfile,
    )),
    tags(
        (name = "auth", description = "Account signup and session login"),
        (name = "weather", description = "Current weather and forecasts"),
        (name = "locations", description = "Favourite locations of the signed-in user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("code")]
    #[case("message")]
    #[case("traceId")]
    #[case("details")]
    fn error_schema_uses_wire_field_names(#[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, field);
    }

    #[rstest]
    #[case("/api/v1/weather/{city}")]
    #[case("/api/v1/weather/forecast/{city}")]
    #[case("/api/v1/locations")]
    #[case("/api/v1/locations/{id}")]
    #[case("/api/v1/auth/signup")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/auth/logout")]
    #[case("/health/ready")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn favourite_location_schema_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get("FavouriteLocation")
            .expect("FavouriteLocation schema");

        assert_object_schema_has_field(schema, "userId");
        assert_object_schema_has_field(schema, "createdAt");
    }

    #[rstest]
    fn signup_schema_documents_the_password_but_profile_does_not() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert_object_schema_has_field(schemas.get("SignupRequest").expect("signup"), "password");
        match schemas.get("AccountProfile").expect("AccountProfile schema") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(obj.properties.contains_key("email"));
                assert!(!obj.properties.contains_key("password"));
                assert!(!obj.properties.contains_key("passwordHash"));
            }
            _ => panic!("expected Object schema"),
        }
    }
}
