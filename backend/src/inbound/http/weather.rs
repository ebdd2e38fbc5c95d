//! Weather lookup HTTP handlers.
//!
//! ```text
//! GET /api/v1/weather/{city}
//! GET /api/v1/weather/forecast/{city}
//! ```
//!
//! Both read through the weather cache. The HTTP surface never forces a
//! refresh; that is reserved for the favourites refresher.

use actix_web::{get, web};

use crate::domain::{ForecastOptions, ForecastSnapshot, WeatherSnapshot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CITY_FIELD, parse_city};

/// Current conditions for a city.
#[utoipa::path(
    get,
    path = "/api/v1/weather/{city}",
    params(("city" = String, Path, description = "City name, 2 to 60 characters")),
    responses(
        (status = 200, description = "Current weather", body = WeatherSnapshot),
        (status = 400, description = "Invalid city", body = ErrorSchema),
        (status = 404, description = "Unknown city", body = ErrorSchema),
        (status = 502, description = "Weather provider unavailable", body = ErrorSchema),
        (status = 500, description = "Unexpected error", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "getCurrentWeather",
    security([])
)]
#[get("/weather/{city}")]
pub async fn current_weather(
    state: web::Data<HttpState>,
    city: web::Path<String>,
) -> ApiResult<web::Json<WeatherSnapshot>> {
    let city = parse_city(city.into_inner(), CITY_FIELD)?;
    let snapshot = state.weather.current_weather(&city).await?;
    Ok(web::Json(snapshot))
}

/// Five-day forecast for a city.
#[utoipa::path(
    get,
    path = "/api/v1/weather/forecast/{city}",
    params(("city" = String, Path, description = "City name, 2 to 60 characters")),
    responses(
        (status = 200, description = "Forecast", body = ForecastSnapshot),
        (status = 400, description = "Invalid city", body = ErrorSchema),
        (status = 404, description = "Unknown city", body = ErrorSchema),
        (status = 502, description = "Weather provider unavailable", body = ErrorSchema),
        (status = 500, description = "Unexpected error", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "getWeatherForecast",
    security([])
)]
#[get("/weather/forecast/{city}")]
pub async fn forecast(
    state: web::Data<HttpState>,
    city: web::Path<String>,
) -> ApiResult<web::Json<ForecastSnapshot>> {
    let city = parse_city(city.into_inner(), CITY_FIELD)?;
    let snapshot = state
        .weather
        .forecast(&city, ForecastOptions::default())
        .await?;
    Ok(web::Json(snapshot))
}

#[cfg(test)]
#[path = "weather_tests.rs"]
mod tests;
