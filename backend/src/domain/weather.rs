//! Weather and forecast snapshots as returned by the upstream provider.
//!
//! Snapshots are cached whole: the serialised form written to the cache
//! deserialises back to a value equal to the one fetched.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geographic coordinates of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// Condition summary, e.g. `Clouds` / `broken clouds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherCondition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperature, pressure and humidity readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_kf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Wind {
    pub speed: f64,
    pub deg: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Clouds {
    pub all: i64,
}

/// Country and daylight metadata attached to current weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSystem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions for one city (`/weather`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSnapshot {
    pub coord: Coordinates,
    pub weather: Vec<WeatherCondition>,
    pub base: String,
    pub main: MainReadings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<i64>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt: i64,
    pub sys: WeatherSystem,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    pub cod: i64,
}

/// Part of day marker on forecast items: `d` or `n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSystem {
    pub pod: String,
}

/// One three-hour step of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<i64>,
    pub pop: f64,
    pub sys: ForecastSystem,
    pub dt_txt: String,
}

/// City block attached to a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub coord: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

/// Five-day forecast for one city (`/forecast`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSnapshot {
    pub cod: String,
    pub message: f64,
    pub cnt: i64,
    pub list: Vec<ForecastItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<ForecastCity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::weather::{sample_forecast, sample_weather};
    use serde_json::json;

    #[test]
    fn current_weather_parses_provider_payload() {
        let payload = json!({
            "coord": {"lon": 2.3488, "lat": 48.8534},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "base": "stations",
            "main": {"temp": 21.5, "feels_like": 21.0, "temp_min": 20.1, "temp_max": 22.8,
                     "pressure": 1018, "humidity": 48},
            "visibility": 10000,
            "wind": {"speed": 3.1, "deg": 40},
            "clouds": {"all": 0},
            "dt": 1726660758,
            "sys": {"type": 1, "id": 6550, "country": "FR", "sunrise": 1726637000, "sunset": 1726682000},
            "timezone": 7200,
            "id": 2988507,
            "name": "Paris",
            "cod": 200
        });

        let snapshot: WeatherSnapshot = serde_json::from_value(payload).expect("parse");
        assert_eq!(snapshot.name, "Paris");
        assert_eq!(snapshot.sys.kind, Some(1));
        assert_eq!(snapshot.main.sea_level, None);
    }

    #[test]
    fn snapshots_survive_text_round_trip() {
        let weather = sample_weather("London");
        let text = serde_json::to_string(&weather).expect("serialise");
        let back: WeatherSnapshot = serde_json::from_str(&text).expect("deserialise");
        assert_eq!(back, weather);

        let forecast = sample_forecast("London");
        let text = serde_json::to_string(&forecast).expect("serialise");
        let back: ForecastSnapshot = serde_json::from_str(&text).expect("deserialise");
        assert_eq!(back, forecast);
    }
}
