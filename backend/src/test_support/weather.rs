//! Weather test doubles: sample snapshots, a scripted provider and an
//! in-memory favourites store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    FavouriteLocationRepository, FavouriteLocationRepositoryError, WeatherSource,
    WeatherSourceError,
};
use crate::domain::{
    City, Clouds, Coordinates, FavouriteLocation, ForecastCity, ForecastItem, ForecastSnapshot,
    ForecastSystem, MainReadings, UserId, WeatherCondition, WeatherSnapshot, WeatherSystem, Wind,
};

/// Current conditions resembling a real `/weather` answer for `name`.
pub fn sample_weather(name: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        coord: Coordinates {
            lon: -0.1257,
            lat: 51.5085,
        },
        weather: vec![WeatherCondition {
            id: 803,
            main: "Clouds".to_owned(),
            description: "broken clouds".to_owned(),
            icon: "04d".to_owned(),
        }],
        base: "stations".to_owned(),
        main: MainReadings {
            temp: 14.2,
            feels_like: 13.6,
            temp_min: 12.9,
            temp_max: 15.4,
            pressure: 1012,
            humidity: 72,
            sea_level: Some(1012),
            grnd_level: Some(1008),
            temp_kf: None,
        },
        visibility: Some(10_000),
        wind: Wind {
            speed: 4.6,
            deg: 250,
            gust: None,
        },
        clouds: Clouds { all: 75 },
        dt: 1_726_660_758,
        sys: WeatherSystem {
            kind: Some(2),
            id: Some(2_075_535),
            country: Some("GB".to_owned()),
            sunrise: 1_726_637_825,
            sunset: 1_726_682_811,
        },
        timezone: 3600,
        id: 2_643_743,
        name: name.to_owned(),
        cod: 200,
    }
}

/// One-step forecast resembling a real `/forecast` answer for `name`.
pub fn sample_forecast(name: &str) -> ForecastSnapshot {
    ForecastSnapshot {
        cod: "200".to_owned(),
        message: 0.0,
        cnt: 1,
        list: vec![ForecastItem {
            dt: 1_726_671_600,
            main: MainReadings {
                temp: 15.1,
                feels_like: 14.5,
                temp_min: 15.1,
                temp_max: 16.0,
                pressure: 1013,
                humidity: 68,
                sea_level: Some(1013),
                grnd_level: Some(1009),
                temp_kf: Some(-0.9),
            },
            weather: vec![WeatherCondition {
                id: 500,
                main: "Rain".to_owned(),
                description: "light rain".to_owned(),
                icon: "10d".to_owned(),
            }],
            clouds: Clouds { all: 90 },
            wind: Wind {
                speed: 5.2,
                deg: 240,
                gust: Some(9.8),
            },
            visibility: Some(10_000),
            pop: 0.35,
            sys: ForecastSystem {
                pod: "d".to_owned(),
            },
            dt_txt: "2024-09-18 15:00:00".to_owned(),
        }],
        city: Some(ForecastCity {
            id: 2_643_743,
            name: name.to_owned(),
            coord: Coordinates {
                lon: -0.1257,
                lat: 51.5085,
            },
            country: Some("GB".to_owned()),
            population: Some(1_000_000),
            timezone: Some(3600),
            sunrise: Some(1_726_637_825),
            sunset: Some(1_726_682_811),
        }),
    }
}


fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Provider double answering every city with sample data, except the cities
/// scripted to fail.
#[derive(Default)]
pub struct ScriptedWeatherSource {
    failures: HashMap<String, WeatherSourceError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedWeatherSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request for `city` fail with `error`.
    pub fn failing_for(mut self, city: impl Into<String>, error: WeatherSourceError) -> Self {
        self.failures.insert(city.into(), error);
        self
    }

    /// Hold every request for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cities requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn answer<T>(
        &self,
        city: &City,
        build: impl FnOnce(&str) -> T,
    ) -> Result<T, WeatherSourceError> {
        lock(&self.calls).push(city.as_str().to_owned());
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.failures.get(city.as_str()) {
            Some(error) => Err(error.clone()),
            None => Ok(build(city.as_str())),
        }
    }
}

#[async_trait]
impl WeatherSource for ScriptedWeatherSource {
    async fn fetch_current(&self, city: &City) -> Result<WeatherSnapshot, WeatherSourceError> {
        self.answer(city, sample_weather).await
    }

    async fn fetch_forecast(&self, city: &City) -> Result<ForecastSnapshot, WeatherSourceError> {
        self.answer(city, sample_forecast).await
    }
}

/// Favourites store kept in memory.
///
/// `list_distinct_cities` returns cities in first-insertion order.
#[derive(Default)]
pub struct InMemoryFavourites {
    rows: Mutex<Vec<FavouriteLocation>>,
    next_id: AtomicUsize,
    listing_failure: Option<FavouriteLocationRepositoryError>,
}

impl InMemoryFavourites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one favourite per city, owned by a fresh random user each.
    pub fn with_cities<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new();
        for raw in cities {
            let city = match City::new(raw.as_ref()) {
                Ok(city) => city,
                Err(error) => panic!("seed city {:?} is invalid: {error}", raw.as_ref()),
            };
            store.push(UserId::random(), city);
        }
        store
    }

    /// Make `list_distinct_cities` fail with `error`.
    pub fn failing_listing(mut self, error: FavouriteLocationRepositoryError) -> Self {
        self.listing_failure = Some(error);
        self
    }

    fn push(&self, user: UserId, city: City) -> FavouriteLocation {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let location = FavouriteLocation {
            id: i64::try_from(id).unwrap_or(i64::MAX),
            user_id: user,
            city,
            created_at: Utc::now(),
        };
        lock(&self.rows).push(location.clone());
        location
    }
}

#[async_trait]
impl FavouriteLocationRepository for InMemoryFavourites {
    async fn insert(
        &self,
        user: &UserId,
        city: &City,
    ) -> Result<FavouriteLocation, FavouriteLocationRepositoryError> {
        let exists = lock(&self.rows)
            .iter()
            .any(|row| row.user_id == *user && row.city == *city);
        if exists {
            return Err(FavouriteLocationRepositoryError::duplicate());
        }
        Ok(self.push(*user, city.clone()))
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<FavouriteLocation>, FavouriteLocationRepositoryError> {
        let mut rows: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|row| row.user_id == *user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete(
        &self,
        user: &UserId,
        id: i64,
    ) -> Result<bool, FavouriteLocationRepositoryError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| !(row.user_id == *user && row.id == id));
        Ok(rows.len() != before)
    }

    async fn list_distinct_cities(&self) -> Result<Vec<String>, FavouriteLocationRepositoryError> {
        if let Some(error) = &self.listing_failure {
            return Err(error.clone());
        }
        let mut cities: Vec<String> = Vec::new();
        for row in lock(&self.rows).iter() {
            if !cities.iter().any(|seen| seen == row.city.as_str()) {
                cities.push(row.city.as_str().to_owned());
            }
        }
        Ok(cities)
    }
}
