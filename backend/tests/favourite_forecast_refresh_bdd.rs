//! Behaviour-driven tests for the favourite forecast refresher.
//!
//! These scenarios run a single refresh pass against in-memory favourites, a
//! scripted provider and a recording cache, then check which forecasts were
//! cached and what the run reported.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;
use weather_gateway::domain::ports::{
    FavouriteLocationRepositoryError, FixtureWeatherCache, WeatherSourceError,
};
use weather_gateway::domain::{
    FavouriteForecastRefresher, FavouriteForecastRefresherPorts, ForecastSnapshot, RefreshError,
    RefreshReport, WeatherCachePolicy, WeatherService,
};
use weather_gateway::test_support::weather::{InMemoryFavourites, ScriptedWeatherSource};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

#[derive(Default, ScenarioState)]
struct RefreshWorld {
    favourites: Slot<Vec<String>>,
    unknown_cities: Slot<Vec<String>>,
    store_unavailable: Slot<bool>,
    cache: Slot<Arc<FixtureWeatherCache>>,
    source: Slot<Arc<ScriptedWeatherSource>>,
    outcome: Slot<Result<RefreshReport, RefreshError>>,
}

impl RefreshWorld {
    fn build_favourites(&self) -> InMemoryFavourites {
        let store = InMemoryFavourites::with_cities(self.favourites.get().unwrap_or_default());
        if self.store_unavailable.get().unwrap_or(false) {
            store.failing_listing(FavouriteLocationRepositoryError::connection(
                "connection refused",
            ))
        } else {
            store
        }
    }

    fn build_source(&self) -> ScriptedWeatherSource {
        self.unknown_cities
            .get()
            .unwrap_or_default()
            .into_iter()
            .fold(ScriptedWeatherSource::new(), |source, city| {
                let error = WeatherSourceError::not_found(city.clone());
                source.failing_for(city, error)
            })
    }

    fn run_refresh(&self) {
        let cache = Arc::new(FixtureWeatherCache::default());
        let source = Arc::new(self.build_source());
        let policy = WeatherCachePolicy::default();
        let weather = Arc::new(WeatherService::new(cache.clone(), source.clone(), policy));
        let refresher = FavouriteForecastRefresher::new(
            FavouriteForecastRefresherPorts {
                weather,
                favourites: Arc::new(self.build_favourites()),
                cache: cache.clone(),
            },
            policy,
        );

        let runtime = Runtime::new().expect("create runtime");
        let outcome = runtime.block_on(refresher.run_once());

        self.cache.set(cache);
        self.source.set(source);
        self.outcome.set(outcome);
    }

    fn report(&self) -> RefreshReport {
        match self.outcome.get().expect("refresh should have run") {
            Ok(report) => report,
            Err(err) => panic!("expected a report, got error: {err}"),
        }
    }
}

/// Split `"London, Atlantis and Paris"` into its city names.
fn city_list(raw: &str) -> Vec<String> {
    raw.split(", ")
        .flat_map(|part| part.split(" and "))
        .map(|city| city.trim().trim_matches('"').to_owned())
        .filter(|city| !city.is_empty())
        .collect()
}

#[fixture]
fn world() -> RefreshWorld {
    RefreshWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("favourites for {cities}")]
fn favourites_for(world: &RefreshWorld, cities: String) {
    world.favourites.set(city_list(&cities));
}

#[given("the provider does not know {city}")]
fn the_provider_does_not_know(world: &RefreshWorld, city: String) {
    let mut unknown = world.unknown_cities.get().unwrap_or_default();
    unknown.push(city.trim_matches('"').to_owned());
    world.unknown_cities.set(unknown);
}

#[given("the favourites store is unavailable")]
fn the_favourites_store_is_unavailable(world: &RefreshWorld) {
    world.store_unavailable.set(true);
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the forecast refresh runs")]
fn the_forecast_refresh_runs(world: &RefreshWorld) {
    world.run_refresh();
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("forecasts for {cities} are cached")]
fn forecasts_are_cached(world: &RefreshWorld, cities: String) {
    let cache = world.cache.get().expect("cache should be recorded");
    let policy = WeatherCachePolicy::default();

    for city in city_list(&cities) {
        let (payload, ttl) = cache
            .entry(&format!("forecast_{city}"))
            .unwrap_or_else(|| panic!("forecast for {city} should be cached"));
        let forecast: ForecastSnapshot =
            serde_json::from_str(&payload).expect("cached forecast is valid JSON");
        let cached_city = forecast.city.expect("forecast names its city");
        assert_eq!(cached_city.name, city);
        assert_eq!(ttl, policy.forecast_ttl);
    }
}

#[then("the refresh report lists no failures")]
fn the_refresh_report_lists_no_failures(world: &RefreshWorld) {
    let report = world.report();
    assert!(report.failures.is_empty(), "unexpected failures: {report:?}");
    assert_eq!(report.refreshed, world.favourites.get().unwrap_or_default());
}

#[then("the refresh report lists {city} as failed")]
fn the_refresh_report_lists_city_as_failed(world: &RefreshWorld, city: String) {
    let city = city.trim_matches('"');
    let report = world.report();

    let failed: Vec<&str> = report.failures.iter().map(|f| f.city.as_str()).collect();
    assert_eq!(failed, vec![city]);
    assert!(!report.refreshed.iter().any(|refreshed| refreshed == city));
    assert_eq!(report.attempted(), world.favourites.get().unwrap_or_default().len());

    let cache = world.cache.get().expect("cache should be recorded");
    assert!(cache.entry(&format!("forecast_{city}")).is_none());
}

#[then("the refresh fails without calling the provider")]
fn the_refresh_fails_without_calling_the_provider(world: &RefreshWorld) {
    let outcome = world.outcome.get().expect("refresh should have run");
    assert!(
        matches!(outcome, Err(RefreshError::ListCities(_))),
        "expected listing failure, got {outcome:?}"
    );

    let source = world.source.get().expect("source should be recorded");
    assert!(source.calls().is_empty());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/favourite_forecast_refresh.feature",
    name = "Every favourited city is refreshed"
)]
fn every_favourited_city_is_refreshed(world: RefreshWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/favourite_forecast_refresh.feature",
    name = "One failing city does not stop the others"
)]
fn one_failing_city_does_not_stop_the_others(world: RefreshWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/favourite_forecast_refresh.feature",
    name = "The run is aborted when favourites cannot be listed"
)]
fn run_is_aborted_when_favourites_cannot_be_listed(world: RefreshWorld) {
    let _ = world;
}
