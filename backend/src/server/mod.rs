//! HTTP server assembly: session cookie, throttling, routes and health checks.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{build_adapters, build_services};

use std::num::NonZeroU32;
use std::time::Duration;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, Scope, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;
#[cfg(debug_assertions)]
use weather_gateway::doc::ApiDoc;
use weather_gateway::inbound::graphql::{GatewaySchema, build_schema, graphql_resource};
use weather_gateway::inbound::http::auth::{login, logout, signup};
use weather_gateway::inbound::http::health::{HealthState, live, ready};
use weather_gateway::inbound::http::locations::{add_location, delete_location, list_locations};
use weather_gateway::inbound::http::state::HttpState;
use weather_gateway::inbound::http::weather::{current_weather, forecast};
use weather_gateway::middleware::{Throttle, ThrottlePolicy};
use weather_gateway::Trace;

/// Name and lifetime of the cookie set at signup or login.
const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Signup and login attempts per client, on top of the global throttle.
const AUTH_ATTEMPTS_PER_HOUR: NonZeroU32 = match NonZeroU32::new(6) {
    Some(attempts) => attempts,
    None => NonZeroU32::MIN,
};
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

/// Cookie parameters shared by every worker.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

fn session_middleware(cookie: SessionCookie) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), cookie.key)
        .cookie_name(SESSION_COOKIE.into())
        .cookie_path("/".into())
        .cookie_secure(cookie.secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(cookie.same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(CookieDuration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Limiters shared by every worker.
#[derive(Clone)]
struct Throttles {
    global: Throttle,
    auth: Throttle,
}

impl Throttles {
    fn new(policy: ThrottlePolicy) -> Self {
        Self {
            global: Throttle::new(policy),
            auth: Throttle::new(ThrottlePolicy::new(AUTH_ATTEMPTS_PER_HOUR, ONE_HOUR)),
        }
    }
}

/// Versioned API routes. Weather routes are public, location routes check the
/// session themselves.
fn api_scope(auth_throttle: Throttle) -> Scope {
    // `forecast` first, otherwise "/weather/forecast/x" never matches.
    web::scope("/api/v1")
        .service(
            web::scope("/auth")
                .wrap(auth_throttle)
                .service(signup)
                .service(login)
                .service(logout),
        )
        .service(forecast)
        .service(current_weather)
        .service(add_location)
        .service(list_locations)
        .service(delete_location)
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    schema: web::Data<GatewaySchema>,
    cookie: SessionCookie,
    throttles: Throttles,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(schema)
        .wrap(Trace)
        .service(
            api_scope(throttles.auth)
                .wrap(session_middleware(cookie.clone()))
                .wrap(throttles.global.clone()),
        )
        .service(
            graphql_resource()
                .wrap(session_middleware(cookie))
                .wrap(throttles.global),
        )
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the gateway's HTTP server and flag it as ready.
///
/// # Errors
/// Returns the [`std::io::Error`] raised when the address cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let schema = web::Data::new(build_schema(http_state.clone()));
    let http_state = web::Data::new(http_state);
    let throttles = Throttles::new(config.throttle);
    let bind_addr = config.bind_addr();
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };

    let health = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            health.clone(),
            http_state.clone(),
            schema.clone(),
            cookie.clone(),
            throttles.clone(),
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
