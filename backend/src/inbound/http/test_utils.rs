//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, Resource, test, web};

use super::session::USER_ID_KEY;

/// Session middleware with a fresh key and the `Secure` flag disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Login shortcut for handler tests that do not exercise the account service:
/// stores the path segment as the session's `user_id`.
pub fn session_login_route() -> Resource {
    web::resource("/test-login/{user_id}").route(web::get().to(
        |session: Session, user_id: web::Path<String>| async move {
            session.insert(USER_ID_KEY, user_id.into_inner())?;
            Ok::<_, actix_web::Error>(HttpResponse::NoContent().finish())
        },
    ))
}

/// Log in through [`session_login_route`] and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    user_id: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test-login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
