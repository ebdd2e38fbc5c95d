//! GraphQL adapter served at `/graphql`.
//!
//! ```text
//! POST /graphql {"query":"{ getWeather(input: {city: \"Lisbon\"}) }"}
//! ```
//!
//! Resolvers share [`HttpState`] with the REST handlers and read the caller
//! from the same session cookie. Failures are reported in the `errors` array
//! with the extensions built by [`error::into_graphql_error`].

pub mod error;
pub mod schema;

use actix_web::{HttpResponse, Resource, web};
use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::warn;

pub use error::{GraphQlErrorExtensions, GraphQlErrorPayload, graphql_error_code};
pub use schema::{MutationRoot, QueryRoot, Viewer};

use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const GRAPHQL_PATH: &str = "/graphql";

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Schema whose resolvers reach the services in `state`.
pub fn build_schema(state: HttpState) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// The `/graphql` resource: POST executes queries, GET serves the GraphiQL
/// explorer in debug builds.
pub fn graphql_resource() -> Resource {
    let resource = web::resource(GRAPHQL_PATH).route(web::post().to(graphql));
    #[cfg(debug_assertions)]
    let resource = resource.route(web::get().to(graphiql));
    resource
}

/// Execute one GraphQL request as the session's user.
pub async fn graphql(
    schema: web::Data<GatewaySchema>,
    session: SessionContext,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let viewer = match session.user_id() {
        Ok(user) => Viewer(user),
        Err(error) => {
            warn!(%error, "unreadable session; treating GraphQL caller as anonymous");
            Viewer(None)
        }
    };
    schema.execute(request.into_inner().data(viewer)).await.into()
}

/// GraphiQL explorer page.
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
