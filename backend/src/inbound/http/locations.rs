//! Favourite location HTTP handlers.
//!
//! ```text
//! POST   /api/v1/locations
//! GET    /api/v1/locations
//! DELETE /api/v1/locations/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, FavouriteLocation};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CITY_FIELD, missing_field_error, parse_city};

/// Request payload for bookmarking a city.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddLocationRequest {
    #[schema(example = "Lisbon")]
    pub city: Option<String>,
}

/// Confirmation body for mutations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

fn parse_location_id(raw: &str) -> Result<i64, Error> {
    raw.parse::<i64>().map_err(|_| {
        Error::invalid_request("id must be an integer").with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_id",
        }))
    })
}

/// Bookmark a city for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = AddLocationRequest,
    responses(
        (status = 201, description = "Location bookmarked", body = MessageResponse),
        (status = 400, description = "Invalid city", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Already bookmarked", body = ErrorSchema),
        (status = 503, description = "Favourites store unavailable", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "addFavouriteLocation"
)]
#[post("/locations")]
pub async fn add_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddLocationRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let raw = payload
        .into_inner()
        .city
        .ok_or_else(|| missing_field_error(CITY_FIELD))?;
    let city = parse_city(raw, CITY_FIELD)?;
    state.favourites.add(&user_id, &city).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(
        "Location added successfully to favorites",
    )))
}

/// List the authenticated user's favourites, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Favourite locations", body = [FavouriteLocation]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Favourites store unavailable", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listFavouriteLocations"
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FavouriteLocation>>> {
    let user_id = session.require_user_id()?;
    let locations = state.favourites.list(&user_id).await?;
    Ok(web::Json(locations))
}

/// Remove one of the authenticated user's favourites.
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    params(("id" = i64, Path, description = "Favourite location id")),
    responses(
        (status = 200, description = "Location removed", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not one of the user's favourites", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "deleteFavouriteLocation"
)]
#[delete("/locations/{id}")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_location_id(&id)?;
    state.favourites.remove(&user_id, id).await?;
    Ok(web::Json(MessageResponse::new("Location deleted successfully")))
}

#[cfg(test)]
#[path = "locations_tests.rs"]
mod tests;
