//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{City, CityValidationError, Error};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const CITY_FIELD: FieldName = FieldName::new("city");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_city_error(field: FieldName, value: &str, err: &CityValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": err.code(),
    }))
}

/// Validate a raw city, reporting failures against `field`.
pub(crate) fn parse_city(value: String, field: FieldName) -> Result<City, Error> {
    City::new(value.clone()).map_err(|err| invalid_city_error(field, &value, &err))
}
