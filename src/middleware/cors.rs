//! CORS layer built from the configured origins.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{schema, Settings};
use crate::errors::ConfigError;

const WILDCARD: &str = "*";

/// Build the CORS layer for the API.
///
/// Credentials are allowed for an explicit origin list. A `*` entry switches
/// to any origin, which cannot be combined with credentials.
pub fn cors_layer(settings: &Settings) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins = settings.cors_origins();
    if origins.iter().any(|origin| origin == WILDCARD) {
        tracing::warn!("CORS allows any origin, credentials disabled");
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::TypeCoercionFailure {
                field: schema::CORS_ORIGINS.name(),
                raw_value: origin.clone(),
                expected: "HTTP origin",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}
