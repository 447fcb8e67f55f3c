//! Static settings schema and the coercion rules behind it.
//!
//! Every setting is a typed [`Field`] constant carrying its name, default and
//! description. [`SCHEMA`] lists all of them for whole-schema passes such as
//! the required-field check.

use super::source::{RawValue, Source};
use crate::errors::ConfigError;

/// A type a raw string setting can be coerced into.
pub trait FieldType: Sized {
    /// Compile-time representation of a default value.
    type Default: Copy + Send + Sync + 'static;

    /// Human-readable type name used in coercion errors.
    const EXPECTED: &'static str;

    fn from_default(default: Self::Default) -> Self;

    fn coerce(raw: &str) -> Option<Self>;
}

impl FieldType for String {
    type Default = &'static str;
    const EXPECTED: &'static str = "string";

    fn from_default(default: Self::Default) -> Self {
        default.to_string()
    }

    fn coerce(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FieldType for u32 {
    type Default = u32;
    const EXPECTED: &'static str = "non-negative integer";

    fn from_default(default: Self::Default) -> Self {
        default
    }

    fn coerce(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FieldType for bool {
    type Default = bool;
    const EXPECTED: &'static str = "boolean";

    fn from_default(default: Self::Default) -> Self {
        default
    }

    fn coerce(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
            _ => None,
        }
    }
}

/// Lists accept a JSON array of strings. Any other value is also taken as a
/// comma-separated list, which is more lenient than JSON-only list binding.
impl FieldType for Vec<String> {
    type Default = &'static [&'static str];
    const EXPECTED: &'static str = "JSON array of strings or comma-separated list";

    fn from_default(default: Self::Default) -> Self {
        default.iter().map(|s| s.to_string()).collect()
    }

    fn coerce(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.starts_with('[') {
            return serde_json::from_str(raw).ok();
        }
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Declaration of a single setting.
pub struct Field<T: FieldType> {
    name: &'static str,
    default: Option<T::Default>,
    description: &'static str,
}

impl<T: FieldType> Field<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Look the field up in `source`, coerce it, or fall back to the default.
    pub fn resolve(&self, source: &Source) -> Result<T, ConfigError> {
        match source.raw(self.name) {
            Some(RawValue::Text(raw)) => {
                T::coerce(raw).ok_or_else(|| ConfigError::TypeCoercionFailure {
                    field: self.name,
                    raw_value: raw.clone(),
                    expected: T::EXPECTED,
                })
            }
            Some(RawValue::NotUnicode(lossy)) => Err(ConfigError::TypeCoercionFailure {
                field: self.name,
                raw_value: lossy.clone(),
                expected: "UTF-8 string",
            }),
            None => {
                let default = self
                    .default
                    .ok_or(ConfigError::MissingRequiredField { field: self.name })?;
                tracing::debug!(field = self.name, "Setting not provided, using default");
                Ok(T::from_default(default))
            }
        }
    }
}

/// Type-erased view of a [`Field`], for iterating over the whole schema.
pub trait SchemaEntry: Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn expected(&self) -> &'static str;
    fn is_required(&self) -> bool;
}

impl<T: FieldType> SchemaEntry for Field<T>
where
    Field<T>: Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn expected(&self) -> &'static str {
        T::EXPECTED
    }

    fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

// Google Workspace
pub const GOOGLE_CLIENT_ID: Field<String> = Field {
    name: "google_client_id",
    default: None,
    description: "Google OAuth2 Client ID",
};
pub const GOOGLE_CLIENT_SECRET: Field<String> = Field {
    name: "google_client_secret",
    default: None,
    description: "Google OAuth2 Client Secret",
};
pub const GOOGLE_REDIRECT_URI: Field<String> = Field {
    name: "google_redirect_uri",
    default: Some("http://localhost:8000/auth/callback"),
    description: "Google OAuth2 redirect URI",
};

// OpenAI
pub const OPENAI_API_KEY: Field<String> = Field {
    name: "openai_api_key",
    default: None,
    description: "OpenAI API key for LLM processing",
};

// Redis
pub const REDIS_URL: Field<String> = Field {
    name: "redis_url",
    default: Some("redis://localhost:6379"),
    description: "Redis connection URL for session storage",
};

// Security
pub const SECRET_KEY: Field<String> = Field {
    name: "secret_key",
    default: None,
    description: "Secret key for JWT tokens",
};
pub const ALGORITHM: Field<String> = Field {
    name: "algorithm",
    default: Some("HS256"),
    description: "JWT algorithm",
};
pub const ACCESS_TOKEN_EXPIRE_MINUTES: Field<u32> = Field {
    name: "access_token_expire_minutes",
    default: Some(60),
    description: "JWT token expiry time in minutes",
};

// Application
pub const DEBUG: Field<bool> = Field {
    name: "debug",
    default: Some(false),
    description: "Debug mode flag",
};
pub const ENVIRONMENT: Field<String> = Field {
    name: "environment",
    default: Some("production"),
    description: "Environment name",
};
pub const CORS_ORIGINS: Field<Vec<String>> = Field {
    name: "cors_origins",
    default: Some(&["http://localhost:3000", "http://localhost:8000"]),
    description: "Allowed CORS origins",
};

// Reports
pub const REPORT_EXPIRY_HOURS: Field<u32> = Field {
    name: "report_expiry_hours",
    default: Some(1),
    description: "Report URL expiry time in hours",
};
pub const MAX_LICENSES_PER_REQUEST: Field<u32> = Field {
    name: "max_licenses_per_request",
    default: Some(1000),
    description: "Maximum licenses to process per request",
};

/// Every declared setting, in declaration order.
pub static SCHEMA: &[&dyn SchemaEntry] = &[
    &GOOGLE_CLIENT_ID,
    &GOOGLE_CLIENT_SECRET,
    &GOOGLE_REDIRECT_URI,
    &OPENAI_API_KEY,
    &REDIS_URL,
    &SECRET_KEY,
    &ALGORITHM,
    &ACCESS_TOKEN_EXPIRE_MINUTES,
    &DEBUG,
    &ENVIRONMENT,
    &CORS_ORIGINS,
    &REPORT_EXPIRY_HOURS,
    &MAX_LICENSES_PER_REQUEST,
];

/// Fail with the first required setting (in schema order) absent from `source`.
pub fn check_required(source: &Source) -> Result<(), ConfigError> {
    match SCHEMA
        .iter()
        .find(|entry| entry.is_required() && !source.contains(entry.name()))
    {
        Some(entry) => Err(ConfigError::MissingRequiredField {
            field: entry.name(),
        }),
        None => Ok(()),
    }
}
