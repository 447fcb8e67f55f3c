//! Raw key/value sources that settings are resolved from.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::ConfigError;

/// A raw setting value as found in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    /// Present but not valid UTF-8; holds a lossy rendering for error messages.
    NotUnicode(String),
}

/// Case-folded view over raw string settings.
///
/// Keys are matched case-insensitively. When several spellings of the same
/// key are fed in (`SECRET_KEY` and `secret_key`), they are applied in
/// lexicographic order of the original key, so the outcome never depends on
/// the iteration order of the underlying environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    values: HashMap<String, RawValue>,
}

impl Source {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a source from arbitrary key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_raw_pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), RawValue::Text(v.into()))),
        )
    }

    pub(crate) fn from_raw_pairs(pairs: impl IntoIterator<Item = (String, RawValue)>) -> Self {
        let mut pairs: Vec<(String, RawValue)> = pairs.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut values: HashMap<String, RawValue> = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            let folded = key.to_lowercase();
            if let Some(previous) = values.get(&folded) {
                if *previous != value {
                    tracing::warn!(key = %key, "Conflicting spellings of setting, using last");
                }
            }
            values.insert(folded, value);
        }

        Self { values }
    }

    /// Snapshot the process environment.
    ///
    /// Variables whose name is not valid UTF-8 cannot match any setting and
    /// are skipped. Values that are not valid UTF-8 are kept as
    /// [`RawValue::NotUnicode`] so that resolving them fails loudly.
    pub fn from_env() -> Self {
        let pairs = std::env::vars_os().filter_map(|(key, value)| {
            let key = match key.into_string() {
                Ok(key) => key,
                Err(key) => {
                    tracing::warn!(key = ?key, "Skipping environment variable with non UTF-8 name");
                    return None;
                }
            };
            let value = match value.into_string() {
                Ok(value) => RawValue::Text(value),
                Err(value) => RawValue::NotUnicode(value.to_string_lossy().into_owned()),
            };
            Some((key, value))
        });
        Self::from_raw_pairs(pairs)
    }

    /// Read a dotenv file without touching the process environment.
    ///
    /// A missing file yields an empty source.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let to_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "No env file found");
                return Ok(Self::empty());
            }
            Err(e) => return Err(to_error(e)),
        };

        let pairs = iter.collect::<Result<Vec<_>, _>>().map_err(to_error)?;
        tracing::debug!(path = %path.display(), entries = pairs.len(), "Loaded env file");
        Ok(Self::from_pairs(pairs))
    }

    /// Layer `higher` over `self`; keys present in `higher` win.
    pub fn overlay(mut self, higher: Source) -> Self {
        self.values.extend(higher.values);
        self
    }

    /// Look up a raw value by name, ignoring case.
    pub fn raw(&self, name: &str) -> Option<&RawValue> {
        self.values.get(&name.to_lowercase())
    }

    /// Look up a UTF-8 value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.raw(name)? {
            RawValue::Text(value) => Some(value.as_str()),
            RawValue::NotUnicode(_) => None,
        }
    }

    /// Whether any value, valid UTF-8 or not, is present under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lookup_ignores_case() {
        let source = Source::from_pairs([("Secret_Key", "skey")]);
        assert_eq!(source.get("secret_key"), Some("skey"));
        assert_eq!(source.get("SECRET_KEY"), Some("skey"));
        assert_eq!(source.get("redis_url"), None);
    }

    #[test]
    fn conflicting_spellings_resolve_deterministically() {
        let forward = Source::from_pairs([("SECRET_KEY", "upper"), ("secret_key", "lower")]);
        let backward = Source::from_pairs([("secret_key", "lower"), ("SECRET_KEY", "upper")]);
        assert_eq!(forward, backward);
        assert_eq!(forward.get("secret_key"), Some("lower"));
        assert_eq!(forward.len(), 1);
    }

    #[test]
    fn overlay_prefers_higher() {
        let file = Source::from_pairs([("redis_url", "redis://file:6379"), ("debug", "true")]);
        let env = Source::from_pairs([("REDIS_URL", "redis://env:6379")]);
        let merged = file.overlay(env);
        assert_eq!(merged.get("redis_url"), Some("redis://env:6379"));
        assert_eq!(merged.get("debug"), Some("true"));
    }

    #[test]
    fn missing_env_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::from_env_file(dir.path().join(".env")).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn env_file_parses_quotes_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# local overrides").unwrap();
        writeln!(file, "GOOGLE_CLIENT_ID=cid").unwrap();
        writeln!(file, "export REDIS_URL=\"redis://cache:6380\"").unwrap();
        writeln!(file, "cors_origins='[\"https://app.example.com\"]'").unwrap();
        file.flush().unwrap();

        let source = Source::from_env_file(file.path()).unwrap();
        assert_eq!(source.get("google_client_id"), Some("cid"));
        assert_eq!(source.get("redis_url"), Some("redis://cache:6380"));
        assert_eq!(
            source.get("CORS_ORIGINS"),
            Some("[\"https://app.example.com\"]")
        );
    }

    #[test]
    fn malformed_env_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NOT A VALID LINE").unwrap();
        file.flush().unwrap();

        let err = Source::from_env_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn non_unicode_value_is_present_but_not_text() {
        let source = Source::from_raw_pairs([(
            "REDIS_URL".to_string(),
            RawValue::NotUnicode("redis://cache:\u{FFFD}6380".to_string()),
        )]);
        assert!(source.contains("redis_url"));
        assert_eq!(source.get("redis_url"), None);
    }
}
