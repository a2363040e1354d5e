//! Environment variable naming for Campus Catalyst configuration.
//!
//! Plain settings are overridden through `CATALYST__SECTION__KEY` variables,
//! which the `config` crate picks up directly. Secrets are referenced in config
//! files by the marker string `secret_from_env` and resolved here from
//! `CATALYST_SECRET_SECTION_KEY`, falling back to the shorter legacy
//! `SECTION_KEY` form used by older deployments.

use serde_json::Value;
use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "CATALYST";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "CATALYST_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value that requests a secret be injected from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables.
///
/// `PREFIX` in the environment wins over [`DEFAULT_PREFIX`].
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// `auth.jwt_secret` -> `CATALYST_SECRET_AUTH_JWT_SECRET`
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// `auth.jwt_secret` -> `AUTH_JWT_SECRET`
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    path.replace('.', SECRET_SEPARATOR).to_uppercase()
}

/// Look up a secret by its dotted config path, trying the prefixed name first.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    env::var(secret_path_to_env_var(path))
        .or_else(|_| env::var(legacy_secret_path_to_env_var(path)))
        .ok()
}

/// Replace every [`SECRET_MARKER`] string inside `value` with its environment value.
///
/// Markers without a matching variable are left untouched and logged.
/// Returns `true` if at least one marker was replaced.
pub fn inject_secrets(value: &mut Value) -> bool {
    fn walk(path: &mut Vec<String>, obj: &mut Value) -> bool {
        match obj {
            Value::Object(map) => {
                let mut replaced = false;
                for (k, v) in map.iter_mut() {
                    path.push(k.clone());
                    replaced |= walk(path, v);
                    path.pop();
                }
                replaced
            }
            Value::String(s) if s == SECRET_MARKER => {
                let dotted = path.join(".");
                match get_secret_env_var(&dotted) {
                    Some(env_val) => {
                        *s = env_val;
                        true
                    }
                    None => {
                        warn!(
                            "No environment value for secret '{}' (expected {})",
                            dotted,
                            secret_path_to_env_var(&dotted)
                        );
                        false
                    }
                }
            }
            _ => false,
        }
    }

    walk(&mut Vec::new(), value)
}
