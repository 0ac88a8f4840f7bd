//! API key resolution for the Gemini backend.
//!
//! Resolution order is fixed: the `GEMINI_API_KEY` environment variable
//! first, then the local `.secrets/secrets.toml` file. The first non-empty
//! value wins. A missing credential is a fatal configuration error; callers
//! must not attempt any network call without one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable consulted first.
pub const CREDENTIAL_ENV_VAR: &str = "GEMINI_API_KEY";

/// Top-level key expected in the secrets file.
pub const CREDENTIAL_SECRETS_KEY: &str = "GEMINI_API_KEY";

const SECRETS_DIR: &str = ".secrets";
const SECRETS_FILE: &str = "secrets.toml";

/// Opaque non-empty API key. `Debug` never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the secret value for use at the transport boundary.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("GEMINI_API_KEY not found in the environment or {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secrets file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "GEMINI_API_KEY", default)]
    gemini_api_key: Option<String>,
}

/// Resolves the credential from the process environment, then from
/// `.secrets/secrets.toml` under the current directory.
pub fn resolve() -> Result<Credential, CredentialError> {
    resolve_in(Path::new("."))
}

/// Like [`resolve`], with the secrets file lookup anchored at `dir`.
pub fn resolve_in(dir: &Path) -> Result<Credential, CredentialError> {
    resolve_from(std::env::var(CREDENTIAL_ENV_VAR).ok(), dir)
}

/// Resolution core with the environment value passed in explicitly.
///
/// Kept separate so tests can exercise the priority order without mutating
/// process-wide environment state.
pub fn resolve_from(
    env_value: Option<String>,
    dir: &Path,
) -> Result<Credential, CredentialError> {
    if let Some(credential) = env_value.as_deref().and_then(Credential::from_raw) {
        return Ok(credential);
    }

    let path = dir.join(SECRETS_DIR).join(SECRETS_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(CredentialError::NotFound { path });
        }
        Err(source) => {
            return Err(CredentialError::Io {
                operation: "reading secrets file",
                path,
                source,
            });
        }
    };

    let secrets: SecretsFile =
        toml::from_str(&contents).map_err(|source| CredentialError::Parse {
            path: path.clone(),
            source,
        })?;

    secrets
        .gemini_api_key
        .as_deref()
        .and_then(Credential::from_raw)
        .ok_or(CredentialError::NotFound { path })
}
