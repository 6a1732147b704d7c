use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

/// Bedrock API key variable, sent as a bearer token
pub const BEARER_TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";
pub const PROFILE_ENV: &str = "AWS_PROFILE";
pub const SHARED_CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

const DEFAULT_PROFILE: &str = "default";

/// Credential material. `Debug` never prints secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum AwsCredentials {
    BearerToken(String),
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BearerToken(_) => f.debug_tuple("BearerToken").field(&"[REDACTED]").finish(),
            Self::Static {
                access_key_id,
                session_token,
                ..
            } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"[REDACTED]")
                .field("session_token", &session_token.as_ref().map(|_| "[REDACTED]"))
                .finish(),
        }
    }
}

/// Credentials together with where they were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub credentials: AwsCredentials,
    /// e.g. `environment`, `profile:dev`
    pub source: String,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read shared credentials file {path}: {source}")]
    SharedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile '{profile}' in {path} is missing {field}")]
    IncompleteProfile {
        profile: String,
        path: PathBuf,
        field: &'static str,
    },
}

/// One source of ambient credentials.
///
/// `Ok(None)` means "nothing here, try the next source".
pub trait CredentialProvider: Send + Sync {
    fn resolve(&self) -> Result<Option<ResolvedCredentials>, CredentialError>;
}

impl CredentialProvider for ResolvedCredentials {
    fn resolve(&self) -> Result<Option<ResolvedCredentials>, CredentialError> {
        Ok(Some(self.clone()))
    }
}

/// Credentials from process environment variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentProvider;

impl CredentialProvider for EnvironmentProvider {
    fn resolve(&self) -> Result<Option<ResolvedCredentials>, CredentialError> {
        if let Some(token) = non_empty_env(BEARER_TOKEN_ENV) {
            return Ok(Some(ResolvedCredentials {
                credentials: AwsCredentials::BearerToken(token),
                source: format!("environment:{BEARER_TOKEN_ENV}"),
            }));
        }

        match (non_empty_env(ACCESS_KEY_ID_ENV), non_empty_env(SECRET_ACCESS_KEY_ENV)) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Some(ResolvedCredentials {
                credentials: AwsCredentials::Static {
                    access_key_id,
                    secret_access_key,
                    session_token: non_empty_env(SESSION_TOKEN_ENV),
                },
                source: "environment".to_string(),
            })),
            (None, None) => Ok(None),
            _ => {
                warn!(
                    "only one of {ACCESS_KEY_ID_ENV} and {SECRET_ACCESS_KEY_ENV} is set, ignoring environment keys"
                );
                Ok(None)
            }
        }
    }
}

/// Credentials from a profile in the shared credentials file
#[derive(Debug, Default, Clone)]
pub struct ProfileProvider {
    path: Option<PathBuf>,
    profile: Option<String>,
}

impl ProfileProvider {
    /// Resolve the file and profile from the environment at lookup time
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn credentials_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| non_empty_env(SHARED_CREDENTIALS_FILE_ENV).map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|home| home.join(".aws").join("credentials")))
    }

    fn profile_name(&self) -> String {
        self.profile
            .clone()
            .or_else(|| non_empty_env(PROFILE_ENV))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }
}

impl CredentialProvider for ProfileProvider {
    fn resolve(&self) -> Result<Option<ResolvedCredentials>, CredentialError> {
        let Some(path) = self.credentials_path() else {
            debug!("no home directory, skipping shared credentials file");
            return Ok(None);
        };
        let profile = self.profile_name();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "shared credentials file not found");
                return Ok(None);
            }
            Err(source) => return Err(CredentialError::SharedFile { path, source }),
        };

        let mut profiles = parse_profiles(&content);
        let Some(mut entries) = profiles.remove(&profile) else {
            debug!(path = %path.display(), %profile, "profile not present in shared credentials file");
            return Ok(None);
        };

        let mut take = |field: &'static str| {
            entries
                .remove(field)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CredentialError::IncompleteProfile {
                    profile: profile.clone(),
                    path: path.clone(),
                    field,
                })
        };
        let access_key_id = take("aws_access_key_id")?;
        let secret_access_key = take("aws_secret_access_key")?;
        let session_token = take("aws_session_token").ok();

        Ok(Some(ResolvedCredentials {
            credentials: AwsCredentials::Static {
                access_key_id,
                secret_access_key,
                session_token,
            },
            source: format!("profile:{profile}"),
        }))
    }
}

/// Ordered list of providers; the first that yields credentials wins.
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    /// Empty chain, resolves to nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment first, then the shared credentials file.
    ///
    /// An explicit profile skips the environment so the operator gets the
    /// profile they asked for.
    pub fn ambient(profile: Option<&str>) -> Self {
        match profile {
            Some(profile) => Self::new().with(ProfileProvider::new().with_profile(profile)),
            None => Self::new().with(EnvironmentProvider).with(ProfileProvider::new()),
        }
    }

    #[must_use]
    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for CredentialChain {
    fn resolve(&self) -> Result<Option<ResolvedCredentials>, CredentialError> {
        for provider in &self.providers {
            if let Some(resolved) = provider.resolve()? {
                debug!(source = %resolved.source, "resolved AWS credentials");
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse INI-style `[profile]` sections into lowercase key/value maps.
fn parse_profiles(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut profiles: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = section.trim().to_string();
            profiles.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            if let Some(entries) = profiles.get_mut(section) {
                entries.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
    }

    profiles
}
