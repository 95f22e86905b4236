//! Loading of service principal credentials from the local credentials
//! file and the process environment.

use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::errors::{ServiceError, ServiceResult};

/// Environment variable holding the client id.
pub const ENV_CLIENT_ID: &str = "PDF_SERVICES_CLIENT_ID";

/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "PDF_SERVICES_CLIENT_SECRET";

#[derive(Debug, Deserialize)]
struct CredentialsDocument {
    client_credentials: ClientCredentials,
}

#[derive(Debug, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

/// The credentials JSON shipped with a service principal:
/// `{"client_credentials": {"client_id": ..., "client_secret": ...}}`.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    client_id: String,
    client_secret: String,
}

impl CredentialsFile {
    /// Read and parse the credentials file. Both nested keys must be
    /// present and non-empty.
    pub fn from_path(path: &Path) -> ServiceResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Configuration(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let document: CredentialsDocument = serde_json::from_str(&raw).map_err(|e| {
            ServiceError::Configuration(format!(
                "invalid credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let ClientCredentials {
            client_id,
            client_secret,
        } = document.client_credentials;

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(ServiceError::Configuration(format!(
                "credentials file {} contains an empty client id or secret",
                path.display()
            )));
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Export both credential values into the process environment, where
    /// [`ServicePrincipalCredentials::from_env`] picks them up.
    pub fn init_env(&self) {
        env::set_var(ENV_CLIENT_ID, &self.client_id);
        env::set_var(ENV_CLIENT_SECRET, &self.client_secret);
    }
}

/// Service principal (client id / client secret) used for the OAuth
/// client-credentials exchange.
#[derive(Debug, Clone)]
pub struct ServicePrincipalCredentials {
    client_id: String,
    client_secret: String,
}

impl ServicePrincipalCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Build credentials from the two environment variables, failing with
    /// a configuration error naming the missing variable.
    pub fn from_env() -> ServiceResult<Self> {
        let client_id = env::var(ENV_CLIENT_ID)
            .map_err(|_| ServiceError::Configuration(format!("{} is not set", ENV_CLIENT_ID)))?;
        let client_secret = env::var(ENV_CLIENT_SECRET)
            .map_err(|_| ServiceError::Configuration(format!("{} is not set", ENV_CLIENT_SECRET)))?;
        Ok(Self::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests below mutate shared process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_credentials_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_well_formed_credentials_file() {
        let file = write_credentials_json(
            r#"{"client_credentials": {"client_id": "id-123", "client_secret": "secret-456"}}"#,
        );

        let credentials = CredentialsFile::from_path(file.path()).unwrap();
        assert_eq!(credentials.client_id, "id-123");
        assert_eq!(credentials.client_secret, "secret-456");
    }

    #[test]
    fn rejects_credentials_file_missing_nested_key() {
        let file = write_credentials_json(r#"{"client_credentials": {"client_id": "id-123"}}"#);

        let err = CredentialsFile::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn rejects_missing_credentials_file() {
        let err =
            CredentialsFile::from_path(Path::new("does/not/exist/credentials.json")).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn init_env_exports_both_variables() {
        let _guard = ENV_LOCK.lock().unwrap();

        let file = write_credentials_json(
            r#"{"client_credentials": {"client_id": "env-id", "client_secret": "env-secret"}}"#,
        );
        let credentials = CredentialsFile::from_path(file.path()).unwrap();
        credentials.init_env();

        assert_eq!(env::var(ENV_CLIENT_ID).unwrap(), "env-id");
        assert_eq!(env::var(ENV_CLIENT_SECRET).unwrap(), "env-secret");

        let principal = ServicePrincipalCredentials::from_env().unwrap();
        assert_eq!(principal.client_id(), "env-id");
        assert_eq!(principal.client_secret(), "env-secret");
    }

    #[test]
    fn from_env_fails_when_variables_are_unset() {
        let _guard = ENV_LOCK.lock().unwrap();

        env::remove_var(ENV_CLIENT_ID);
        env::remove_var(ENV_CLIENT_SECRET);

        let err = ServicePrincipalCredentials::from_env().unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }
}
