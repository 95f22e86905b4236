// Declare submodules for credential handling
pub mod credentials;

pub use credentials::{
    CredentialsFile, ServicePrincipalCredentials, ENV_CLIENT_ID, ENV_CLIENT_SECRET,
};
