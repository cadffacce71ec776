//! Credential variables required by each authentication mode.

/// Which credential sets the config enables. Both may be active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialModes {
    pub api_token: bool,
    pub oauth_client: bool,
}

/// An environment variable and the message shown when prompting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvVarSpec {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const API_TOKEN_VARS: [EnvVarSpec; 2] = [
    EnvVarSpec {
        name: "DT_ENV_URL",
        prompt: "Input Dynatrace environment URL (SaaS: https://########.live.dynatrace.com or Managed: https://<dynatrace-host>/e/########): ",
    },
    EnvVarSpec {
        name: "DT_API_TOKEN",
        prompt: "Input Dynatrace API token (dt0c01.########.########): ",
    },
];

pub const OAUTH_CLIENT_VARS: [EnvVarSpec; 3] = [
    EnvVarSpec {
        name: "DT_CLIENT_ID",
        prompt: "Input Dynatrace OAuth client ID (dt0s02.########): ",
    },
    EnvVarSpec {
        name: "DT_CLIENT_SECRET",
        prompt: "Input Dynatrace OAuth client secret (dt0s02.########.########): ",
    },
    EnvVarSpec {
        name: "DT_ACCOUNT_ID",
        prompt: "Input Dynatrace OAuth account ID (urn:dtaccount:{your-account-UUID}): ",
    },
];

/// Variables to provision, in prompt order: API token set first, then OAuth.
pub fn required_env(modes: CredentialModes) -> Vec<EnvVarSpec> {
    let mut specs = Vec::new();
    if modes.api_token {
        specs.extend(API_TOKEN_VARS);
    }
    if modes.oauth_client {
        specs.extend(OAUTH_CLIENT_VARS);
    }
    specs
}
