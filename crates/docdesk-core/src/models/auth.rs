use serde::{Deserialize, Serialize};

/// Scope list for a login or token request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Response of `GET /auth_setup`. Decides whether auth headers are attached at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSetup {
    #[serde(default)]
    pub use_login: bool,
    #[serde(default)]
    pub login_request: ScopeRequest,
    #[serde(default)]
    pub token_request: ScopeRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_setup_deserialize_full() {
        let json = r#"{
            "useLogin": true,
            "loginRequest": {"scopes": ["openid"]},
            "tokenRequest": {"scopes": ["api://docs/.default"]}
        }"#;
        let setup: AuthSetup = serde_json::from_str(json).unwrap();
        assert!(setup.use_login);
        assert_eq!(setup.login_request.scopes, vec!["openid"]);
        assert_eq!(setup.token_request.scopes, vec!["api://docs/.default"]);
    }

    #[test]
    fn test_auth_setup_missing_token_request_defaults() {
        // The backend ships with login turned off and no tokenRequest block.
        let json = r#"{"useLogin": false, "loginRequest": {"scopes": []}}"#;
        let setup: AuthSetup = serde_json::from_str(json).unwrap();
        assert!(!setup.use_login);
        assert!(setup.token_request.scopes.is_empty());
    }
}
