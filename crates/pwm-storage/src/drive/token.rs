// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached OAuth token for the Drive backend.
//!
//! pwm does not run the consent flow itself; it reuses a token cached as
//! JSON by whatever tool performed the authorization.

use std::path::Path;

use pwm_core::PwmError;
use secrecy::SecretString;
use serde::Deserialize;

/// On-disk shape of the token cache. Only `access_token` is required.
#[derive(Deserialize)]
struct CachedToken {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// Read the bearer token from `path`.
pub fn read_token_file(path: &Path) -> Result<SecretString, PwmError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PwmError::Config(format!(
            "cannot read Drive token cache {}: {e} -- authorize pwm for Drive access first",
            path.display()
        ))
    })?;
    parse_token(&raw).map_err(|message| {
        PwmError::Config(format!("Drive token cache {}: {message}", path.display()))
    })
}

fn parse_token(raw: &str) -> Result<SecretString, String> {
    let token: CachedToken =
        serde_json::from_str(raw).map_err(|e| format!("invalid token JSON: {e}"))?;
    if let Some(kind) = token.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(format!("unsupported token type `{kind}`"));
        }
    }
    if token.access_token.trim().is_empty() {
        return Err("access_token is empty".to_string());
    }
    Ok(SecretString::from(token.access_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn parses_minimal_token() {
        let token = parse_token(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.expose_secret(), "abc");
    }

    #[test]
    fn ignores_extra_fields() {
        let token = parse_token(
            r#"{"access_token":"abc","token_type":"Bearer","refresh_token":"r","expiry":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(token.expose_secret(), "abc");
    }

    #[test]
    fn rejects_empty_access_token() {
        assert!(parse_token(r#"{"access_token":""}"#).is_err());
    }

    #[test]
    fn rejects_non_bearer_tokens() {
        assert!(parse_token(r#"{"access_token":"abc","token_type":"mac"}"#).is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_token_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PwmError::Config(_)));
    }
}
