use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Credential check behind the admin gate. The gate only asks "is this
/// username/password pair acceptable", so a stronger scheme can replace
/// the static comparison without touching the workflows.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Compares against the two process-configured secret values.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn from_config() -> Self {
        let admin = &crate::config::config().admin;
        Self {
            username: admin.username.clone(),
            password: admin.password.clone(),
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Empty configured credentials never authenticate anyone
        !self.username.is_empty()
            && username == self.username
            && password == self.password
    }
}

/// Stateless Basic-Auth gate for every `/admin` route. Each request is
/// re-validated independently; there is no session.
pub async fn basic_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Err(challenge_response());
    };

    let credentials = auth_header
        .to_str()
        .ok()
        .and_then(parse_basic_credentials)
        .ok_or_else(|| rejection_response("Invalid auth header"))?;

    let verifier = StaticCredentials::from_config();
    if verifier.verify(&credentials.0, &credentials.1) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("admin gate rejected credentials");
        Err(rejection_response("Invalid credentials"))
    }
}

/// Decode `Basic base64(user:pass)` into its parts.
fn parse_basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?.trim();
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn challenge_response() -> Response {
    let realm = &crate::config::config().admin.realm;
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            format!("Basic realm=\"{}\", charset=\"UTF-8\"", realm),
        )],
        "Not authorized",
    )
        .into_response()
}

fn rejection_response(message: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_header() {
        // "admin:secret"
        let header = format!("Basic {}", BASE64.encode("admin:secret"));
        assert_eq!(
            parse_basic_credentials(&header),
            Some(("admin".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn rejects_non_basic_scheme() {
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
    }

    #[test]
    fn rejects_missing_colon() {
        let header = format!("Basic {}", BASE64.encode("no-colon-here"));
        assert_eq!(parse_basic_credentials(&header), None);
    }

    #[test]
    fn password_may_contain_colons() {
        let header = format!("Basic {}", BASE64.encode("admin:pa:ss"));
        assert_eq!(
            parse_basic_credentials(&header),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn empty_configured_credentials_never_match() {
        let verifier = StaticCredentials {
            username: String::new(),
            password: String::new(),
        };
        assert!(!verifier.verify("", ""));
    }

    #[test]
    fn static_credentials_compare_exactly() {
        let verifier = StaticCredentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        assert!(verifier.verify("admin", "secret"));
        assert!(!verifier.verify("admin", "Secret"));
        assert!(!verifier.verify("root", "secret"));
    }
}
