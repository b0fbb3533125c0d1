use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use base64ct::{Base64, Encoding};

use super::{errors::AuthError, repo_types::User, services::Credential};
use crate::error::ApiError;

/// The authenticated caller, placed in request extensions by the auth gate.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Auth(AuthError::MissingCredentials))
    }
}

/// Reads the `Authorization` header.
///
/// Accepts `Bearer <token>` and `Basic <base64(username:password)>`. A Basic
/// pair with an empty password carries a token in the username slot, so
/// clients that only speak Basic auth can still present tokens.
pub fn credential_from_headers(headers: &HeaderMap) -> Result<Credential, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;

    let (scheme, rest) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredentials)?;
    let rest = rest.trim();

    if scheme.eq_ignore_ascii_case("bearer") {
        return Ok(Credential::Token(rest.to_string()));
    }

    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = Base64::decode_vec(rest).map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;
        if username.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if password.is_empty() {
            return Ok(Credential::Token(username.to_string()));
        }
        return Ok(Credential::Password {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    Err(AuthError::MalformedCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn basic(pair: &str) -> String {
        format!("Basic {}", Base64::encode_string(pair.as_bytes()))
    }

    #[test]
    fn bearer_token() {
        assert_eq!(
            credential_from_headers(&headers("Bearer abc.def")).unwrap(),
            Credential::Token("abc.def".into())
        );
        assert_eq!(
            credential_from_headers(&headers("bearer xyz")).unwrap(),
            Credential::Token("xyz".into())
        );
    }

    #[test]
    fn basic_username_password() {
        assert_eq!(
            credential_from_headers(&headers(&basic("alice:pa:ss"))).unwrap(),
            Credential::Password {
                username: "alice".into(),
                password: "pa:ss".into(),
            }
        );
    }

    #[test]
    fn basic_with_empty_password_is_token() {
        assert_eq!(
            credential_from_headers(&headers(&basic("tok.en.value:"))).unwrap(),
            Credential::Token("tok.en.value".into())
        );
    }

    #[test]
    fn missing_and_malformed() {
        assert!(matches!(
            credential_from_headers(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            credential_from_headers(&headers("Basic !!!")),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            credential_from_headers(&headers(&basic("no-colon"))),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            credential_from_headers(&headers("Digest abc")),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            credential_from_headers(&headers("Bearer")),
            Err(AuthError::MalformedCredentials)
        ));
    }
}
