use axum::http::Method;

/// Whether a request must carry valid credentials.
///
/// Reading the survey list is always public, as are registration and the
/// index page. Token issuance always needs credentials. Everything else is
/// protected while authentication is enabled.
pub fn requires_auth(method: &Method, path: &str, auth_enabled: bool) -> bool {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    let read = *method == Method::GET || *method == Method::HEAD;

    if path == "/token" {
        return true;
    }
    if (read && (path == "/survey" || path == "/")) || (*method == Method::POST && path == "/register") {
        return false;
    }
    auth_enabled
}
