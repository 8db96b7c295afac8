//! Session cookie handling
//!
//! The login session id travels in an HttpOnly cookie so scripts can never
//! read it. SameSite=Lax keeps the cookie on top-level navigations, which
//! the authorization redirect flow relies on.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "session_id";

/// Build the Set-Cookie header for a fresh login session
fn build_session_cookie(
    session_id: &str,
    max_age: i64,
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id, max_age
    );

    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
}

/// Set the session cookie on the response headers
pub fn set_session_cookie(
    headers: &mut HeaderMap,
    session_id: &str,
    max_age: i64,
    secure: bool,
) -> Result<(), String> {
    let cookie = build_session_cookie(session_id, max_age, secure)
        .map_err(|e| format!("Failed to build session cookie: {}", e))?;
    headers.append(SET_COOKIE, cookie);
    Ok(())
}

/// Clear the session cookie (Max-Age=0)
pub fn clear_session_cookie(headers: &mut HeaderMap, secure: bool) -> Result<(), String> {
    let cookie = build_session_cookie("", 0, secure)
        .map_err(|e| format!("Failed to build clear cookie: {}", e))?;
    headers.append(SET_COOKIE, cookie);
    Ok(())
}

/// Extract a cookie value from the Cookie header
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                let name = parts.next()?;
                let value = parts.next()?;
                if name == cookie_name {
                    Some(value.to_string())
                } else {
                    None
                }
            })
        })
}
