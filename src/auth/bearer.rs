use crate::error::{NetcordError, Result};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. A missing header, another
/// scheme, an empty token or any extra segment after the token is
/// rejected with a 401 [`NetcordError::Authentication`].
///
/// # Examples
///
/// ```
/// use netcord::auth::parse_bearer;
///
/// assert_eq!(parse_bearer(Some("Bearer abc.def")).unwrap(), "abc.def");
/// assert!(parse_bearer(Some("Basic dXNlcjpwYXNz")).is_err());
/// assert!(parse_bearer(None).is_err());
/// ```
pub fn parse_bearer(header: Option<&str>) -> Result<&str> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| NetcordError::unauthorized("missing Authorization header"))?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(NetcordError::unauthorized("invalid authentication scheme"));
    }

    let token = parts
        .next()
        .ok_or_else(|| NetcordError::unauthorized("missing bearer token"))?;

    if parts.next().is_some() {
        return Err(NetcordError::unauthorized("malformed Authorization header"));
    }

    Ok(token)
}
