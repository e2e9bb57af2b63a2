//! `Authorization: OAuth ...` header handling (RFC 5849 section 3.5.1).

use crate::encode::encode;
use crate::{Parameters, SignError, SignResult, OAUTH_KEY_PREFIX, REALM_KEY};

const OAUTH_SCHEME: &str = "OAuth ";

/// Parses the OAuth parameters out of an `Authorization` header value.
///
/// A missing header, or one using another scheme, yields no parameters.
/// Each value is taken as the interior of its quoted string: the first and
/// last characters are dropped without checking that they are quotes, and
/// the interior is not percent-decoded. `realm` is removed.
pub fn parse_authorization_header(header: Option<&str>) -> SignResult<Parameters> {
    let mut params = Parameters::new();
    let header = match header {
        Some(header) => header,
        None => return Ok(params),
    };
    let rest = match header.get(..OAUTH_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(OAUTH_SCHEME) => {
            &header[OAUTH_SCHEME.len()..]
        }
        _ => return Ok(params),
    };

    for part in rest.split(',') {
        let part = part.trim();
        let param = part.split('=').collect::<Vec<&str>>();
        if param.len() != 2 || param[1].is_empty() {
            return Err(SignError::MalformedAuthorizationHeader(part.to_string()));
        }
        let value = strip_quotes(param[1])
            .ok_or_else(|| SignError::MalformedAuthorizationHeader(part.to_string()))?;
        params.add(param[0], value);
    }

    params.remove(REALM_KEY);
    Ok(params)
}

/// Drops the first and last character. `None` when there is no interior.
fn strip_quotes(value: &str) -> Option<&str> {
    let mut chars = value.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

/// Serializes every `oauth_*` parameter into an `OAuth ...` header value.
///
/// Only the first value of each name is emitted. Names appear in the
/// iteration order of `params`. Without any `oauth_*` parameter the value
/// is the bare scheme `OAuth`.
pub fn make_authorization_header(params: &Parameters) -> String {
    let fields = params
        .groups()
        .filter(|(name, _)| name.starts_with(OAUTH_KEY_PREFIX.as_bytes()))
        .filter_map(|(name, values)| values.first().map(|value| (name, value)))
        .map(|(name, value)| format!("{}=\"{}\"", encode(name), encode(value)))
        .collect::<Vec<String>>();
    if fields.is_empty() {
        return OAUTH_SCHEME.trim_end().to_string();
    }
    format!("{}{}", OAUTH_SCHEME, fields.join(","))
}
