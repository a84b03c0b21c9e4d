use super::model::RiverPayload;
use thiserror::Error;

/// Errors produced while decoding a river body.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Body (or the callback argument) is not a valid river document
    #[error("Invalid river JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Body looked like `callback(...)` but the wrapper was broken
    #[error("Malformed JSONP wrapper: {0}")]
    MalformedCallback(&'static str),
}

/// Decode a river body that is either plain JSON or JSONP.
///
/// JSONP bodies have the shape `name({...})` with an optional trailing `;`.
/// The callback name is not checked against a fixed value.
pub fn decode(body: &[u8]) -> Result<RiverPayload, PayloadError> {
    let json = unwrap_callback(body)?;
    Ok(serde_json::from_slice(json)?)
}

fn unwrap_callback(body: &[u8]) -> Result<&[u8], PayloadError> {
    let trimmed = body.trim_ascii();
    let trimmed = trimmed.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(trimmed); // BOM

    match trimmed.first() {
        None => return Err(PayloadError::MalformedCallback("empty body")),
        Some(b'{') | Some(b'[') => return Ok(trimmed),
        Some(_) => {}
    }

    let open = trimmed
        .iter()
        .position(|&b| b == b'(')
        .ok_or(PayloadError::MalformedCallback("missing '('"))?;

    let name = trimmed[..open].trim_ascii();
    let valid_name = !name.is_empty()
        && name
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.'));
    if !valid_name {
        return Err(PayloadError::MalformedCallback("invalid callback name"));
    }

    let rest = trimmed[open + 1..].trim_ascii_end();
    let rest = rest.strip_suffix(b";").unwrap_or(rest).trim_ascii_end();
    let inner = rest
        .strip_suffix(b")")
        .ok_or(PayloadError::MalformedCallback("missing ')'"))?;

    Ok(inner.trim_ascii())
}
