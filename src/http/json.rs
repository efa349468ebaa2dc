//! JSON response encoding.
//!
//! Responses are serialized with `<`, `>` and `&` written as unicode
//! escapes so a response body can be embedded in an HTML document without
//! being interpreted as markup. U+2028 and U+2029 are escaped as well since
//! they terminate lines in JavaScript string literals.

use super::ApiError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// `serde_json` formatter that escapes HTML-significant characters inside
/// strings. Everything else matches the compact formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            let escape = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            writer.write_all(escape.as_bytes())?;
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serializes `value` to HTML-safe JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON.
pub fn to_json_vec<T>(value: &T) -> serde_json::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Builds a `200 OK` JSON response for `value`.
///
/// The body is fully encoded before the response is built, so an encoding
/// failure produces a clean `500 encode error` instead of a truncated body.
pub fn respond_json<T>(value: &T) -> Response
where
    T: Serialize + ?Sized,
{
    match to_json_vec(value) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode JSON response");
            ApiError::Internal("encode error").into_response()
        },
    }
}
