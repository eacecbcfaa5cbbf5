//! CloudEvents HTTP wire codec.
//!
//! Two wire modes are supported on decode, auto-detected from the request
//! headers:
//!
//! - **Binary mode**: each attribute travels as a `ce-*` header and the HTTP
//!   body is the payload verbatim, its content type taken from the
//!   `content-type` header.
//! - **Structured mode**: the `content-type` is `application/cloudevents+json`
//!   and a single JSON envelope carries all attributes plus the payload in a
//!   `data` member.
//!
//! Encode always emits binary mode; structured output would double-encode
//! JSON payloads for no benefit on the outbound path.
//!
//! The codec never defaults attributes: missing `id`/`type`/`source` decode
//! to `None` and defaulting is the ingestion handler's job. What the codec
//! cannot interpret at all — a missing or unsupported `specversion`, a
//! malformed structured envelope — is a [`DecodeError`].

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use thiserror::Error;

use huebus_core::event::{CloudEvent, SPEC_VERSION};

/// Content type marking a structured-mode request.
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// A decoded event before the ingestion handler applies defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEvent {
    /// `id` attribute, if present on the wire.
    pub id: Option<String>,
    /// `type` attribute, if present on the wire.
    pub event_type: Option<String>,
    /// `source` attribute, if present on the wire.
    pub source: Option<String>,
    /// `specversion` attribute; always present and supported after decode.
    pub spec_version: String,
    /// `subject` attribute, if present.
    pub subject: Option<String>,
    /// Raw `time` attribute. Parsing is lenient and happens at ingestion.
    pub time: Option<String>,
    /// Payload content type, if declared.
    pub data_content_type: Option<String>,
    /// Payload bytes, never parsed here.
    pub data: Vec<u8>,
}

/// Failure to interpret a wire message. Maps to a 400 at the HTTP boundary.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither a `ce-specversion` header nor a structured envelope version.
    #[error("missing required specversion attribute")]
    MissingSpecVersion,

    /// A spec version other than the one supported value.
    #[error("unsupported specversion: {0}")]
    UnsupportedSpecVersion(String),

    /// The structured-mode JSON envelope could not be interpreted.
    #[error("malformed structured event: {0}")]
    MalformedEnvelope(String),

    /// An attribute header was not valid UTF-8.
    #[error("header {0} is not valid UTF-8")]
    InvalidHeader(&'static str),
}

/// Failure to encode an event for the wire.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// An attribute value cannot be carried in an HTTP header.
    #[error("attribute {0} cannot be encoded as a header value")]
    InvalidAttribute(&'static str),
}

/// Decodes an HTTP request into a [`RawEvent`], auto-detecting the mode.
///
/// # Errors
///
/// Returns [`DecodeError`] when the message cannot be interpreted; the
/// caller maps this to a bad-request response.
pub fn decode(headers: &HeaderMap, body: &[u8]) -> Result<RawEvent, DecodeError> {
    if is_structured(headers) {
        decode_structured(body)
    } else {
        decode_binary(headers, body)
    }
}

fn is_structured(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .to_ascii_lowercase()
                .starts_with(STRUCTURED_CONTENT_TYPE)
        })
}

fn decode_binary(headers: &HeaderMap, body: &[u8]) -> Result<RawEvent, DecodeError> {
    let spec_version = attribute(headers, "ce-specversion")?.ok_or(DecodeError::MissingSpecVersion)?;
    if spec_version != SPEC_VERSION {
        return Err(DecodeError::UnsupportedSpecVersion(spec_version));
    }

    Ok(RawEvent {
        id: attribute(headers, "ce-id")?,
        event_type: attribute(headers, "ce-type")?,
        source: attribute(headers, "ce-source")?,
        spec_version,
        subject: attribute(headers, "ce-subject")?,
        time: attribute(headers, "ce-time")?,
        data_content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned),
        data: body.to_vec(),
    })
}

fn attribute(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, DecodeError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|value| Some(value.to_owned()))
            .map_err(|_| DecodeError::InvalidHeader(name)),
    }
}

fn decode_structured(body: &[u8]) -> Result<RawEvent, DecodeError> {
    let envelope: serde_json::Value = serde_json::from_slice(body)
        .map_err(|err| DecodeError::MalformedEnvelope(err.to_string()))?;
    let envelope = envelope
        .as_object()
        .ok_or_else(|| DecodeError::MalformedEnvelope("envelope is not a JSON object".into()))?;

    let spec_version = match envelope.get("specversion") {
        Some(serde_json::Value::String(version)) => version.clone(),
        Some(_) => {
            return Err(DecodeError::MalformedEnvelope(
                "specversion is not a string".into(),
            ));
        }
        None => return Err(DecodeError::MissingSpecVersion),
    };
    if spec_version != SPEC_VERSION {
        return Err(DecodeError::UnsupportedSpecVersion(spec_version));
    }

    let data = match envelope.get("data") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        // A JSON string payload is taken verbatim; any other JSON value is
        // re-serialized compactly. `data_base64` is not supported.
        Some(serde_json::Value::String(text)) => text.clone().into_bytes(),
        Some(value) => serde_json::to_vec(value)
            .map_err(|err| DecodeError::MalformedEnvelope(err.to_string()))?,
    };

    Ok(RawEvent {
        id: envelope_string(envelope, "id")?,
        event_type: envelope_string(envelope, "type")?,
        source: envelope_string(envelope, "source")?,
        spec_version,
        subject: envelope_string(envelope, "subject")?,
        time: envelope_string(envelope, "time")?,
        data_content_type: envelope_string(envelope, "datacontenttype")?,
        data,
    })
}

fn envelope_string(
    envelope: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<String>, DecodeError> {
    match envelope.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(DecodeError::MalformedEnvelope(format!(
            "{key} is not a string"
        ))),
    }
}

/// Encodes an event in binary mode: attributes as headers, payload as body.
///
/// # Errors
///
/// Returns [`EncodeError`] when an attribute value is not a valid HTTP
/// header value.
pub fn encode(event: &CloudEvent) -> Result<(HeaderMap, Vec<u8>), EncodeError> {
    let mut headers = HeaderMap::new();

    set_attribute(&mut headers, "ce-id", &event.id)?;
    set_attribute(&mut headers, "ce-specversion", &event.spec_version)?;
    set_attribute(&mut headers, "ce-type", &event.event_type)?;
    set_attribute(&mut headers, "ce-source", &event.source)?;
    if let Some(subject) = &event.subject {
        set_attribute(&mut headers, "ce-subject", subject)?;
    }
    if let Some(time) = &event.time {
        set_attribute(&mut headers, "ce-time", &time.to_rfc3339())?;
    }

    let content_type = event
        .data_content_type
        .as_deref()
        .unwrap_or("application/json");
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .map_err(|_| EncodeError::InvalidAttribute("datacontenttype"))?,
    );

    Ok((headers, event.data.clone()))
}

fn set_attribute(
    headers: &mut HeaderMap,
    name: &'static str,
    value: &str,
) -> Result<(), EncodeError> {
    let value = HeaderValue::from_str(value).map_err(|_| EncodeError::InvalidAttribute(name))?;
    headers.insert(name, value);
    Ok(())
}
