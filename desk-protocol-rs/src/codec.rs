//! Conversion between [`ParameterUpdate`]s and JSON lines.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::record::{bounded, ParameterUpdate, Payload, DEFAULT_MODULE, GET_DATA};
use crate::LINE_CAPACITY;

/// One encoded record, newline included.
pub type Line = String<LINE_CAPACITY>;

/// Longest string field accepted while parsing; identifiers are narrowed
/// to their own capacity afterwards.
type WireText = String<LINE_CAPACITY>;

/// Outbound wire shape shared by every record kind.
#[derive(Debug, Default, Serialize)]
struct WireRecord<'a> {
    #[serde(rename = "mod", skip_serializing_if = "Option::is_none")]
    module: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmd: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    increase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f32>,
    #[serde(rename = "log-message", skip_serializing_if = "Option::is_none")]
    log_message: Option<&'a str>,
}

/// Inbound wire shape. Strings are owned so escapes can be resolved.
#[derive(Debug, Default, Deserialize)]
struct InboundWire {
    #[serde(rename = "mod", default)]
    module: Option<WireText>,
    #[serde(default)]
    index: Option<u8>,
    #[serde(default)]
    cmd: Option<WireText>,
    #[serde(default)]
    increase: Option<bool>,
    #[serde(default)]
    value: Option<f32>,
    #[serde(rename = "log-message", default)]
    log_message: Option<WireText>,
}

impl InboundWire {
    fn has_command_fields(&self) -> bool {
        self.module.is_some()
            || self.index.is_some()
            || self.cmd.is_some()
            || self.increase.is_some()
            || self.value.is_some()
    }
}

/// A decoded inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A command addressed to a module.
    Update(ParameterUpdate),
    /// Free-form text for logging only, escapes resolved.
    Diagnostic(Line),
}

/// Encoder for outbound lines.
///
/// Holds the module that a state request without an explicit module falls
/// back to.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    default_module: &'static str,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE)
    }
}

impl Codec {
    /// Create a codec that sends bare state requests to `default_module`.
    pub const fn new(default_module: &'static str) -> Self {
        Self { default_module }
    }

    /// Module used by [`encode_request`](Self::encode_request) when none is given.
    pub fn default_module(&self) -> &'static str {
        self.default_module
    }

    /// Encode one update.
    pub fn encode(&self, update: &ParameterUpdate) -> Result<Line, EncodeError> {
        encode_command(&update.module, update.slot, &update.command, update.payload)
    }

    /// Encode a `get_data` request for `module` (or the default module).
    pub fn encode_request(&self, module: Option<&str>, slot: u8) -> Result<Line, EncodeError> {
        let module = module.unwrap_or(self.default_module);
        encode_command(module, slot, GET_DATA, Payload::None)
    }

    /// Encode a diagnostic line.
    pub fn encode_log(&self, message: &str) -> Result<Line, EncodeError> {
        finish(&WireRecord {
            log_message: Some(message),
            ..WireRecord::default()
        })
    }
}

/// Encode a command record from its parts.
pub fn encode_command(
    module: &str,
    slot: u8,
    command: &str,
    payload: Payload,
) -> Result<Line, EncodeError> {
    let (increase, value) = match payload {
        Payload::None => (None, None),
        Payload::Increase(up) => (Some(up), None),
        Payload::Value(v) if !v.is_finite() => return Err(EncodeError::NonFiniteValue),
        Payload::Value(v) => (None, Some(v)),
    };

    finish(&WireRecord {
        module: Some(module),
        index: Some(slot),
        cmd: Some(command),
        increase,
        value,
        log_message: None,
    })
}

fn finish(record: &WireRecord<'_>) -> Result<Line, EncodeError> {
    let mut line: Line =
        serde_json_core::to_string(record).map_err(|_| EncodeError::BufferFull)?;
    line.push('\n').map_err(|_| EncodeError::BufferFull)?;
    Ok(line)
}

/// Decode one received line (terminator optional).
///
/// JSON escapes in string fields are resolved, so whatever
/// [`encode_command`] or [`Codec::encode_log`] wrote comes back unchanged.
pub fn decode(line: &str) -> Result<Record, DecodeError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut scratch = [0u8; LINE_CAPACITY];
    let (wire, consumed): (InboundWire, usize) =
        serde_json_core::from_str_escaped(text, &mut scratch).map_err(|_| DecodeError::Syntax)?;
    if !text[consumed..].trim().is_empty() {
        return Err(DecodeError::TrailingData);
    }

    if wire.log_message.is_some() && wire.has_command_fields() {
        return Err(DecodeError::MixedRecord);
    }
    if let Some(message) = wire.log_message {
        return Ok(Record::Diagnostic(message));
    }

    let module = wire.module.ok_or(DecodeError::MissingField("mod"))?;
    let slot = wire.index.ok_or(DecodeError::MissingField("index"))?;

    let payload = match (wire.increase, wire.value) {
        (Some(_), Some(_)) => return Err(DecodeError::ConflictingPayload),
        (Some(up), None) => Payload::Increase(up),
        (None, Some(v)) => Payload::Value(v),
        (None, None) => Payload::None,
    };

    let command = match (&wire.cmd, payload) {
        (Some(cmd), _) => cmd.as_str(),
        (None, Payload::None) => GET_DATA,
        (None, _) => return Err(DecodeError::MissingField("cmd")),
    };

    Ok(Record::Update(ParameterUpdate {
        module: bounded(&module).map_err(|_| DecodeError::FieldTooLong("mod"))?,
        slot,
        command: bounded(command).map_err(|_| DecodeError::FieldTooLong("cmd"))?,
        payload,
    }))
}

/// Decode a line that must be a parameter update.
pub fn decode_update(line: &str) -> Result<ParameterUpdate, DecodeError> {
    match decode(line)? {
        Record::Update(update) => Ok(update),
        Record::Diagnostic(_) => Err(DecodeError::NotAnUpdate),
    }
}
