use heapless::String;

use crate::error::EncodeError;

/// Longest module identifier accepted on the wire.
pub const MODULE_CAPACITY: usize = 16;

/// Longest command identifier accepted on the wire.
pub const COMMAND_CAPACITY: usize = 32;

/// Command that asks the engine for a module's full parameter set.
pub const GET_DATA: &str = "get_data";

/// Module targeted by a state request that names no module.
pub const DEFAULT_MODULE: &str = "filter";

/// Fixed-capacity module identifier.
pub type ModuleName = String<MODULE_CAPACITY>;

/// Fixed-capacity command identifier.
pub type CommandName = String<COMMAND_CAPACITY>;

/// The amount carried by a command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload {
    /// No amount (toggles, steps, state requests).
    None,
    /// Relative step: `true` increases, `false` decreases.
    Increase(bool),
    /// Absolute value, normally in `0.0..=1.0`.
    Value(f32),
}

/// One command record, outbound (control change) or inbound (set value).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterUpdate {
    /// Engine module the record addresses (`"filter"`, `"mco"`, `"lfo"`, ...).
    pub module: ModuleName,
    /// Instance of the module (LFO 0–3; 0 for single-instance modules).
    pub slot: u8,
    /// Parameter or action name.
    pub command: CommandName,
    /// Amount, if any.
    pub payload: Payload,
}

impl ParameterUpdate {
    /// Build a record, failing if an identifier exceeds its capacity.
    pub fn new(module: &str, slot: u8, command: &str, payload: Payload) -> Result<Self, EncodeError> {
        Ok(Self {
            module: bounded(module)?,
            slot,
            command: bounded(command)?,
            payload,
        })
    }

    /// A `get_data` request for `module`/`slot`.
    pub fn request_state(module: &str, slot: u8) -> Result<Self, EncodeError> {
        Self::new(module, slot, GET_DATA, Payload::None)
    }

    /// Returns `true` if this record asks for a full state refresh.
    pub fn is_state_request(&self) -> bool {
        self.command.as_str() == GET_DATA && self.payload == Payload::None
    }

    /// The numeric value, if the payload carries one.
    pub fn value(&self) -> Option<f32> {
        match self.payload {
            Payload::Value(v) => Some(v),
            _ => None,
        }
    }
}

pub(crate) fn bounded<const N: usize>(s: &str) -> Result<String<N>, EncodeError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| EncodeError::IdentifierTooLong)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_copies_identifiers() {
        let update = ParameterUpdate::new("filter", 0, "cutoff", Payload::Increase(true)).unwrap();
        assert_eq!(update.module.as_str(), "filter");
        assert_eq!(update.slot, 0);
        assert_eq!(update.command.as_str(), "cutoff");
        assert_eq!(update.payload, Payload::Increase(true));
    }

    #[test]
    fn new_rejects_long_module() {
        let result = ParameterUpdate::new("a-module-name-way-too-long", 0, "x", Payload::None);
        assert_eq!(result, Err(EncodeError::IdentifierTooLong));
    }

    #[test]
    fn request_state_is_state_request() {
        let update = ParameterUpdate::request_state("lfo", 2).unwrap();
        assert!(update.is_state_request());
        assert_eq!(update.slot, 2);
        assert_eq!(update.value(), None);
    }

    #[test]
    fn value_accessor() {
        let update = ParameterUpdate::new("mco", 0, "vol", Payload::Value(0.25)).unwrap();
        assert_eq!(update.value(), Some(0.25));
        assert!(!update.is_state_request());
    }
}
