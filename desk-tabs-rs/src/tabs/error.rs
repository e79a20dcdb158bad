use core::fmt;

/// Reasons a tab rejects an inbound update.
///
/// The tab's state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TabError {
    /// The update addresses a different module or slot.
    ForeignModule,
    /// The command names no parameter of this tab.
    UnknownCommand,
    /// The update carries no numeric value.
    MissingValue,
    /// A waveform index outside the known waveforms.
    InvalidWaveform,
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TabError::ForeignModule => write!(f, "update for another module"),
            TabError::UnknownCommand => write!(f, "unknown parameter"),
            TabError::MissingValue => write!(f, "update carries no value"),
            TabError::InvalidWaveform => write!(f, "invalid waveform index"),
        }
    }
}
