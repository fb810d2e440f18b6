use core::fmt;

/// A result type defaulting to the crate's configuration [`Error`].
///
/// Only construction is fallible; once an engine exists, claiming IDs is
/// total and never returns an error.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Configuration errors raised while building a [`MachineIdPool`] or a
/// [`Turboflake`] engine.
///
/// All variants are detected synchronously at construction time and are fully
/// recoverable by reconstructing with corrected arguments.
///
/// [`MachineIdPool`]: crate::MachineIdPool
/// [`Turboflake`]: crate::Turboflake
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The machine-id set was empty.
    MissingMachineIds,

    /// More candidates were supplied than distinct 16-bit machine IDs exist.
    TooManyMachineIds {
        /// Number of candidates supplied.
        count: usize,
    },

    /// A machine ID fell outside the addressable `[0, 65535]` range.
    MachineIdOutOfRange {
        /// The offending value.
        value: i64,
    },

    /// The same machine ID was supplied more than once.
    DuplicateMachineId {
        /// The duplicated value.
        value: u16,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingMachineIds => {
                write!(f, "At least one machine ID must be provided")
            }
            Self::TooManyMachineIds { count } => {
                write!(f, "Too many machine IDs, maximum is 65536 (got {count})")
            }
            Self::MachineIdOutOfRange { value } => {
                write!(f, "Machine IDs must be in range [0, 65535] (got {value})")
            }
            Self::DuplicateMachineId { value } => {
                write!(f, "Duplicate machine IDs are not allowed (got {value})")
            }
        }
    }
}

impl core::error::Error for Error {}
