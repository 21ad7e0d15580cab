//! Error taxonomy mirroring the native SDK status codes.
//!
//! Every native call returns an integer status. Non-zero codes are converted
//! into exactly one [`Error`] variant at the call site; unmapped codes fail
//! closed to [`Error::Unrecognized`] rather than panicking. No retries are
//! attempted anywhere in this layer.

use thiserror::Error;

use crate::sdk::Status;

/// Errors surfaced by the bridge.
///
/// One variant per documented native status code, plus [`Error::MalformedHeader`]
/// for client-side frame/header decoding failures and [`Error::Unrecognized`]
/// for status codes this crate does not know about.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Device communication failed (native status -1).
    #[error("device communication failed")]
    DeviceCommunication,
    /// An invalid parameter was passed, either rejected client-side before any
    /// native call or reported by the native layer (status -2).
    #[error("invalid parameter")]
    InvalidParameter,
    /// A permissions error occurred (native status -3).
    #[error("permissions error")]
    Permissions,
    /// A command was issued but there is no device (native status -4).
    #[error("no device")]
    NoDevice,
    /// A device was expected to be found but was not (native status -5).
    #[error("device not found")]
    DeviceNotFound,
    /// A request was made but the device is busy (native status -6).
    #[error("device busy")]
    DeviceBusy,
    /// An operation timed out (native status -7).
    #[error("operation timed out")]
    Timeout,
    /// Overflow was detected (native status -8).
    #[error("overflow detected")]
    Overflow,
    /// An unknown request was made (native status -9).
    #[error("unknown request")]
    UnknownRequest,
    /// An operation was interrupted (native status -10).
    #[error("operation interrupted")]
    Interrupted,
    /// The host ran out of memory (native status -11).
    #[error("out of memory")]
    OutOfMemory,
    /// The request is not supported (native status -12).
    #[error("request not supported")]
    NotSupported,
    /// An otherwise unclassified error occurred (native status -99).
    #[error("other error")]
    Other,
    /// The request cannot be performed (native status -103).
    #[error("cannot perform request")]
    CannotPerformRequest,
    /// Flash access failed (native status -104).
    #[error("flash access failure")]
    FlashAccessFailure,
    /// The native layer reported an implementation error (native status -105).
    #[error("implementation error")]
    ImplementationError,
    /// A request is already pending (native status -106).
    #[error("request already pending")]
    RequestPending,
    /// An invalid firmware image was encountered (native status -107).
    #[error("invalid firmware image")]
    InvalidFirmwareImage,
    /// An invalid key was encountered (native status -108).
    #[error("invalid key")]
    InvalidKey,
    /// Sensor communication failed (native status -109).
    #[error("sensor communication failed")]
    SensorCommunication,
    /// A value is out of range (native status -301).
    #[error("value out of range")]
    OutOfRange,
    /// A verification step failed (native status -302).
    #[error("verification failed")]
    VerifyFailed,
    /// A system call failed (native status -303).
    #[error("system call failed")]
    SystemCallFailed,
    /// A file does not exist but should (native status -400).
    #[error("file does not exist")]
    FileDoesNotExist,
    /// A directory does not exist but should (native status -401).
    #[error("directory does not exist")]
    DirectoryDoesNotExist,
    /// A file read failed (native status -402).
    #[error("file read failed")]
    FileReadFailed,
    /// A file write failed (native status -403).
    #[error("file write failed")]
    FileWriteFailed,
    /// The requested function is not implemented (native status -1000).
    #[error("not implemented")]
    NotImplemented,
    /// The operation requires a paired device (native status -1001).
    #[error("device not paired")]
    NotPaired,
    /// A frame or header buffer was empty, truncated, or otherwise unusable.
    #[error("malformed or truncated frame buffer")]
    MalformedHeader,
    /// A status code or enumerated value this crate does not recognize.
    #[error("unrecognized native status or value: {0}")]
    Unrecognized(i32),
}

impl Error {
    /// Maps a non-zero native status code to its error variant.
    ///
    /// Unmapped codes become [`Error::Unrecognized`]; they are logged but never
    /// panic, since the native layer is free to grow new codes.
    pub fn from_status(status: Status) -> Self {
        match status.code() {
            -1 => Error::DeviceCommunication,
            -2 => Error::InvalidParameter,
            -3 => Error::Permissions,
            -4 => Error::NoDevice,
            -5 => Error::DeviceNotFound,
            -6 => Error::DeviceBusy,
            -7 => Error::Timeout,
            -8 => Error::Overflow,
            -9 => Error::UnknownRequest,
            -10 => Error::Interrupted,
            -11 => Error::OutOfMemory,
            -12 => Error::NotSupported,
            -99 => Error::Other,
            -103 => Error::CannotPerformRequest,
            -104 => Error::FlashAccessFailure,
            -105 => Error::ImplementationError,
            -106 => Error::RequestPending,
            -107 => Error::InvalidFirmwareImage,
            -108 => Error::InvalidKey,
            -109 => Error::SensorCommunication,
            -301 => Error::OutOfRange,
            -302 => Error::VerifyFailed,
            -303 => Error::SystemCallFailed,
            -400 => Error::FileDoesNotExist,
            -401 => Error::DirectoryDoesNotExist,
            -402 => Error::FileReadFailed,
            -403 => Error::FileWriteFailed,
            -1000 => Error::NotImplemented,
            -1001 => Error::NotPaired,
            code => {
                tracing::warn!(code, "unmapped native status code");
                Error::Unrecognized(code)
            }
        }
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Error::from_status(status)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_timeout_only() {
        assert_eq!(Error::from_status(Status::new(-7)), Error::Timeout);
    }

    #[test]
    fn test_every_documented_code_has_a_variant() {
        let codes = [
            -1, -2, -3, -4, -5, -6, -7, -8, -9, -10, -11, -12, -99, -103, -104,
            -105, -106, -107, -108, -109, -301, -302, -303, -400, -401, -402,
            -403, -1000, -1001,
        ];
        for code in codes {
            let err = Error::from_status(Status::new(code));
            assert!(
                !matches!(err, Error::Unrecognized(_)),
                "code {} should map to a named variant",
                code
            );
        }
    }

    #[test]
    fn test_unmapped_code_fails_closed() {
        assert_eq!(
            Error::from_status(Status::new(-12345)),
            Error::Unrecognized(-12345)
        );
    }
}
