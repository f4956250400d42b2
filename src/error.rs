use crate::bcs::DecodeError;
use std::fmt;
use std::path::PathBuf;
use std::str::Utf8Error;

/// Custom error implementation that describes possible
/// error states.
///
/// This is shared by a whole crate.
#[derive(Debug)]
pub enum Error {
    /// A binary record could not be decoded
    Decode(DecodeError),
    InvalidHex(String),
    InvalidUtf8(Utf8Error),
    InvalidAddressLength {
        got: usize,
        expected: usize,
    },
    InvalidPrivKeyLength {
        got: usize,
        expected: usize,
    },
    InvalidPublicKey,
    InvalidSignature,
    InvalidIdentifier(String),
    InvalidStructTag {
        input: String,
        reason: String,
    },
    InvalidTypeTag {
        input: String,
        reason: String,
    },
    /// A raw integer does not fit the declared width
    IntegerOverflow {
        value: String,
        bits: u16,
    },
    /// A raw value has a shape the declared type does not accept
    UnexpectedInput {
        expected: &'static str,
        got: String,
    },
    InvalidVectorElement {
        index: usize,
        reason: String,
    },
    /// Wrong number of positional or named arguments
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },
    /// Wrong number of type arguments
    TypeArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },
    MissingArgument {
        function: String,
        name: String,
    },
    /// A supplied value could not be converted to its declared type
    TypeCoercion {
        argument: String,
        expected: String,
        value: String,
        reason: String,
    },
    UnknownFunction(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "Failed to decode binary data: {e}"),
            Error::InvalidHex(val) => write!(f, "Invalid hex string {val:?}"),
            Error::InvalidUtf8(_) => write!(f, "Failed to parse bytes as utf8"),
            Error::InvalidAddressLength { got, expected } => {
                write!(f, "Invalid address length, got {got}, expected {expected}")
            }
            Error::InvalidPrivKeyLength { got, expected } => write!(
                f,
                "Invalid private key length, got {got} expected {expected}"
            ),
            Error::InvalidPublicKey => write!(f, "Invalid ed25519 public key"),
            Error::InvalidSignature => write!(f, "Signature does not match the message"),
            Error::InvalidIdentifier(val) => write!(f, "Invalid Move identifier {val:?}"),
            Error::InvalidStructTag { input, reason } => {
                write!(f, "Invalid struct tag {input:?}: {reason}")
            }
            Error::InvalidTypeTag { input, reason } => {
                write!(f, "Invalid type tag {input:?}: {reason}")
            }
            Error::IntegerOverflow { value, bits } => {
                write!(f, "Value {value} does not fit in {bits} bits")
            }
            Error::UnexpectedInput { expected, got } => {
                write!(f, "Expected {expected}, got {got}")
            }
            Error::InvalidVectorElement { index, reason } => {
                write!(f, "Vector element {index} is invalid: {reason}")
            }
            Error::ArgumentCount {
                function,
                expected,
                got,
            } => write!(
                f,
                "{function} takes {expected} arguments but {got} were supplied"
            ),
            Error::TypeArgumentCount {
                function,
                expected,
                got,
            } => write!(
                f,
                "{function} takes {expected} type arguments but {got} were supplied"
            ),
            Error::MissingArgument { function, name } => {
                write!(f, "Param {name} not found in call to {function}")
            }
            Error::TypeCoercion {
                argument,
                expected,
                value,
                reason,
            } => write!(
                f,
                "Param {argument} expects {expected}, cannot use {value}: {reason}"
            ),
            Error::UnknownFunction(key) => write!(f, "Function {key} not found in abi"),
            Error::Io { path, source } => write!(f, "Failed to read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(inner) => Some(inner),
            Error::InvalidUtf8(inner) => Some(inner),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<Utf8Error> for Error {
    fn from(e: Utf8Error) -> Self {
        Error::InvalidUtf8(e)
    }
}
