use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a value was complete
    UnexpectedEof { needed: usize, remaining: usize },
    /// Input was left over after the value was complete
    TrailingBytes(usize),
    UlebOverflow,
    NonCanonicalUleb,
    LengthTooLarge(u64),
    InvalidBool(u8),
    InvalidUtf8,
    InvalidIdentifier(String),
    UnknownTypeTag(u64),
    /// Signer arguments are injected by the VM and never appear in a call
    UnsupportedSigner,
    /// `vector<vector<T>>` arguments are not supported
    NestedVector,
    /// Type tag nesting went past the given depth
    TooDeep(usize),
    UnknownVariant { kind: &'static str, index: u64 },
    /// A length prefixed field whose length is fixed by its type
    InvalidLength {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEof { needed, remaining } => write!(
                f,
                "Unexpected end of input, needed {needed} bytes but {remaining} remain"
            ),
            DecodeError::TrailingBytes(n) => write!(f, "{n} trailing bytes found at the end of input"),
            DecodeError::UlebOverflow => write!(f, "ULEB128 value overflows 64 bits"),
            DecodeError::NonCanonicalUleb => write!(f, "ULEB128 value is not canonically encoded"),
            DecodeError::LengthTooLarge(len) => write!(f, "Sequence length {len} is too large"),
            DecodeError::InvalidBool(b) => write!(f, "Invalid boolean byte {b:#04x}"),
            DecodeError::InvalidUtf8 => write!(f, "Unable to decode valid utf8 string"),
            DecodeError::InvalidIdentifier(s) => write!(f, "Invalid identifier {s:?}"),
            DecodeError::UnknownTypeTag(tag) => write!(f, "Unknown type tag {tag}"),
            DecodeError::UnsupportedSigner => write!(f, "Signer type tag is not supported"),
            DecodeError::NestedVector => write!(f, "Vector of vector is not supported"),
            DecodeError::TooDeep(depth) => write!(f, "Type tag is nested deeper than {depth} levels"),
            DecodeError::UnknownVariant { kind, index } => {
                write!(f, "Unknown {kind} variant {index}")
            }
            DecodeError::InvalidLength {
                kind,
                expected,
                got,
            } => write!(f, "Invalid {kind} length {got}, expected {expected}"),
        }
    }
}

impl std::error::Error for DecodeError {}
