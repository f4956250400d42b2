//! Turns loosely typed caller input into the typed arguments a function
//! descriptor declares.
//!
//! Callers hand over [`RawArg`]s, built from native integers, strings, byte
//! buffers or lists through the `From` impls. [`bind`] checks the call
//! shape against the descriptor and then coerces every value to its
//! declared type, failing with the name of the first argument that does not
//! fit.

use crate::abi::FunctionDescriptor;
use crate::address::AccountAddress;
use crate::error::Error;
use crate::types::{ArgKind, ScalarKind, StructTag, TypeTag, TypedValue, VectorValue};
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use num256::Uint256;
use num_traits::Num;
use std::collections::HashMap;
use std::fmt;

/// A caller supplied argument before it has been checked against a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawArg {
    Bool(bool),
    Int(Uint256),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<RawArg>),
}

impl fmt::Display for RawArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawArg::Bool(v) => write!(f, "{v}"),
            RawArg::Int(v) => write!(f, "{v}"),
            RawArg::Str(v) => write!(f, "{v:?}"),
            RawArg::Bytes(v) => write!(f, "0x{}", bytes_to_hex_str(v)),
            RawArg::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for RawArg {
    fn from(v: bool) -> Self {
        RawArg::Bool(v)
    }
}

macro_rules! raw_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawArg {
                fn from(v: $t) -> Self {
                    RawArg::Int(Uint256::from(v as u64))
                }
            }
        )*
    };
}

raw_from_unsigned!(u8, u16, u32, u64);

impl From<u128> for RawArg {
    fn from(v: u128) -> Self {
        RawArg::Int(Uint256::from_be_bytes(&v.to_be_bytes()))
    }
}

impl From<Uint256> for RawArg {
    fn from(v: Uint256) -> Self {
        RawArg::Int(v)
    }
}

impl From<&str> for RawArg {
    fn from(v: &str) -> Self {
        RawArg::Str(v.to_owned())
    }
}

impl From<String> for RawArg {
    fn from(v: String) -> Self {
        RawArg::Str(v)
    }
}

impl From<&[u8]> for RawArg {
    fn from(v: &[u8]) -> Self {
        RawArg::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for RawArg {
    fn from(v: Vec<u8>) -> Self {
        RawArg::Bytes(v)
    }
}

impl From<AccountAddress> for RawArg {
    fn from(v: AccountAddress) -> Self {
        RawArg::Bytes(v.to_bytes().to_vec())
    }
}

impl From<Vec<RawArg>> for RawArg {
    fn from(v: Vec<RawArg>) -> Self {
        RawArg::List(v)
    }
}

/// The arguments of one call, either all by position or all by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallArgs {
    Positional(Vec<RawArg>),
    Named(HashMap<String, RawArg>),
}

impl CallArgs {
    pub fn len(&self) -> usize {
        match self {
            CallArgs::Positional(args) => args.len(),
            CallArgs::Named(args) => args.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn named<K, V, I>(args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawArg>,
    {
        CallArgs::Named(
            args.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Vec<RawArg>> for CallArgs {
    fn from(v: Vec<RawArg>) -> Self {
        CallArgs::Positional(v)
    }
}

impl From<HashMap<String, RawArg>> for CallArgs {
    fn from(v: HashMap<String, RawArg>) -> Self {
        CallArgs::Named(v)
    }
}

/// A call whose type arguments and arguments match the descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundCall {
    pub type_args: Vec<TypeTag>,
    pub args: Vec<TypedValue>,
}

/// Validates the shape of a call and coerces its arguments.
///
/// Counts are checked before any value is looked at: type arguments first,
/// then arguments, then (for named calls) that every declared name is
/// present. Arguments are coerced in declaration order and the result keeps
/// that order whatever form the call used.
pub fn bind(
    descriptor: &FunctionDescriptor,
    type_args: &[&str],
    args: &CallArgs,
) -> Result<BoundCall, Error> {
    let function = descriptor.function_id();
    if type_args.len() != descriptor.ty_args.len() {
        return Err(Error::TypeArgumentCount {
            function,
            expected: descriptor.ty_args.len(),
            got: type_args.len(),
        });
    }
    if args.len() != descriptor.args.len() {
        return Err(Error::ArgumentCount {
            function,
            expected: descriptor.args.len(),
            got: args.len(),
        });
    }

    let raw: Vec<&RawArg> = match args {
        CallArgs::Positional(values) => values.iter().collect(),
        CallArgs::Named(values) => {
            let mut ordered = Vec::with_capacity(descriptor.args.len());
            for arg in &descriptor.args {
                match values.get(&arg.name) {
                    Some(value) => ordered.push(value),
                    None => {
                        return Err(Error::MissingArgument {
                            function,
                            name: arg.name.clone(),
                        })
                    }
                }
            }
            ordered
        }
    };

    let mut resolved_type_args = Vec::with_capacity(type_args.len());
    for (name, input) in descriptor.ty_args.iter().zip(type_args) {
        let tag: TypeTag = input.parse().map_err(|e: Error| Error::TypeCoercion {
            argument: name.clone(),
            expected: "type".to_owned(),
            value: format!("{input:?}"),
            reason: e.to_string(),
        })?;
        resolved_type_args.push(tag);
    }

    let mut bound = Vec::with_capacity(raw.len());
    for (arg, value) in descriptor.args.iter().zip(raw) {
        let typed = coerce(arg.kind, value).map_err(|e| Error::TypeCoercion {
            argument: arg.name.clone(),
            expected: arg.kind.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        bound.push(typed);
    }
    trace!("Bound {} arguments for {}", bound.len(), function);

    Ok(BoundCall {
        type_args: resolved_type_args,
        args: bound,
    })
}

/// Converts one raw value to the given kind.
pub fn coerce(kind: ArgKind, value: &RawArg) -> Result<TypedValue, Error> {
    match kind {
        ArgKind::Scalar(scalar) => coerce_scalar(scalar, value),
        ArgKind::Vector(element) => coerce_vector(element, value),
    }
}

fn unexpected(expected: &'static str, value: &RawArg) -> Error {
    Error::UnexpectedInput {
        expected,
        got: value.to_string(),
    }
}

fn coerce_scalar(kind: ScalarKind, value: &RawArg) -> Result<TypedValue, Error> {
    match kind {
        ScalarKind::Bool => coerce_bool(value).map(TypedValue::Bool),
        ScalarKind::U8 => {
            let bytes = coerce_uint(value, 8)?;
            Ok(TypedValue::U8(bytes[0]))
        }
        ScalarKind::U64 => {
            let bytes = coerce_uint(value, 64)?;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[..8]);
            Ok(TypedValue::U64(u64::from_le_bytes(buf)))
        }
        ScalarKind::U128 => {
            let bytes = coerce_uint(value, 128)?;
            let mut buf = [0u8; 16];
            buf.copy_from_slice(&bytes[..16]);
            Ok(TypedValue::U128(u128::from_le_bytes(buf)))
        }
        ScalarKind::Address => coerce_address(value).map(TypedValue::Address),
        ScalarKind::Struct => match value {
            RawArg::Str(s) => Ok(TypedValue::Struct(s.parse::<StructTag>()?)),
            other => Err(unexpected("a struct tag string", other)),
        },
    }
}

fn coerce_bool(value: &RawArg) -> Result<bool, Error> {
    match value {
        RawArg::Bool(v) => Ok(*v),
        RawArg::Str(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(unexpected("true or false", value)),
        },
        other => Err(unexpected("a boolean", other)),
    }
}

/// Range checks an unsigned integer against `bits` and returns it as
/// little endian bytes.
fn coerce_uint(value: &RawArg, bits: u16) -> Result<[u8; 32], Error> {
    let int = match value {
        RawArg::Int(v) => *v,
        RawArg::Str(s) => parse_uint(s.trim())?,
        other => return Err(unexpected("an unsigned integer", other)),
    };
    let high = 32 - (bits as usize / 8);
    if int.to_be_bytes()[..high].iter().any(|b| *b != 0) {
        return Err(Error::IntegerOverflow {
            value: int.to_string(),
            bits,
        });
    }
    Ok(int.to_le_bytes())
}

/// Decimal or `0x` prefixed hex, no sign.
fn parse_uint(s: &str) -> Result<Uint256, Error> {
    if s.starts_with('-') {
        return Err(Error::UnexpectedInput {
            expected: "an unsigned integer",
            got: format!("negative value {s}"),
        });
    }
    if let Some(hex) = s.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(s.to_owned()));
        }
        return Uint256::from_str_radix(hex, 16).map_err(|_| Error::IntegerOverflow {
            value: s.to_owned(),
            bits: 256,
        });
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnexpectedInput {
            expected: "a decimal or 0x prefixed hex integer",
            got: format!("{s:?}"),
        });
    }
    s.parse::<Uint256>().map_err(|_| Error::IntegerOverflow {
        value: s.to_owned(),
        bits: 256,
    })
}

fn coerce_address(value: &RawArg) -> Result<AccountAddress, Error> {
    match value {
        RawArg::Str(s) => s.trim().parse(),
        RawArg::Bytes(b) => AccountAddress::try_from(b.as_slice()),
        other => Err(unexpected("a hex address", other)),
    }
}

fn coerce_vector(element: ScalarKind, value: &RawArg) -> Result<TypedValue, Error> {
    let items = match (element, value) {
        (_, RawArg::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let typed = coerce_scalar(element, item).map_err(|e| {
                    Error::InvalidVectorElement {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                out.push(typed);
            }
            out
        }
        (ScalarKind::U8, RawArg::Bytes(bytes)) => {
            bytes.iter().copied().map(TypedValue::U8).collect()
        }
        (ScalarKind::U8, RawArg::Str(s)) if s.starts_with("0x") => hex_str_to_bytes(s)?
            .into_iter()
            .map(TypedValue::U8)
            .collect(),
        (ScalarKind::U8, other) => return Err(unexpected("a list, bytes or 0x hex", other)),
        (_, other) => return Err(unexpected("a list", other)),
    };
    Ok(TypedValue::Vector(VectorValue::new(element, items)?))
}
