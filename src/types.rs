//! Move type tags and the typed values carried as entry-function arguments.
//!
//! A [`TypeTag`] names a type, a [`TypedValue`] is a value of one of the
//! argument types a transaction may carry. Arguments are declared by an
//! [`ArgKind`]: one of the scalar kinds, or a vector of one. Vectors of
//! vectors and `signer` may appear in type tags but never as an argument.

use crate::address::AccountAddress;
use crate::bcs::{self, Decode, DecodeError, Deserializer, Encode, Serializer};
use crate::error::Error;
use crate::utils::bytes_to_hex_str;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const TYPE_TAG_BOOL: u64 = 0;
pub const TYPE_TAG_U8: u64 = 1;
pub const TYPE_TAG_U64: u64 = 2;
pub const TYPE_TAG_U128: u64 = 3;
pub const TYPE_TAG_ADDRESS: u64 = 4;
pub const TYPE_TAG_SIGNER: u64 = 5;
pub const TYPE_TAG_VECTOR: u64 = 6;
pub const TYPE_TAG_STRUCT: u64 = 7;

/// Deepest nesting of vectors and struct type arguments accepted when
/// decoding or parsing a type tag
pub const MAX_TYPE_TAG_DEPTH: usize = 16;

/// Returns true for a valid Move identifier, `[A-Za-z_][A-Za-z0-9_]*`
/// with a lone `_` excluded.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        Some('_') if s.len() > 1 => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn decode_identifier(deserializer: &mut Deserializer<'_>) -> bcs::Result<String> {
    let s = deserializer.str()?;
    if is_valid_identifier(&s) {
        Ok(s)
    } else {
        Err(DecodeError::InvalidIdentifier(s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

impl TypeTag {
    pub fn variant_index(&self) -> u64 {
        match self {
            TypeTag::Bool => TYPE_TAG_BOOL,
            TypeTag::U8 => TYPE_TAG_U8,
            TypeTag::U64 => TYPE_TAG_U64,
            TypeTag::U128 => TYPE_TAG_U128,
            TypeTag::Address => TYPE_TAG_ADDRESS,
            TypeTag::Signer => TYPE_TAG_SIGNER,
            TypeTag::Vector(_) => TYPE_TAG_VECTOR,
            TypeTag::Struct(_) => TYPE_TAG_STRUCT,
        }
    }
}

impl Encode for TypeTag {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.uleb128(self.variant_index());
        match self {
            TypeTag::Vector(element) => element.encode(serializer),
            TypeTag::Struct(tag) => tag.encode(serializer),
            _ => {}
        }
    }
}

impl TypeTag {
    fn decode_nested(deserializer: &mut Deserializer<'_>, depth: usize) -> bcs::Result<Self> {
        if depth > MAX_TYPE_TAG_DEPTH {
            return Err(DecodeError::TooDeep(MAX_TYPE_TAG_DEPTH));
        }
        match deserializer.uleb128()? {
            TYPE_TAG_BOOL => Ok(TypeTag::Bool),
            TYPE_TAG_U8 => Ok(TypeTag::U8),
            TYPE_TAG_U64 => Ok(TypeTag::U64),
            TYPE_TAG_U128 => Ok(TypeTag::U128),
            TYPE_TAG_ADDRESS => Ok(TypeTag::Address),
            TYPE_TAG_SIGNER => Ok(TypeTag::Signer),
            TYPE_TAG_VECTOR => Ok(TypeTag::Vector(Box::new(TypeTag::decode_nested(
                deserializer,
                depth + 1,
            )?))),
            TYPE_TAG_STRUCT => Ok(TypeTag::Struct(Box::new(StructTag::decode_nested(
                deserializer,
                depth + 1,
            )?))),
            other => Err(DecodeError::UnknownTypeTag(other)),
        }
    }
}

impl Decode for TypeTag {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        TypeTag::decode_nested(deserializer, 0)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(element) => write!(f, "vector<{element}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| Error::InvalidTypeTag {
            input: s.to_owned(),
            reason,
        };
        let mut parser = TypeParser::new(s).map_err(fail)?;
        let tag = parser.parse_type(0).map_err(fail)?;
        parser.finish().map_err(fail)?;
        Ok(tag)
    }
}

/// A fully qualified struct type, `address::module::Name<T1, T2>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub type_args: Vec<TypeTag>,
}

impl Encode for StructTag {
    fn encode(&self, serializer: &mut Serializer) {
        self.address.encode(serializer);
        serializer.str(&self.module);
        serializer.str(&self.name);
        serializer.sequence(&self.type_args);
    }
}

impl StructTag {
    fn decode_nested(deserializer: &mut Deserializer<'_>, depth: usize) -> bcs::Result<Self> {
        Ok(StructTag {
            address: AccountAddress::decode(deserializer)?,
            module: decode_identifier(deserializer)?,
            name: decode_identifier(deserializer)?,
            type_args: deserializer.sequence(|de| TypeTag::decode_nested(de, depth))?,
        })
    }
}

impl Decode for StructTag {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        StructTag::decode_nested(deserializer, 0)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.short_string(),
            self.module,
            self.name
        )?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = Error;

    /// Parses `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>` style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| Error::InvalidStructTag {
            input: s.to_owned(),
            reason,
        };
        let mut parser = TypeParser::new(s).map_err(fail)?;
        let tag = parser.parse_type(0).map_err(fail)?;
        parser.finish().map_err(fail)?;
        match tag {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(fail(format!("{other} is not a struct type"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    ColonColon,
    Lt,
    Gt,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "{name:?}"),
            Token::ColonColon => write!(f, "'::'"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

fn tokenize(s: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '<' => tokens.push(Token::Lt),
            '>' => tokens.push(Token::Gt),
            ',' => tokens.push(Token::Comma),
            ':' => match chars.next() {
                Some((_, ':')) => tokens.push(Token::ColonColon),
                _ => return Err(format!("single ':' at offset {i}")),
            },
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end = j + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(s[i..end].to_owned()));
            }
            other => return Err(format!("unexpected character {other:?} at offset {i}")),
        }
    }
    Ok(tokens)
}

/// Recursive descent over the tokens of a type name.
struct TypeParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TypeParser {
    fn new(s: &str) -> Result<Self, String> {
        Ok(TypeParser {
            tokens: tokenize(s)?,
            pos: 0,
        })
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected}, found {token}")),
            None => Err(format!("expected {expected}, found end of input")),
        }
    }

    fn identifier(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Token::Name(name)) if is_valid_identifier(&name) => Ok(name),
            Some(Token::Name(name)) => Err(format!("{name:?} is not a valid identifier")),
            Some(token) => Err(format!("expected identifier, found {token}")),
            None => Err("expected identifier, found end of input".to_owned()),
        }
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeTag, String> {
        if depth > MAX_TYPE_TAG_DEPTH {
            return Err(format!("nested deeper than {MAX_TYPE_TAG_DEPTH} levels"));
        }
        let name = match self.next() {
            Some(Token::Name(name)) => name,
            Some(token) => return Err(format!("expected type, found {token}")),
            None => return Err("expected type, found end of input".to_owned()),
        };
        if self.peek() == Some(&Token::ColonColon) {
            return self.parse_struct(&name, depth);
        }
        match name.as_str() {
            "bool" => Ok(TypeTag::Bool),
            "u8" => Ok(TypeTag::U8),
            "u64" => Ok(TypeTag::U64),
            "u128" => Ok(TypeTag::U128),
            "address" => Ok(TypeTag::Address),
            "signer" => Ok(TypeTag::Signer),
            "vector" => {
                self.expect(Token::Lt)?;
                let element = self.parse_type(depth + 1)?;
                self.expect(Token::Gt)?;
                Ok(TypeTag::Vector(Box::new(element)))
            }
            other => Err(format!("unknown type {other:?}, missing '::'?")),
        }
    }

    fn parse_struct(&mut self, address: &str, depth: usize) -> Result<TypeTag, String> {
        let address: AccountAddress = address
            .parse()
            .map_err(|e| format!("bad address {address:?}: {e}"))?;
        self.expect(Token::ColonColon)?;
        let module = self.identifier()?;
        self.expect(Token::ColonColon)?;
        let name = self.identifier()?;
        let mut type_args = Vec::new();
        if self.peek() == Some(&Token::Lt) {
            self.next();
            loop {
                type_args.push(self.parse_type(depth + 1)?);
                match self.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::Gt) => break,
                    Some(token) => return Err(format!("expected ',' or '>', found {token}")),
                    None => return Err("unbalanced '<'".to_owned()),
                }
            }
        }
        Ok(TypeTag::Struct(Box::new(StructTag {
            address,
            module,
            name,
            type_args,
        })))
    }

    fn finish(&self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(Token::Gt) => Err("unbalanced '>'".to_owned()),
            Some(token) => Err(format!("unexpected trailing {token}")),
        }
    }
}

/// The types a single value (or vector element) may have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Struct,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Bool => write!(f, "bool"),
            ScalarKind::U8 => write!(f, "u8"),
            ScalarKind::U64 => write!(f, "u64"),
            ScalarKind::U128 => write!(f, "u128"),
            ScalarKind::Address => write!(f, "address"),
            ScalarKind::Struct => write!(f, "struct"),
        }
    }
}

impl ScalarKind {
    fn from_type_tag(tag: &TypeTag) -> bcs::Result<ScalarKind> {
        match tag {
            TypeTag::Bool => Ok(ScalarKind::Bool),
            TypeTag::U8 => Ok(ScalarKind::U8),
            TypeTag::U64 => Ok(ScalarKind::U64),
            TypeTag::U128 => Ok(ScalarKind::U128),
            TypeTag::Address => Ok(ScalarKind::Address),
            TypeTag::Struct(_) => Ok(ScalarKind::Struct),
            TypeTag::Signer => Err(DecodeError::UnsupportedSigner),
            TypeTag::Vector(_) => Err(DecodeError::NestedVector),
        }
    }

    /// The type tag discriminant naming this kind.
    pub fn variant_index(self) -> u64 {
        match self {
            ScalarKind::Bool => TYPE_TAG_BOOL,
            ScalarKind::U8 => TYPE_TAG_U8,
            ScalarKind::U64 => TYPE_TAG_U64,
            ScalarKind::U128 => TYPE_TAG_U128,
            ScalarKind::Address => TYPE_TAG_ADDRESS,
            ScalarKind::Struct => TYPE_TAG_STRUCT,
        }
    }

    fn from_variant_index(index: u64) -> bcs::Result<ScalarKind> {
        match index {
            TYPE_TAG_BOOL => Ok(ScalarKind::Bool),
            TYPE_TAG_U8 => Ok(ScalarKind::U8),
            TYPE_TAG_U64 => Ok(ScalarKind::U64),
            TYPE_TAG_U128 => Ok(ScalarKind::U128),
            TYPE_TAG_ADDRESS => Ok(ScalarKind::Address),
            TYPE_TAG_STRUCT => Ok(ScalarKind::Struct),
            TYPE_TAG_SIGNER => Err(DecodeError::UnsupportedSigner),
            TYPE_TAG_VECTOR => Err(DecodeError::NestedVector),
            other => Err(DecodeError::UnknownTypeTag(other)),
        }
    }
}

/// The declared type class of an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Scalar(ScalarKind),
    Vector(ScalarKind),
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Scalar(kind) => write!(f, "{kind}"),
            ArgKind::Vector(kind) => write!(f, "vector<{kind}>"),
        }
    }
}

impl TryFrom<&TypeTag> for ArgKind {
    type Error = DecodeError;

    fn try_from(tag: &TypeTag) -> Result<Self, Self::Error> {
        match tag {
            TypeTag::Vector(element) => ScalarKind::from_type_tag(element).map(ArgKind::Vector),
            other => ScalarKind::from_type_tag(other).map(ArgKind::Scalar),
        }
    }
}

/// Argument records carry bare discriminants: one for a scalar, the vector
/// discriminant followed by the element's for a vector. A struct kind has
/// no body.
impl Encode for ArgKind {
    fn encode(&self, serializer: &mut Serializer) {
        match self {
            ArgKind::Scalar(kind) => serializer.uleb128(kind.variant_index()),
            ArgKind::Vector(element) => {
                serializer.uleb128(TYPE_TAG_VECTOR);
                serializer.uleb128(element.variant_index());
            }
        }
    }
}

impl Decode for ArgKind {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        match deserializer.uleb128()? {
            TYPE_TAG_VECTOR => Ok(ArgKind::Vector(ScalarKind::from_variant_index(
                deserializer.uleb128()?,
            )?)),
            other => ScalarKind::from_variant_index(other).map(ArgKind::Scalar),
        }
    }
}

/// A homogeneous vector, every item has the element kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorValue {
    element: ScalarKind,
    items: Vec<TypedValue>,
}

impl VectorValue {
    pub fn new(element: ScalarKind, items: Vec<TypedValue>) -> Result<Self, Error> {
        for (index, item) in items.iter().enumerate() {
            if item.kind() != ArgKind::Scalar(element) {
                return Err(Error::InvalidVectorElement {
                    index,
                    reason: format!("expected {element}, got {}", item.kind()),
                });
            }
        }
        Ok(VectorValue { element, items })
    }

    pub fn element(&self) -> ScalarKind {
        self.element
    }

    pub fn items(&self) -> &[TypedValue] {
        &self.items
    }
}

/// A value ready to be serialized as a transaction argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedValue {
    Bool(bool),
    U8(u8),
    U64(u64),
    U128(u128),
    Address(AccountAddress),
    Struct(StructTag),
    Vector(VectorValue),
}

impl TypedValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            TypedValue::Bool(_) => ArgKind::Scalar(ScalarKind::Bool),
            TypedValue::U8(_) => ArgKind::Scalar(ScalarKind::U8),
            TypedValue::U64(_) => ArgKind::Scalar(ScalarKind::U64),
            TypedValue::U128(_) => ArgKind::Scalar(ScalarKind::U128),
            TypedValue::Address(_) => ArgKind::Scalar(ScalarKind::Address),
            TypedValue::Struct(_) => ArgKind::Scalar(ScalarKind::Struct),
            TypedValue::Vector(v) => ArgKind::Vector(v.element),
        }
    }

    pub fn encode(&self, serializer: &mut Serializer) {
        match self {
            TypedValue::Bool(v) => serializer.bool(*v),
            TypedValue::U8(v) => serializer.u8(*v),
            TypedValue::U64(v) => serializer.u64(*v),
            TypedValue::U128(v) => serializer.u128(*v),
            TypedValue::Address(v) => v.encode(serializer),
            TypedValue::Struct(v) => v.encode(serializer),
            TypedValue::Vector(v) => {
                serializer.uleb128(v.items.len() as u64);
                for item in &v.items {
                    item.encode(serializer);
                }
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.encode(&mut serializer);
        serializer.into_bytes()
    }

    fn decode_scalar(kind: ScalarKind, deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        Ok(match kind {
            ScalarKind::Bool => TypedValue::Bool(deserializer.bool()?),
            ScalarKind::U8 => TypedValue::U8(deserializer.u8()?),
            ScalarKind::U64 => TypedValue::U64(deserializer.u64()?),
            ScalarKind::U128 => TypedValue::U128(deserializer.u128()?),
            ScalarKind::Address => TypedValue::Address(AccountAddress::decode(deserializer)?),
            ScalarKind::Struct => TypedValue::Struct(StructTag::decode(deserializer)?),
        })
    }

    /// Reads one value of the given kind.
    pub fn decode(kind: ArgKind, deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        match kind {
            ArgKind::Scalar(scalar) => TypedValue::decode_scalar(scalar, deserializer),
            ArgKind::Vector(element) => {
                let items =
                    deserializer.sequence(|de| TypedValue::decode_scalar(element, de))?;
                Ok(TypedValue::Vector(VectorValue { element, items }))
            }
        }
    }

    /// Decodes a complete argument, leftover bytes are an error.
    pub fn from_bytes(kind: ArgKind, bytes: &[u8]) -> bcs::Result<Self> {
        let mut deserializer = Deserializer::new(bytes);
        let value = TypedValue::decode(kind, &mut deserializer)?;
        deserializer.end()?;
        Ok(value)
    }

    /// JSON form used by the node's JSON submission API, wide integers are
    /// decimal strings and byte vectors are hex.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Bool(v) => Value::Bool(*v),
            TypedValue::U8(v) => Value::from(*v),
            TypedValue::U64(v) => Value::String(v.to_string()),
            TypedValue::U128(v) => Value::String(v.to_string()),
            TypedValue::Address(v) => Value::String(v.to_string()),
            TypedValue::Struct(v) => Value::String(v.to_string()),
            TypedValue::Vector(v) if v.element == ScalarKind::U8 => {
                let bytes: Vec<u8> = v
                    .items
                    .iter()
                    .filter_map(|item| match item {
                        TypedValue::U8(b) => Some(*b),
                        _ => None,
                    })
                    .collect();
                Value::String(format!("0x{}", bytes_to_hex_str(&bytes)))
            }
            TypedValue::Vector(v) => Value::Array(v.items.iter().map(TypedValue::to_json).collect()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(v) => write!(f, "{v}"),
            TypedValue::U8(v) => write!(f, "{v}u8"),
            TypedValue::U64(v) => write!(f, "{v}u64"),
            TypedValue::U128(v) => write!(f, "{v}u128"),
            TypedValue::Address(v) => write!(f, "@{}", v.short_string()),
            TypedValue::Struct(v) => write!(f, "{v}"),
            TypedValue::Vector(v) => {
                write!(f, "[")?;
                for (i, item) in v.items.iter().enumerate() {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_store() -> StructTag {
        "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
            .parse()
            .unwrap()
    }

    #[test]
    fn parse_generic_struct_tag() {
        let tag = coin_store();
        assert_eq!(tag.address, AccountAddress::ONE);
        assert_eq!(tag.module, "coin");
        assert_eq!(tag.name, "CoinStore");
        assert_eq!(tag.type_args.len(), 1);
        match &tag.type_args[0] {
            TypeTag::Struct(inner) => {
                assert_eq!(inner.module, "aptos_coin");
                assert_eq!(inner.name, "AptosCoin");
                assert!(inner.type_args.is_empty());
            }
            other => panic!("expected struct argument, got {other}"),
        }
    }

    #[test]
    fn struct_tag_display_parses_back() {
        let input = " 0x00001::pool::Pool < u64,vector<0x1::string::String> , address> ";
        let tag: StructTag = input.parse().unwrap();
        assert_eq!(
            tag.to_string(),
            "0x1::pool::Pool<u64, vector<0x1::string::String>, address>"
        );
        assert_eq!(tag.to_string().parse::<StructTag>().unwrap(), tag);
    }

    #[test]
    fn reject_malformed_struct_tags() {
        for bad in [
            "0x1::coin",
            "0x1:coin::Coin",
            "0x1::coin::Coin<0x1::aptos_coin::AptosCoin",
            "0x1::coin::Coin<0x1::aptos_coin::AptosCoin>>",
            "0x1::coin::Coin<>",
            "coin::Coin",
            "0xzz::coin::Coin",
            "0x1::9coin::Coin",
            "u64",
            "",
        ] {
            match bad.parse::<StructTag>() {
                Err(Error::InvalidStructTag { input, .. }) => assert_eq!(input, bad),
                other => panic!("{bad:?} should fail, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_type_tags() {
        assert_eq!("u8".parse::<TypeTag>().unwrap(), TypeTag::U8);
        assert_eq!(
            "vector<vector<u8>>".parse::<TypeTag>().unwrap(),
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::U8))))
        );
        assert_eq!("signer".parse::<TypeTag>().unwrap(), TypeTag::Signer);
        let tag: StructTag = "0x1::m::Capability<signer>".parse().unwrap();
        assert_eq!(tag.type_args, vec![TypeTag::Signer]);
        assert_eq!(tag.to_string(), "0x1::m::Capability<signer>");
        assert!("vector<u8".parse::<TypeTag>().is_err());
    }

    #[test]
    fn type_tag_bcs() {
        let tag = TypeTag::Vector(Box::new(TypeTag::Struct(Box::new(coin_store()))));
        let bytes = bcs::to_bytes(&tag);
        assert_eq!(bytes[0], TYPE_TAG_VECTOR as u8);
        assert_eq!(bytes[1], TYPE_TAG_STRUCT as u8);
        assert_eq!(bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn signer_is_a_type_tag_but_not_an_argument() {
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&[TYPE_TAG_SIGNER as u8]),
            Ok(TypeTag::Signer)
        );
        assert_eq!(
            ArgKind::try_from(&TypeTag::Signer),
            Err(DecodeError::UnsupportedSigner)
        );
        assert_eq!(
            ArgKind::try_from(&TypeTag::Vector(Box::new(TypeTag::Signer))),
            Err(DecodeError::UnsupportedSigner)
        );
        assert_eq!(
            bcs::from_bytes::<ArgKind>(&[TYPE_TAG_VECTOR as u8, TYPE_TAG_SIGNER as u8]),
            Err(DecodeError::UnsupportedSigner)
        );
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&[42]),
            Err(DecodeError::UnknownTypeTag(42))
        );
    }

    #[test]
    fn deeply_nested_type_tag_bytes_are_refused() {
        let mut bytes = vec![TYPE_TAG_VECTOR as u8; 1_000_000];
        bytes.push(TYPE_TAG_U8 as u8);
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&bytes),
            Err(DecodeError::TooDeep(MAX_TYPE_TAG_DEPTH))
        );

        // struct type arguments count towards the same limit
        let mut tag = TypeTag::U8;
        for _ in 0..MAX_TYPE_TAG_DEPTH {
            tag = TypeTag::Struct(Box::new(StructTag {
                address: AccountAddress::ONE,
                module: "m".to_owned(),
                name: "S".to_owned(),
                type_args: vec![tag],
            }));
        }
        let bytes = bcs::to_bytes(&tag);
        assert_eq!(bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);
        let mut deeper = vec![TYPE_TAG_VECTOR as u8];
        deeper.extend_from_slice(&bytes);
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&deeper),
            Err(DecodeError::TooDeep(MAX_TYPE_TAG_DEPTH))
        );
    }

    #[test]
    fn deeply_nested_type_names_are_refused() {
        let input = format!(
            "0x1::m::S<{}u8{}>",
            "vector<".repeat(200_000),
            ">".repeat(200_000)
        );
        match input.parse::<StructTag>() {
            Err(Error::InvalidStructTag { reason, .. }) => {
                assert!(reason.contains("nested deeper"), "{reason}")
            }
            other => panic!("expected a nesting error, got {other:?}"),
        }
        let input = format!("{}u8{}", "vector<".repeat(1_000), ">".repeat(1_000));
        assert!(matches!(
            input.parse::<TypeTag>(),
            Err(Error::InvalidTypeTag { .. })
        ));

        let at_limit = format!(
            "{}u8{}",
            "vector<".repeat(MAX_TYPE_TAG_DEPTH),
            ">".repeat(MAX_TYPE_TAG_DEPTH)
        );
        assert!(at_limit.parse::<TypeTag>().is_ok());
    }

    #[test]
    fn arg_kind_discriminants() {
        assert_eq!(
            bcs::to_bytes(&ArgKind::Vector(ScalarKind::Struct)),
            vec![TYPE_TAG_VECTOR as u8, TYPE_TAG_STRUCT as u8]
        );
        assert_eq!(
            bcs::from_bytes::<ArgKind>(&[TYPE_TAG_STRUCT as u8]),
            Ok(ArgKind::Scalar(ScalarKind::Struct))
        );
        assert_eq!(
            bcs::from_bytes::<ArgKind>(&[TYPE_TAG_VECTOR as u8, TYPE_TAG_VECTOR as u8]),
            Err(DecodeError::NestedVector)
        );
        assert_eq!(
            bcs::from_bytes::<ArgKind>(&[9]),
            Err(DecodeError::UnknownTypeTag(9))
        );
    }

    #[test]
    fn arg_kind_from_type_tag() {
        assert_eq!(
            ArgKind::try_from(&TypeTag::Vector(Box::new(TypeTag::U64))),
            Ok(ArgKind::Vector(ScalarKind::U64))
        );
        assert_eq!(
            ArgKind::try_from(&TypeTag::Struct(Box::new(coin_store()))),
            Ok(ArgKind::Scalar(ScalarKind::Struct))
        );
        assert_eq!(
            ArgKind::try_from(&TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(
                TypeTag::U8
            ))))),
            Err(DecodeError::NestedVector)
        );
    }

    #[test]
    fn round_trip_boundary_values() {
        let values = vec![
            TypedValue::Bool(false),
            TypedValue::Bool(true),
            TypedValue::U8(0),
            TypedValue::U8(u8::MAX),
            TypedValue::U64(0),
            TypedValue::U64(u64::MAX),
            TypedValue::U128(0),
            TypedValue::U128(u128::MAX),
            TypedValue::Address(AccountAddress::ZERO),
            TypedValue::Address(AccountAddress::from([0xff; 32])),
            TypedValue::Struct(coin_store()),
            TypedValue::Vector(VectorValue::new(ScalarKind::U64, vec![]).unwrap()),
            TypedValue::Vector(
                VectorValue::new(
                    ScalarKind::Address,
                    vec![
                        TypedValue::Address(AccountAddress::ONE),
                        TypedValue::Address(AccountAddress::ZERO),
                    ],
                )
                .unwrap(),
            ),
        ];
        for value in values {
            let bytes = value.to_bytes();
            assert_eq!(
                TypedValue::from_bytes(value.kind(), &bytes).unwrap(),
                value,
                "round trip of {value}"
            );
        }
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(TypedValue::U64(100).to_bytes(), [100, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(TypedValue::U128(1).to_bytes().len(), 16);
        assert_eq!(TypedValue::Address(AccountAddress::ONE).to_bytes().len(), 32);
        assert_eq!(TypedValue::Bool(true).to_bytes(), [1]);
    }

    #[test]
    fn vector_decode_is_exact() {
        let kind = ArgKind::Vector(ScalarKind::U8);
        // declares three elements but carries two
        assert!(matches!(
            TypedValue::from_bytes(kind, &[3, 1, 2]),
            Err(DecodeError::UnexpectedEof { .. })
        ));
        assert_eq!(
            TypedValue::from_bytes(kind, &[1, 1, 2]),
            Err(DecodeError::TrailingBytes(1))
        );
    }

    #[test]
    fn vector_rejects_mixed_elements() {
        let res = VectorValue::new(
            ScalarKind::U8,
            vec![TypedValue::U8(1), TypedValue::U64(2)],
        );
        match res {
            Err(Error::InvalidVectorElement { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn json_rendering() {
        let bytes = VectorValue::new(ScalarKind::U8, vec![TypedValue::U8(0xde), TypedValue::U8(0xad)])
            .unwrap();
        assert_eq!(TypedValue::Vector(bytes).to_json(), Value::from("0xdead"));
        assert_eq!(TypedValue::U64(7).to_json(), Value::from("7"));
        assert_eq!(TypedValue::U8(7).to_json(), Value::from(7));
        assert_eq!(
            TypedValue::Struct(coin_store()).to_json(),
            Value::from("0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>")
        );
    }
}
