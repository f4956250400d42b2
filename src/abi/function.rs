use crate::abi::argument::ArgumentDescriptor;
use crate::address::AccountAddress;
use crate::bcs::{self, Decode, Deserializer, Encode, Serializer};
use crate::error::Error;
use crate::types::is_valid_identifier;
use std::fmt;
use std::str::FromStr;

/// A published module, `0x1::aptos_account`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: &str) -> Result<Self, Error> {
        if !is_valid_identifier(name) {
            return Err(Error::InvalidIdentifier(name.to_owned()));
        }
        Ok(ModuleId {
            address,
            name: name.to_owned(),
        })
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.short_string(), self.name)
    }
}

impl FromStr for ModuleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once("::") {
            Some((address, name)) => ModuleId::new(address.parse()?, name),
            None => Err(Error::InvalidIdentifier(s.to_owned())),
        }
    }
}

impl Encode for ModuleId {
    fn encode(&self, serializer: &mut Serializer) {
        self.address.encode(serializer);
        serializer.str(&self.name);
    }
}

impl Decode for ModuleId {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        let address = AccountAddress::decode(deserializer)?;
        let name = deserializer.str()?;
        if !is_valid_identifier(&name) {
            return Err(bcs::DecodeError::InvalidIdentifier(name));
        }
        Ok(ModuleId { address, name })
    }
}

/// Leading byte of an ABI file, the compiler writes the entry function
/// variant of its ABI enum.
pub const ENTRY_FUNCTION_ABI_TAG: u8 = 1;

/// The signature of one entry function as described by the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub module: ModuleId,
    pub doc: String,
    /// Names of the generic type parameters, only their count matters to
    /// callers
    pub ty_args: Vec<String>,
    pub args: Vec<ArgumentDescriptor>,
}

impl FunctionDescriptor {
    /// Registry key, `module::function`.
    pub fn key(&self) -> String {
        format!("{}::{}", self.module.name, self.name)
    }

    /// Fully qualified name, `0x1::module::function`.
    pub fn function_id(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    /// Decodes a whole ABI file. Any error anywhere rejects the record.
    pub fn from_bytes(bytes: &[u8]) -> bcs::Result<Self> {
        bcs::from_bytes(bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }
}

impl fmt::Display for FunctionDescriptor {
    /// Move style signature, `0x1::coin::transfer<CoinType>(to: address, amount: u64)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function_id())?;
        if !self.ty_args.is_empty() {
            write!(f, "<{}>", self.ty_args.join(", "))?;
        }
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", arg.name, arg.kind)?;
        }
        write!(f, ")")
    }
}

impl Encode for FunctionDescriptor {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.u8(ENTRY_FUNCTION_ABI_TAG);
        serializer.str(&self.name);
        self.module.encode(serializer);
        serializer.str(&self.doc);
        serializer.sequence(&self.ty_args);
        serializer.sequence(&self.args);
    }
}

impl Decode for FunctionDescriptor {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        // variant byte, ignored
        deserializer.u8()?;
        let name = deserializer.str()?;
        if !is_valid_identifier(&name) {
            return Err(bcs::DecodeError::InvalidIdentifier(name));
        }
        Ok(FunctionDescriptor {
            name,
            module: ModuleId::decode(deserializer)?,
            doc: deserializer.str()?,
            ty_args: deserializer.sequence(String::decode)?,
            args: deserializer.sequence(ArgumentDescriptor::decode)?,
        })
    }
}
