use crate::bcs::{self, Decode, Deserializer, Encode, Serializer};
use crate::types::{ArgKind, TypeTag};

/// One named parameter of an entry function.
///
/// The record only carries the type's discriminants, so a struct argument
/// is known to be a struct but not which one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub kind: ArgKind,
}

impl ArgumentDescriptor {
    /// Fails for `signer` and nested vectors, which are never arguments.
    pub fn new(name: &str, type_tag: TypeTag) -> bcs::Result<Self> {
        Ok(ArgumentDescriptor::with_kind(name, ArgKind::try_from(&type_tag)?))
    }

    pub fn with_kind(name: &str, kind: ArgKind) -> Self {
        ArgumentDescriptor {
            name: name.to_owned(),
            kind,
        }
    }
}

impl Encode for ArgumentDescriptor {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.str(&self.name);
        self.kind.encode(serializer);
    }
}

impl Decode for ArgumentDescriptor {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        Ok(ArgumentDescriptor {
            name: deserializer.str()?,
            kind: ArgKind::decode(deserializer)?,
        })
    }
}
