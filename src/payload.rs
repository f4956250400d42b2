//! Bridges a bound call to the payload of a transaction.

use crate::abi::{FunctionDescriptor, ModuleId};
use crate::bcs::{self, Decode, Deserializer, Encode, Serializer};
use crate::binder::BoundCall;
use crate::error::Error;
use crate::types::{is_valid_identifier, TypeTag, TypedValue};
use serde_json::{json, Value};

/// A call to a published entry function with its arguments already
/// serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: String,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Builds a payload from readable names, `natural("0x1::aptos_account",
    /// "transfer", vec![], &args)`.
    pub fn natural(
        module: &str,
        function: &str,
        ty_args: Vec<TypeTag>,
        args: &[TypedValue],
    ) -> Result<Self, Error> {
        if !is_valid_identifier(function) {
            return Err(Error::InvalidIdentifier(function.to_owned()));
        }
        Ok(EntryFunction {
            module: module.parse()?,
            function: function.to_owned(),
            ty_args,
            args: args.iter().map(TypedValue::to_bytes).collect(),
        })
    }

    /// `0x1::aptos_account::transfer`
    pub fn function_id(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }
}

impl Encode for EntryFunction {
    fn encode(&self, serializer: &mut Serializer) {
        self.module.encode(serializer);
        serializer.str(&self.function);
        serializer.sequence(&self.ty_args);
        serializer.sequence(&self.args);
    }
}

impl Decode for EntryFunction {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        Ok(EntryFunction {
            module: ModuleId::decode(deserializer)?,
            function: deserializer.str()?,
            ty_args: deserializer.sequence(TypeTag::decode)?,
            args: deserializer.sequence(Vec::<u8>::decode)?,
        })
    }
}

/// Serializes the arguments of a bound call in declaration order.
pub fn assemble(descriptor: &FunctionDescriptor, call: &BoundCall) -> EntryFunction {
    EntryFunction {
        module: descriptor.module.clone(),
        function: descriptor.name.clone(),
        ty_args: call.type_args.clone(),
        args: call.args.iter().map(TypedValue::to_bytes).collect(),
    }
}

/// The JSON payload the node's `encode_submission` endpoint accepts.
pub fn json_payload(descriptor: &FunctionDescriptor, call: &BoundCall) -> Value {
    json!({
        "type": "entry_function_payload",
        "function": descriptor.function_id(),
        "type_arguments": call
            .type_args
            .iter()
            .map(|t| Value::String(t.to_string()))
            .collect::<Vec<_>>(),
        "arguments": call.args.iter().map(TypedValue::to_json).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::function::tests::transfer_descriptor;
    use crate::address::AccountAddress;
    use crate::binder::{bind, CallArgs};

    #[test]
    fn transfer_payload() {
        let desc = transfer_descriptor();
        let call = bind(
            &desc,
            &[],
            &CallArgs::named([("to", "0x1"), ("amount", "100")]),
        )
        .unwrap();
        let payload = assemble(&desc, &call);
        assert_eq!(payload.function_id(), "0x1::aptos_account::transfer");
        assert!(payload.ty_args.is_empty());
        assert_eq!(payload.args.len(), 2);
        assert_eq!(payload.args[0].len(), 32);
        assert_eq!(payload.args[1], 100u64.to_le_bytes());

        let natural = EntryFunction::natural(
            "0x1::aptos_account",
            "transfer",
            vec![],
            &[TypedValue::Address(AccountAddress::ONE), TypedValue::U64(100)],
        )
        .unwrap();
        assert_eq!(natural, payload);
        assert_eq!(
            bcs::from_bytes::<EntryFunction>(&bcs::to_bytes(&payload)).unwrap(),
            payload
        );
    }

    #[test]
    fn json_form() {
        let mut desc = transfer_descriptor();
        desc.ty_args = vec!["CoinType".to_owned()];
        let call = bind(
            &desc,
            &["0x1::aptos_coin::AptosCoin"],
            &CallArgs::named([("to", "0x1"), ("amount", "100")]),
        )
        .unwrap();
        assert_eq!(
            json_payload(&desc, &call),
            json!({
                "type": "entry_function_payload",
                "function": "0x1::aptos_account::transfer",
                "type_arguments": ["0x1::aptos_coin::AptosCoin"],
                "arguments": [AccountAddress::ONE.to_string(), "100"],
            })
        );
    }

    #[test]
    fn natural_rejects_bad_names() {
        assert!(EntryFunction::natural("0x1", "transfer", vec![], &[]).is_err());
        assert!(EntryFunction::natural("0x1::coin", "2fer", vec![], &[]).is_err());
    }
}
