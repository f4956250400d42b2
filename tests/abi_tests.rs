//! End to end checks of descriptor loading, binding and assembly.

use brownie::abi::{ArgumentDescriptor, DescriptorRegistry, FunctionDescriptor};
use brownie::binder::{bind, CallArgs, RawArg};
use brownie::bcs::DecodeError;
use brownie::payload::assemble;
use brownie::types::{ArgKind, ScalarKind, TypeTag, TypedValue};
use brownie::{AccountAddress, Error, StructTag};
use std::fs;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn descriptor(module: &str, name: &str, args: &[(&str, TypeTag)]) -> FunctionDescriptor {
    FunctionDescriptor {
        name: name.to_owned(),
        module: module.parse().unwrap(),
        doc: String::new(),
        ty_args: vec![],
        args: args
            .iter()
            .map(|(n, t)| ArgumentDescriptor::new(n, t.clone()).unwrap())
            .collect(),
    }
}

fn transfer() -> FunctionDescriptor {
    descriptor(
        "0x1::aptos_account",
        "transfer",
        &[("to", TypeTag::Address), ("amount", TypeTag::U64)],
    )
}

fn write_abi(root: &Path, desc: &FunctionDescriptor) {
    let dir = root.join(&desc.module.name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.abi", desc.name)), desc.to_bytes()).unwrap();
}

#[test]
fn registry_tolerates_a_corrupt_file() {
    init_logging();
    let root = tempfile::tempdir().unwrap();
    write_abi(root.path(), &transfer());
    write_abi(
        root.path(),
        &descriptor("0xcafe::pool", "deposit", &[("amount", TypeTag::U128)]),
    );
    write_abi(
        root.path(),
        &descriptor(
            "0xcafe::pool",
            "set_admins",
            &[("admins", TypeTag::Vector(Box::new(TypeTag::Address)))],
        ),
    );
    // last argument turned into a signer
    let mut corrupt = transfer().to_bytes();
    let at = corrupt.len() - 1;
    corrupt[at] = 5;
    fs::write(root.path().join("pool").join("withdraw.abi"), corrupt).unwrap();

    let (registry, report) = DescriptorRegistry::from_dir(root.path()).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        Error::Decode(DecodeError::UnsupportedSigner)
    ));
    let mut keys: Vec<&str> = registry.keys().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["aptos_account::transfer", "pool::deposit", "pool::set_admins"]
    );
}

#[test]
fn struct_argument_records_load() {
    init_logging();
    let root = tempfile::tempdir().unwrap();
    let register = FunctionDescriptor {
        name: "register".to_owned(),
        module: "0xcafe::registry".parse().unwrap(),
        doc: String::new(),
        ty_args: vec![],
        args: vec![
            ArgumentDescriptor::with_kind("kind", ArgKind::Scalar(ScalarKind::Struct)),
            ArgumentDescriptor::with_kind("tags", ArgKind::Vector(ScalarKind::Struct)),
            ArgumentDescriptor::with_kind("amount", ArgKind::Scalar(ScalarKind::U64)),
        ],
    };
    write_abi(root.path(), &register);
    let bytes = fs::read(root.path().join("registry").join("register.abi")).unwrap();
    // bare discriminants, no struct bodies
    assert!(bytes.ends_with(b"\x03\x04kind\x07\x04tags\x06\x07\x06amount\x02"));

    let (registry, report) = DescriptorRegistry::from_dir(root.path()).unwrap();
    assert!(report.failures.is_empty());
    let desc = registry.get("registry::register").unwrap();
    assert_eq!(desc, &register);
    let call = bind(
        desc,
        &[],
        &CallArgs::named([
            ("kind", RawArg::from("0x1::string::String")),
            ("tags", RawArg::List(vec!["0x1::m::T".into()])),
            ("amount", RawArg::from("7")),
        ]),
    )
    .unwrap();
    assert_eq!(call.args[2], TypedValue::U64(7));
}

#[test]
fn runaway_vector_nesting_is_one_failure() {
    init_logging();
    let root = tempfile::tempdir().unwrap();
    write_abi(root.path(), &transfer());

    let mut hostile = descriptor("0xcafe::m", "evil", &[]).to_bytes();
    let at = hostile.len() - 1;
    hostile[at] = 1;
    hostile.extend_from_slice(&[1, b'x']);
    hostile.extend(std::iter::repeat(6u8).take(1_000_000));
    fs::create_dir_all(root.path().join("m")).unwrap();
    fs::write(root.path().join("m").join("evil.abi"), hostile).unwrap();

    let (registry, report) = DescriptorRegistry::from_dir(root.path()).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        Error::Decode(DecodeError::NestedVector)
    ));
}

#[test]
fn transfer_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    write_abi(root.path(), &transfer());
    let (registry, _) = DescriptorRegistry::from_dir(root.path()).unwrap();

    let desc = registry.get("aptos_account::transfer").unwrap();
    let call = bind(desc, &[], &CallArgs::named([("to", "0x1"), ("amount", "100")])).unwrap();
    assert_eq!(
        call.args,
        vec![TypedValue::Address(AccountAddress::ONE), TypedValue::U64(100)]
    );

    let payload = assemble(desc, &call);
    assert_eq!(payload.function_id(), "0x1::aptos_account::transfer");
    assert!(payload.ty_args.is_empty());
    let lengths: Vec<usize> = payload.args.iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![32, 8]);
}

#[test]
fn arity_and_missing_names() {
    let desc = transfer();
    assert!(matches!(
        bind(&desc, &[], &CallArgs::Positional(vec!["0x1".into()])),
        Err(Error::ArgumentCount { .. })
    ));
    assert!(matches!(
        bind(&desc, &[], &CallArgs::named([("to", "0x1"), ("value", "1")])),
        Err(Error::MissingArgument { .. })
    ));
}

#[test]
fn out_of_range_values_are_coercion_errors() {
    let desc = descriptor(
        "0xcafe::m",
        "f",
        &[("small", TypeTag::U8), ("big", TypeTag::U64)],
    );
    let two_pow_64 = "18446744073709551616";
    let two_pow_256 =
        "115792089237316195423570985008687907853269984665640564039457584007913129639936";
    for (small, big, bad) in [("1", two_pow_64, "big"), (two_pow_256, "1", "small")] {
        match bind(&desc, &[], &CallArgs::Positional(vec![small.into(), big.into()])) {
            Err(Error::TypeCoercion { argument, .. }) => assert_eq!(argument, bad),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn struct_tag_arguments() {
    let tag: StructTag = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
        .parse()
        .unwrap();
    match &tag.type_args[..] {
        [TypeTag::Struct(inner)] => {
            assert_eq!(inner.to_string(), "0x1::aptos_coin::AptosCoin");
        }
        other => panic!("unexpected type arguments {other:?}"),
    }

    let desc = descriptor(
        "0xcafe::registry",
        "register",
        &[(
            "kind",
            TypeTag::Struct(Box::new("0x1::string::String".parse().unwrap())),
        )],
    );
    for bad in ["0x1coin::CoinStore", "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin"] {
        assert!(matches!(
            bind(&desc, &[], &CallArgs::Positional(vec![bad.into()])),
            Err(Error::TypeCoercion { .. })
        ));
    }
}

#[test]
fn every_kind_round_trips() {
    let kinds = [
        (TypeTag::Bool, RawArg::Bool(true)),
        (TypeTag::U8, 0u8.into()),
        (TypeTag::U64, u64::MAX.into()),
        (TypeTag::U128, u128::MAX.into()),
        (TypeTag::Address, format!("0x{}", "ff".repeat(32)).into()),
        (
            TypeTag::Struct(Box::new("0x1::string::String".parse().unwrap())),
            "0x1::coin::Coin<0x1::aptos_coin::AptosCoin>".into(),
        ),
        (
            TypeTag::Vector(Box::new(TypeTag::U128)),
            RawArg::List(vec![]),
        ),
        (
            TypeTag::Vector(Box::new(TypeTag::Bool)),
            RawArg::List(vec![true.into(), false.into()]),
        ),
    ];
    let desc = descriptor(
        "0xcafe::all",
        "kinds",
        &kinds
            .iter()
            .enumerate()
            .map(|(i, (t, _))| (["a", "b", "c", "d", "e", "f", "g", "h"][i], t.clone()))
            .collect::<Vec<_>>(),
    );
    let call = bind(
        &desc,
        &[],
        &CallArgs::Positional(kinds.iter().map(|(_, v)| v.clone()).collect()),
    )
    .unwrap();
    let payload = assemble(&desc, &call);
    for ((arg, bytes), value) in desc.args.iter().zip(&payload.args).zip(&call.args) {
        assert_eq!(&TypedValue::from_bytes(arg.kind, bytes).unwrap(), value);
    }
    assert_eq!(desc.args[6].kind, ArgKind::Vector(ScalarKind::U128));
}
