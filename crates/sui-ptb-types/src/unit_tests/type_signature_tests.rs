// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::json;

use super::*;
use OpenMoveTypeSignatureBody as Body;

fn datatype(package: &str, module: &str, type_name: &str, params: Vec<Body>) -> Body {
    Body::Datatype(DatatypeSignature {
        package: ObjectID::from_str(package).unwrap(),
        module: module.to_owned(),
        type_name: type_name.to_owned(),
        type_parameters: params,
    })
}

#[test]
fn test_pure_schema_detection() {
    assert_eq!(Body::U64.pure_schema(), Some(PureBcsSchema::U64));
    assert_eq!(Body::Address.pure_schema(), Some(PureBcsSchema::Address));
    assert_eq!(
        Body::Vector(Box::new(Body::U8)).pure_schema(),
        Some(PureBcsSchema::Vector(Box::new(PureBcsSchema::U8)))
    );
    assert_eq!(
        datatype("0x1", "string", "String", vec![]).pure_schema(),
        Some(PureBcsSchema::String)
    );
    assert_eq!(
        datatype("0x1", "ascii", "String", vec![]).pure_schema(),
        Some(PureBcsSchema::String)
    );
    assert_eq!(
        datatype("0x2", "object", "ID", vec![]).pure_schema(),
        Some(PureBcsSchema::Id)
    );
    assert_eq!(
        datatype("0x1", "option", "Option", vec![Body::U64]).pure_schema(),
        Some(PureBcsSchema::Option(Box::new(PureBcsSchema::U64)))
    );
    // Object types have no pure schema.
    assert_eq!(datatype("0x2", "coin", "Coin", vec![Body::U64]).pure_schema(), None);
    assert_eq!(Body::Signer.pure_schema(), None);
    assert_eq!(Body::TypeParameter(0).pure_schema(), None);
}

#[test]
fn test_tx_context_and_receiving_detection() {
    let tx_context =
        OpenMoveTypeSignature::by_mut_ref(datatype("0x2", "tx_context", "TxContext", vec![]));
    assert!(tx_context.is_tx_context());
    assert!(!tx_context.is_receiving());

    let receiving = OpenMoveTypeSignature::by_value(datatype(
        "0x2",
        "transfer",
        "Receiving",
        vec![datatype("0x2", "coin", "Coin", vec![])],
    ));
    assert!(receiving.is_receiving());
    assert!(!receiving.is_tx_context());
}

#[test]
fn test_serialize_integers() {
    assert_eq!(
        PureBcsSchema::U64.serialize(&json!(42)).unwrap(),
        42u64.to_le_bytes().to_vec()
    );
    // Decimal strings are accepted for every integer width.
    assert_eq!(
        PureBcsSchema::U64.serialize(&json!("42")).unwrap(),
        42u64.to_le_bytes().to_vec()
    );
    assert_eq!(PureBcsSchema::U8.serialize(&json!(255)).unwrap(), vec![255]);
    assert!(PureBcsSchema::U8.serialize(&json!(256)).is_err());
    assert_eq!(
        PureBcsSchema::U128
            .serialize(&json!("340282366920938463463374607431768211455"))
            .unwrap(),
        u128::MAX.to_le_bytes().to_vec()
    );
    assert_eq!(
        PureBcsSchema::U256.serialize(&json!("1")).unwrap(),
        {
            let mut bytes = vec![0u8; 32];
            bytes[0] = 1;
            bytes
        }
    );
}

#[test]
fn test_serialize_bool_and_address() {
    assert_eq!(PureBcsSchema::Bool.serialize(&json!(true)).unwrap(), vec![1]);
    assert_eq!(PureBcsSchema::Bool.serialize(&json!(false)).unwrap(), vec![0]);
    assert!(PureBcsSchema::Bool.serialize(&json!(1)).is_err());

    let bytes = PureBcsSchema::Address.serialize(&json!("0x2")).unwrap();
    assert_eq!(bytes.len(), 32);
    assert_eq!(bytes[31], 2);
}

#[test]
fn test_serialize_string_and_vector() {
    assert_eq!(
        PureBcsSchema::String.serialize(&json!("hi")).unwrap(),
        vec![2, b'h', b'i']
    );
    assert_eq!(
        PureBcsSchema::Vector(Box::new(PureBcsSchema::U8))
            .serialize(&json!([1, 2, 3]))
            .unwrap(),
        vec![3, 1, 2, 3]
    );
    // A plain string serializes as utf8 bytes for vector<u8>.
    assert_eq!(
        PureBcsSchema::Vector(Box::new(PureBcsSchema::U8))
            .serialize(&json!("ab"))
            .unwrap(),
        vec![2, b'a', b'b']
    );
    assert_eq!(
        PureBcsSchema::Vector(Box::new(PureBcsSchema::U64))
            .serialize(&json!([1]))
            .unwrap(),
        {
            let mut bytes = vec![1];
            bytes.extend_from_slice(&1u64.to_le_bytes());
            bytes
        }
    );
}

#[test]
fn test_serialize_option() {
    let schema = PureBcsSchema::Option(Box::new(PureBcsSchema::U64));
    assert_eq!(schema.serialize(&json!(null)).unwrap(), vec![0]);
    assert_eq!(schema.serialize(&json!(7)).unwrap(), {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&7u64.to_le_bytes());
        bytes
    });
}

#[test]
fn test_uleb_length_prefix_is_multi_byte_past_127() {
    let long = "a".repeat(200);
    let bytes = PureBcsSchema::String.serialize(&json!(long)).unwrap();
    assert_eq!(&bytes[..2], &[0xc8, 0x01]);
    assert_eq!(bytes.len(), 2 + 200);
}
