// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The normalized shape of Move function parameters as reported by the chain,
//! and the serialization of raw input values against those shapes.

use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use move_core_types::u256::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::base_types::{ObjectID, SuiAddress};
use crate::{MOVE_STDLIB_PACKAGE_ID, SUI_FRAMEWORK_PACKAGE_ID};

#[cfg(test)]
#[path = "unit_tests/type_signature_tests.rs"]
mod type_signature_tests;

/// How a Move parameter takes its value.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum TypeReference {
    #[serde(rename = "&")]
    Immutable,
    #[serde(rename = "&mut")]
    Mutable,
}

/// A normalized Move function parameter: an optional reference qualifier and
/// a structural type body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenMoveTypeSignature {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<TypeReference>,
    pub body: OpenMoveTypeSignatureBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMoveTypeSignatureBody {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    TypeParameter(u16),
    Vector(Box<OpenMoveTypeSignatureBody>),
    Datatype(DatatypeSignature),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatatypeSignature {
    pub package: ObjectID,
    pub module: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<OpenMoveTypeSignatureBody>,
}

impl OpenMoveTypeSignature {
    pub fn by_value(body: OpenMoveTypeSignatureBody) -> Self {
        Self {
            reference: None,
            body,
        }
    }

    pub fn by_ref(body: OpenMoveTypeSignatureBody) -> Self {
        Self {
            reference: Some(TypeReference::Immutable),
            body,
        }
    }

    pub fn by_mut_ref(body: OpenMoveTypeSignatureBody) -> Self {
        Self {
            reference: Some(TypeReference::Mutable),
            body,
        }
    }

    pub fn is_by_value(&self) -> bool {
        self.reference.is_none()
    }

    pub fn is_mutable_reference(&self) -> bool {
        self.reference == Some(TypeReference::Mutable)
    }

    /// The trailing `0x2::tx_context::TxContext` parameter entry functions
    /// append implicitly; callers never supply it.
    pub fn is_tx_context(&self) -> bool {
        self.body
            .is_datatype(SUI_FRAMEWORK_PACKAGE_ID, "tx_context", "TxContext")
    }

    pub fn is_receiving(&self) -> bool {
        self.body
            .is_datatype(SUI_FRAMEWORK_PACKAGE_ID, "transfer", "Receiving")
    }
}

impl OpenMoveTypeSignatureBody {
    fn is_datatype(&self, package: ObjectID, module: &str, type_name: &str) -> bool {
        matches!(
            self,
            OpenMoveTypeSignatureBody::Datatype(datatype)
                if datatype.package == package
                    && datatype.module == module
                    && datatype.type_name == type_name
        )
    }

    /// The BCS schema for this body if it is a "pure" shape: a primitive, a
    /// known string/id/option datatype, or a vector of such. Object types
    /// return `None`.
    pub fn pure_schema(&self) -> Option<PureBcsSchema> {
        use OpenMoveTypeSignatureBody as Body;
        match self {
            Body::Bool => Some(PureBcsSchema::Bool),
            Body::U8 => Some(PureBcsSchema::U8),
            Body::U16 => Some(PureBcsSchema::U16),
            Body::U32 => Some(PureBcsSchema::U32),
            Body::U64 => Some(PureBcsSchema::U64),
            Body::U128 => Some(PureBcsSchema::U128),
            Body::U256 => Some(PureBcsSchema::U256),
            Body::Address => Some(PureBcsSchema::Address),
            Body::Signer | Body::TypeParameter(_) => None,
            Body::Vector(inner) => inner
                .pure_schema()
                .map(|schema| PureBcsSchema::Vector(Box::new(schema))),
            Body::Datatype(datatype) => {
                if self.is_datatype(MOVE_STDLIB_PACKAGE_ID, "string", "String")
                    || self.is_datatype(MOVE_STDLIB_PACKAGE_ID, "ascii", "String")
                {
                    Some(PureBcsSchema::String)
                } else if self.is_datatype(SUI_FRAMEWORK_PACKAGE_ID, "object", "ID") {
                    Some(PureBcsSchema::Id)
                } else if self.is_datatype(MOVE_STDLIB_PACKAGE_ID, "option", "Option") {
                    datatype
                        .type_parameters
                        .first()?
                        .pure_schema()
                        .map(|schema| PureBcsSchema::Option(Box::new(schema)))
                } else {
                    None
                }
            }
        }
    }
}

/// The BCS layout a raw JSON input value is serialized against once the
/// target parameter's shape is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PureBcsSchema {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    String,
    Id,
    Vector(Box<PureBcsSchema>),
    Option(Box<PureBcsSchema>),
}

impl PureBcsSchema {
    pub fn serialize(&self, value: &JsonValue) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(value, &mut out)?;
        Ok(out)
    }

    fn write(&self, value: &JsonValue, out: &mut Vec<u8>) -> Result<()> {
        match self {
            PureBcsSchema::Bool => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| anyhow!("expected a boolean, got {value}"))?;
                out.push(b as u8);
            }
            PureBcsSchema::U8 => out.push(u8::try_from(parse_u64(value)?)?),
            PureBcsSchema::U16 => {
                out.extend_from_slice(&u16::try_from(parse_u64(value)?)?.to_le_bytes())
            }
            PureBcsSchema::U32 => {
                out.extend_from_slice(&u32::try_from(parse_u64(value)?)?.to_le_bytes())
            }
            PureBcsSchema::U64 => out.extend_from_slice(&parse_u64(value)?.to_le_bytes()),
            PureBcsSchema::U128 => out.extend_from_slice(&parse_u128(value)?.to_le_bytes()),
            PureBcsSchema::U256 => {
                let parsed = match value {
                    JsonValue::Number(n) => U256::from(
                        n.as_u64()
                            .ok_or_else(|| anyhow!("expected an unsigned integer, got {n}"))?,
                    ),
                    JsonValue::String(s) => {
                        U256::from_str(s).map_err(|e| anyhow!("invalid u256 `{s}`: {e}"))?
                    }
                    other => bail!("expected an unsigned integer, got {other}"),
                };
                out.extend_from_slice(&parsed.to_le_bytes());
            }
            PureBcsSchema::Address | PureBcsSchema::Id => {
                let s = value
                    .as_str()
                    .ok_or_else(|| anyhow!("expected an address string, got {value}"))?;
                let address = SuiAddress::from_str(s)?;
                out.extend_from_slice(address.as_ref());
            }
            PureBcsSchema::String => {
                let s = value
                    .as_str()
                    .ok_or_else(|| anyhow!("expected a string, got {value}"))?;
                write_uleb128(out, s.len() as u64);
                out.extend_from_slice(s.as_bytes());
            }
            PureBcsSchema::Vector(inner) => match value {
                // A plain string is accepted for vector<u8>, as its utf8 bytes.
                JsonValue::String(s) if **inner == PureBcsSchema::U8 => {
                    write_uleb128(out, s.len() as u64);
                    out.extend_from_slice(s.as_bytes());
                }
                JsonValue::Array(elements) => {
                    write_uleb128(out, elements.len() as u64);
                    for element in elements {
                        inner.write(element, out)?;
                    }
                }
                other => bail!("expected an array, got {other}"),
            },
            PureBcsSchema::Option(inner) => {
                if value.is_null() {
                    out.push(0);
                } else {
                    out.push(1);
                    inner.write(value, out)?;
                }
            }
        }
        Ok(())
    }
}

fn parse_u64(value: &JsonValue) -> Result<u64> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| anyhow!("expected an unsigned integer, got {n}")),
        JsonValue::String(s) => s.parse().map_err(|e| anyhow!("invalid integer `{s}`: {e}")),
        other => bail!("expected an unsigned integer, got {other}"),
    }
}

fn parse_u128(value: &JsonValue) -> Result<u128> {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| anyhow!("expected an unsigned integer, got {n}")),
        JsonValue::String(s) => s.parse().map_err(|e| anyhow!("invalid integer `{s}`: {e}")),
        other => bail!("expected an unsigned integer, got {other}"),
    }
}

fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}
