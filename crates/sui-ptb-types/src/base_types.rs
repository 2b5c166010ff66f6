// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use fastcrypto::encoding::{Encoding, Hex};
use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};

use crate::digests::ObjectDigest;
use crate::error::TransactionStateError;

#[cfg(test)]
#[path = "unit_tests/base_types_tests.rs"]
mod base_types_tests;

pub const SUI_ADDRESS_LENGTH: usize = ObjectID::LENGTH;

/// A 32-byte account address, canonicalized to fixed-width lowercase hex.
/// Short hex strings parse by left-padding with zeros.
#[derive(
    Eq, Default, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize,
)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn to_inner(self) -> [u8; SUI_ADDRESS_LENGTH] {
        self.0
    }

    // for testing
    pub fn random_for_testing_only() -> Self {
        use rand::Rng;
        Self(rand::thread_rng().gen::<[u8; SUI_ADDRESS_LENGTH]>())
    }
}

impl FromStr for SuiAddress {
    type Err = TransactionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(TransactionStateError::DeserializationFailed(format!(
                "invalid address `{s}`"
            )));
        }
        // A "short" address is left-padded with zeros to the full width.
        let padded = format!("{digits:0>64}");
        let bytes = Hex::decode(&padded).map_err(|e| {
            TransactionStateError::DeserializationFailed(format!("invalid address `{s}`: {e}"))
        })?;
        let arr: [u8; SUI_ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            TransactionStateError::DeserializationFailed(format!("invalid address `{s}`"))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", Hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl AsRef<[u8]> for SuiAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<ObjectID> for SuiAddress {
    fn from(object_id: ObjectID) -> SuiAddress {
        Self(object_id.into_bytes())
    }
}

impl From<SuiAddress> for ObjectID {
    fn from(address: SuiAddress) -> ObjectID {
        ObjectID::from_bytes(address.0)
    }
}

/// An object identifier, structurally an address.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize,
)]
pub struct ObjectID(AccountAddress);

impl ObjectID {
    pub const LENGTH: usize = AccountAddress::LENGTH;
    pub const ZERO: Self = Self(AccountAddress::ZERO);

    pub const fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self(AccountAddress::new(bytes))
    }

    pub fn into_bytes(self) -> [u8; Self::LENGTH] {
        self.0.into_bytes()
    }

    pub fn random() -> Self {
        use rand::Rng;
        Self::from_bytes(rand::thread_rng().gen::<[u8; Self::LENGTH]>())
    }
}

impl FromStr for ObjectID {
    type Err = TransactionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuiAddress::from_str(s).map(|address| ObjectID::from_bytes(address.0))
    }
}

impl fmt::Display for ObjectID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", Hex::encode(self.0.into_bytes()))
    }
}

impl fmt::Debug for ObjectID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<AccountAddress> for ObjectID {
    fn from(address: AccountAddress) -> Self {
        Self(address)
    }
}

impl From<ObjectID> for AccountAddress {
    fn from(object_id: ObjectID) -> Self {
        object_id.0
    }
}

/// The version of an object, monotonically increasing under mutation.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, Debug, Serialize, Deserialize,
)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const MIN: Self = Self(u64::MIN);
    pub const MAX: Self = Self(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(value: SequenceNumber) -> Self {
        value.0
    }
}

/// The triple uniquely identifying one version of an on-chain object.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectID, version: SequenceNumber, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

/// A reference to a shared object: its id, the version it first became
/// shared at, and whether the transaction takes it mutably.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct SharedObjectRef {
    pub object_id: ObjectID,
    pub initial_shared_version: SequenceNumber,
    pub mutable: bool,
}
