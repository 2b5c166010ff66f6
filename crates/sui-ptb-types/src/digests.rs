// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use fastcrypto::encoding::{Base58, Encoding};
use fastcrypto::hash::{Blake2b256, HashFunction};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::error::TransactionStateError;

/// The digest of one version of an on-chain object, base58 in readable forms.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectDigest(#[serde_as(as = "Bytes")] [u8; 32]);

impl ObjectDigest {
    pub const ZERO: Self = Self([0; 32]);

    pub const fn new(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    pub fn random() -> Self {
        use rand::Rng;
        Self(rand::thread_rng().gen::<[u8; 32]>())
    }

    pub const fn inner(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn into_inner(self) -> [u8; 32] {
        self.0
    }

    pub fn base58_encode(&self) -> String {
        Base58::encode(self.0)
    }
}

impl AsRef<[u8]> for ObjectDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base58::encode(self.0))
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o#{}", Base58::encode(self.0))
    }
}

impl FromStr for ObjectDigest {
    type Err = TransactionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base58_digest(s).map(Self)
    }
}

/// Domain separator prepended to serialized transaction data before hashing.
const TRANSACTION_DATA_DOMAIN: &[u8] = b"TransactionData::";

/// The digest of a built transaction: a domain-separated Blake2b-256 hash of
/// the canonical BCS bytes, base58 in readable forms.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionDigest(#[serde_as(as = "Bytes")] [u8; 32]);

impl TransactionDigest {
    pub const ZERO: Self = Self([0; 32]);

    pub const fn new(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// Hash the canonical BCS encoding of a full `TransactionData`.
    pub fn from_transaction_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Blake2b256::default();
        hasher.update(TRANSACTION_DATA_DOMAIN);
        hasher.update(bytes);
        let hash = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(AsRef::<[u8]>::as_ref(&hash));
        Self(digest)
    }

    pub const fn inner(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn into_inner(self) -> [u8; 32] {
        self.0
    }

    pub fn base58_encode(&self) -> String {
        Base58::encode(self.0)
    }
}

impl AsRef<[u8]> for TransactionDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base58::encode(self.0))
    }
}

impl fmt::Debug for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransactionDigest")
            .field(&Base58::encode(self.0))
            .finish()
    }
}

impl FromStr for TransactionDigest {
    type Err = TransactionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base58_digest(s).map(Self)
    }
}

fn decode_base58_digest(s: &str) -> Result<[u8; 32], TransactionStateError> {
    let bytes = Base58::decode(s).map_err(|e| {
        TransactionStateError::DeserializationFailed(format!("invalid digest `{s}`: {e}"))
    })?;
    bytes.try_into().map_err(|_| {
        TransactionStateError::DeserializationFailed(format!(
            "invalid digest `{s}`: expected 32 bytes"
        ))
    })
}
