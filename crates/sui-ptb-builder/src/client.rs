// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The abstract seam to chain state. The resolution pipeline consumes this
//! trait; transports (JSON-RPC, GraphQL, in-memory fixtures) implement it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sui_ptb_types::base_types::{ObjectID, ObjectRef, SequenceNumber, SuiAddress};
use sui_ptb_types::digests::ObjectDigest;
use sui_ptb_types::type_signature::OpenMoveTypeSignature;

/// The coin type gas is paid in.
pub const NATIVE_COIN_TYPE: &str = "0x2::sui::SUI";

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_reference_gas_price(&self) -> Result<u64, anyhow::Error>;

    async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: &str,
    ) -> Result<Vec<CoinData>, anyhow::Error>;

    async fn multi_get_objects(
        &self,
        ids: &[ObjectID],
        options: ObjectDataOptions,
    ) -> Result<Vec<ObjectResponse>, anyhow::Error>;

    async fn get_normalized_move_function(
        &self,
        package: ObjectID,
        module: &str,
        function: &str,
    ) -> Result<NormalizedFunction, anyhow::Error>;

    async fn dry_run_transaction_block(
        &self,
        tx_bytes: &[u8],
    ) -> Result<DryRunResult, anyhow::Error>;

    async fn get_protocol_config(&self) -> Result<ProtocolConfigResponse, anyhow::Error>;
}

/// Who an object belongs to, as reported by the chain.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Owner {
    /// Owned by an address (or the object was created in the transaction).
    AddressOwner(SuiAddress),
    /// Owned by another object.
    ObjectOwner(SuiAddress),
    /// Shared, can be used by any transaction.
    Shared { initial_shared_version: SequenceNumber },
    Immutable,
}

impl Owner {
    pub fn initial_shared_version(&self) -> Option<SequenceNumber> {
        match self {
            Owner::Shared {
                initial_shared_version,
            } => Some(*initial_shared_version),
            Owner::AddressOwner(_) | Owner::ObjectOwner(_) | Owner::Immutable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_owner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
    pub owner: Option<Owner>,
}

impl ObjectData {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_id, self.version, self.digest)
    }
}

/// One entry of a `multi_get_objects` response; either metadata or a
/// per-object error string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectResponse {
    pub data: Option<ObjectData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinData {
    pub coin_object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl CoinData {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.coin_object_id, self.version, self.digest)
    }
}

/// The normalized signature of an on-chain Move function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedFunction {
    pub parameters: Vec<OpenMoveTypeSignature>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsedSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

/// The effects summary of a simulated execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunResult {
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub gas_used: GasUsedSummary,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProtocolConfigValue {
    u32(u32),
    u64(u64),
    f64(f64),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolConfigResponse {
    pub attributes: BTreeMap<String, Option<ProtocolConfigValue>>,
}

impl ProtocolConfigResponse {
    fn u64_attr(&self, key: &str) -> Option<u64> {
        match self.attributes.get(key)? {
            Some(ProtocolConfigValue::u64(value)) => Some(*value),
            Some(ProtocolConfigValue::u32(value)) => Some(u64::from(*value)),
            Some(ProtocolConfigValue::f64(value)) => Some(*value as u64),
            None => None,
        }
    }
}

/// The protocol limits the pipeline enforces, with offline defaults for use
/// without a chain client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLimits {
    pub max_tx_gas: u64,
    pub max_gas_objects: u64,
    pub max_tx_size_bytes: u64,
    pub max_pure_argument_size: u64,
}

impl Default for TransactionLimits {
    fn default() -> Self {
        Self {
            max_tx_gas: 50_000_000_000,
            max_gas_objects: 256,
            max_tx_size_bytes: 131_072,
            max_pure_argument_size: 16_384,
        }
    }
}

impl TransactionLimits {
    pub fn from_protocol_config(config: &ProtocolConfigResponse) -> Self {
        let defaults = Self::default();
        Self {
            max_tx_gas: config.u64_attr("max_tx_gas").unwrap_or(defaults.max_tx_gas),
            max_gas_objects: config
                .u64_attr("max_gas_payment_objects")
                .unwrap_or(defaults.max_gas_objects),
            max_tx_size_bytes: config
                .u64_attr("max_tx_size_bytes")
                .unwrap_or(defaults.max_tx_size_bytes),
            max_pure_argument_size: config
                .u64_attr("max_pure_argument_size")
                .unwrap_or(defaults.max_pure_argument_size),
        }
    }
}
