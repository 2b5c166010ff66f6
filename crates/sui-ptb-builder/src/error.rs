// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use sui_ptb_types::base_types::ObjectID;
use sui_ptb_types::error::TransactionStateError;
use thiserror::Error;

use crate::client::DryRunResult;

pub type TransactionBuilderResult<T = ()> = Result<T, TransactionBuilderError>;

#[derive(Debug, Error)]
pub enum TransactionBuilderError {
    #[error(transparent)]
    State(#[from] TransactionStateError),

    #[error("the following object inputs could not be resolved: {}", format_ids(.ids))]
    InvalidObjectInputs { ids: Vec<ObjectID> },

    #[error(
        "move call `{package}::{module}::{function}` expects {expected} arguments, got {actual}"
    )]
    ArityMismatch {
        package: ObjectID,
        module: String,
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("input {index} must be an object id string")]
    ExpectedObjectIdString { index: u16 },

    #[error("unresolved transaction intent `{0}`")]
    UnresolvedIntent(String),

    #[error("an intent resolver for `{0}` is already registered")]
    IntentResolverConflict(String),

    #[error("dry run failed: {error}")]
    DryRunFailed {
        error: String,
        cause: Box<DryRunResult>,
    },

    #[error("no coins available for gas payment")]
    NoGasCoins,

    #[error("at most {max} gas payment objects are allowed")]
    TooManyGasCoins { max: u64 },

    #[error("pure input {index} is {size} bytes, larger than the maximum of {max}")]
    PureTooLarge { index: usize, size: usize, max: u64 },

    #[error("serialized transaction is {size} bytes, larger than the maximum of {max}")]
    TransactionTooLarge { size: usize, max: u64 },

    #[error("a chain client is required to resolve this transaction")]
    MissingClient,

    #[error(transparent)]
    Client(#[from] anyhow::Error),

    #[error("signing failed: {0}")]
    Signer(anyhow::Error),
}

fn format_ids(ids: &[ObjectID]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
