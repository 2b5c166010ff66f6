// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type StateResult<T = ()> = Result<T, TransactionStateError>;

/// Errors produced by the data model itself: schema validation of restored
/// state, and conversion of a partially-specified state into the canonical
/// wire form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionStateError {
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("validation failed at `{path}`: {message}")]
    ValidationFailed { path: String, message: String },

    #[error("missing transaction sender")]
    MissingSender,

    #[error("missing gas budget")]
    MissingGasBudget,

    #[error("missing gas payment")]
    MissingGasPayment,

    #[error("missing gas price")]
    MissingGasPrice,

    #[error("unexpected command kind `{0}`")]
    UnexpectedCommandKind(String),
}

impl TransactionStateError {
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<bcs::Error> for TransactionStateError {
    fn from(err: bcs::Error) -> Self {
        Self::DeserializationFailed(err.to_string())
    }
}
