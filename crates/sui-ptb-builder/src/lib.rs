// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client-side assembly of programmable transactions: a stateful builder, a
//! middleware-style resolution pipeline that fills in object references and
//! gas configuration from chain state, and canonical serialization.

pub mod builder;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod signer;
pub mod steps;
pub mod transaction;

pub use builder::{BuildParams, TransactionDataBuilder, TransactionDataOverrides};
pub use client::{ChainClient, TransactionLimits, NATIVE_COIN_TYPE};
pub use error::{TransactionBuilderError, TransactionBuilderResult};
pub use pipeline::{BuildPlugin, BuildStep, Next, StepContext, StepOptions};
pub use signer::{SignedTransaction, Signer};
pub use steps::intents::IntentResolver;
pub use transaction::{
    AddressInput, Amount, ArgumentProducer, BuildOptions, ObjectInput, Transaction,
    TransactionResult,
};

pub use sui_ptb_types as types;
