// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The three gas stages: reference price, a dry-run-derived budget, and
//! payment selection from the gas owner's coins.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use sui_ptb_types::base_types::{ObjectID, ObjectRef};
use sui_ptb_types::error::TransactionStateError;
use sui_ptb_types::transaction::{CallArg, ObjectArg};

use crate::builder::{BuildParams, TransactionDataOverrides};
use crate::client::{ExecutionStatus, NATIVE_COIN_TYPE};
use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{StepContext, TerminalHandler};

/// Computation-cost headroom added per unit of gas price when deriving a
/// budget from a dry run.
const GAS_SAFE_OVERHEAD: u64 = 1_000;

pub struct SetGasPrice;

#[async_trait]
impl TerminalHandler for SetGasPrice {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        if ctx.state().gas_data.price.is_some() {
            return Ok(());
        }
        let price = ctx.client()?.get_reference_gas_price().await?;
        debug!(price, "using reference gas price");
        ctx.state_mut().gas_data.price = Some(price);
        Ok(())
    }
}

pub struct SetGasBudget;

#[async_trait]
impl TerminalHandler for SetGasBudget {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        if ctx.state().gas_data.budget.is_some() {
            return Ok(());
        }
        let client = ctx.client()?;

        // Simulate with the maximum budget and no payment; the node selects
        // gas coins for dry runs itself.
        let tx_bytes = ctx.builder.build(&BuildParams {
            only_transaction_kind: false,
            overrides: Some(TransactionDataOverrides {
                gas_budget: Some(ctx.limits.max_tx_gas),
                gas_payment: Some(vec![]),
                ..Default::default()
            }),
            max_size_bytes: None,
        })?;
        let result = client.dry_run_transaction_block(&tx_bytes).await?;
        if result.status != ExecutionStatus::Success {
            let error = result
                .error
                .clone()
                .unwrap_or_else(|| "dry run did not succeed".to_owned());
            return Err(TransactionBuilderError::DryRunFailed {
                error,
                cause: Box::new(result),
            });
        }

        let price = ctx.state().gas_data.price.unwrap_or(1);
        let gas = &result.gas_used;
        let base_computation = gas.computation_cost + GAS_SAFE_OVERHEAD * price;
        let budget = (base_computation + gas.storage_cost)
            .saturating_sub(gas.storage_rebate)
            .max(base_computation);
        debug!(budget, "using dry-run-derived gas budget");
        ctx.state_mut().gas_data.budget = Some(budget);
        Ok(())
    }
}

pub struct SetGasPayment;

#[async_trait]
impl TerminalHandler for SetGasPayment {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        let max_gas_objects = ctx.limits.max_gas_objects;
        if let Some(payment) = &ctx.state().gas_data.payment {
            if payment.len() as u64 > max_gas_objects {
                return Err(TransactionBuilderError::TooManyGasCoins {
                    max: max_gas_objects,
                });
            }
            return Ok(());
        }

        let gas_owner = ctx
            .state()
            .gas_data
            .owner
            .or(ctx.state().sender)
            .ok_or(TransactionStateError::MissingSender)?;
        let coins = ctx.client()?.get_coins(gas_owner, NATIVE_COIN_TYPE).await?;

        // Coins already pinned as owned object inputs cannot double as gas.
        let used_as_input: BTreeSet<ObjectID> = ctx
            .state()
            .inputs
            .iter()
            .filter_map(|input| match input {
                CallArg::Object(ObjectArg::ImmOrOwnedObject(oref)) => Some(oref.object_id),
                _ => None,
            })
            .collect();
        let payment: Vec<ObjectRef> = coins
            .iter()
            .filter(|coin| !used_as_input.contains(&coin.coin_object_id))
            .take(max_gas_objects.saturating_sub(1) as usize)
            .map(|coin| coin.object_ref())
            .collect();
        if payment.is_empty() {
            return Err(TransactionBuilderError::NoGasCoins);
        }
        debug!(coins = payment.len(), "selected gas payment");
        ctx.state_mut().gas_data.payment = Some(payment);
        Ok(())
    }
}
