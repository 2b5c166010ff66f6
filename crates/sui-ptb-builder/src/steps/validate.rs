// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use sui_ptb_types::transaction::CallArg;

use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{StepContext, TerminalHandler};

pub struct Validate;

#[async_trait]
impl TerminalHandler for Validate {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        let max = ctx.limits.max_pure_argument_size;
        for (index, input) in ctx.state().inputs.iter().enumerate() {
            if let CallArg::Pure { bytes } = input {
                if bytes.len() as u64 > max {
                    return Err(TransactionBuilderError::PureTooLarge {
                        index,
                        size: bytes.len(),
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}
