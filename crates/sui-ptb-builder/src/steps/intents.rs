// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Intent resolution: each unsupported intent name gets one invocation of its
//! registered resolver, which rewrites the symbolic command into primitive
//! ones (typically via `replace_command`, keeping every other reference
//! valid).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use sui_ptb_types::transaction::Command;

use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{StepContext, TerminalHandler};

/// Rewrites one intent kind into primitive commands. Registered on the
/// transaction facade under the intent's name.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn resolve(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult;
}

pub(crate) struct ResolveIntent<'a> {
    pub resolvers: &'a BTreeMap<String, Arc<dyn IntentResolver>>,
}

#[async_trait]
impl TerminalHandler for ResolveIntent<'_> {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        let Some(name) = ctx.options.intent_name.clone() else {
            return Ok(());
        };
        if !has_intent(ctx, &name) {
            return Ok(());
        }
        let Some(resolver) = self.resolvers.get(&name) else {
            return Err(TransactionBuilderError::UnresolvedIntent(name));
        };
        debug!(intent = %name, "resolving intent");
        resolver.resolve(ctx).await?;
        if has_intent(ctx, &name) {
            return Err(TransactionBuilderError::UnresolvedIntent(name));
        }
        Ok(())
    }
}

fn has_intent(ctx: &StepContext<'_>, name: &str) -> bool {
    ctx.state().commands.iter().any(|command| {
        matches!(command, Command::TransactionIntent(intent) if intent.name == name)
    })
}
