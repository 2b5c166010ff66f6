// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The resolution pipeline: an ordered list of steps, each a chain of
//! plugins ending in a terminal handler. A plugin delegates to the rest of
//! its chain through [`Next`]; not delegating short-circuits the remainder of
//! the step, including the terminal. Errors abort the whole build.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::builder::TransactionDataBuilder;
use crate::client::{ChainClient, TransactionLimits};
use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::steps::gas::{SetGasBudget, SetGasPayment, SetGasPrice};
use crate::steps::intents::{IntentResolver, ResolveIntent};
use crate::steps::normalize_inputs::NormalizeInputs;
use crate::steps::resolve_objects::ResolveObjectReferences;
use crate::steps::validate::Validate;
use sui_ptb_types::transaction::{Command, TransactionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildStep {
    NormalizeInputs,
    ResolveObjectReferences,
    SetGasPrice,
    SetGasBudget,
    SetGasPayment,
    ResolveIntents,
    Validate,
}

impl BuildStep {
    pub fn name(self) -> &'static str {
        match self {
            BuildStep::NormalizeInputs => "normalizeInputs",
            BuildStep::ResolveObjectReferences => "resolveObjectReferences",
            BuildStep::SetGasPrice => "setGasPrice",
            BuildStep::SetGasBudget => "setGasBudget",
            BuildStep::SetGasPayment => "setGasPayment",
            BuildStep::ResolveIntents => "resolveIntents",
            BuildStep::Validate => "validate",
        }
    }
}

/// Per-invocation step options. A plugin may adjust these before delegating;
/// the successors see the adjusted values.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    pub only_transaction_kind: bool,
    /// The intent under resolution while `resolveIntents` runs.
    pub intent_name: Option<String>,
}

pub struct StepContext<'a> {
    pub builder: &'a mut TransactionDataBuilder,
    client: Option<&'a dyn ChainClient>,
    pub limits: &'a TransactionLimits,
    pub options: StepOptions,
}

impl<'a> StepContext<'a> {
    pub fn state(&self) -> &TransactionState {
        self.builder.state()
    }

    pub fn state_mut(&mut self) -> &mut TransactionState {
        self.builder.state_mut()
    }

    /// The chain client, required by steps that must reach the chain.
    pub fn client(&self) -> TransactionBuilderResult<&'a dyn ChainClient> {
        self.client.ok_or(TransactionBuilderError::MissingClient)
    }
}

#[async_trait]
pub trait BuildPlugin: Send + Sync {
    async fn handle(
        &self,
        step: BuildStep,
        ctx: &mut StepContext<'_>,
        next: Next<'_>,
    ) -> TransactionBuilderResult;
}

/// A step's default behavior, run after the plugin chain (or immediately when
/// the step has no plugins). Every terminal first checks its postcondition
/// and returns early when it already holds.
#[async_trait]
pub trait TerminalHandler: Send + Sync {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult;
}

/// The continuation handed to each plugin: the plugins registered after it,
/// then the terminal handler.
pub struct Next<'a> {
    plugins: &'a [Arc<dyn BuildPlugin>],
    terminal: &'a dyn TerminalHandler,
    step: BuildStep,
}

impl<'a> Next<'a> {
    pub async fn run(self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        match self.plugins.split_first() {
            Some((plugin, rest)) => {
                plugin
                    .handle(
                        self.step,
                        ctx,
                        Next {
                            plugins: rest,
                            terminal: self.terminal,
                            step: self.step,
                        },
                    )
                    .await
            }
            None => self.terminal.run(ctx).await,
        }
    }
}

/// The configured pipeline for one build: plugin registrations, intent
/// resolvers, and the intents the serialization target understands natively.
pub(crate) struct ResolutionPipeline {
    pub plugins: Vec<(BuildStep, Arc<dyn BuildPlugin>)>,
    pub intent_resolvers: BTreeMap<String, Arc<dyn IntentResolver>>,
    pub supported_intents: Vec<String>,
}

impl ResolutionPipeline {
    pub async fn run(
        &self,
        builder: &mut TransactionDataBuilder,
        client: Option<&dyn ChainClient>,
        limits: &TransactionLimits,
        options: StepOptions,
        with_gas: bool,
    ) -> TransactionBuilderResult {
        let mut ctx = StepContext {
            builder,
            client,
            limits,
            options,
        };

        self.step(BuildStep::NormalizeInputs, &NormalizeInputs, &mut ctx)
            .await?;
        self.step(
            BuildStep::ResolveObjectReferences,
            &ResolveObjectReferences,
            &mut ctx,
        )
        .await?;

        if with_gas {
            self.step(BuildStep::SetGasPrice, &SetGasPrice, &mut ctx).await?;
            self.step(BuildStep::SetGasBudget, &SetGasBudget, &mut ctx)
                .await?;
            self.step(BuildStep::SetGasPayment, &SetGasPayment, &mut ctx)
                .await?;
        }

        // One invocation per unsupported intent name discovered; a resolver
        // may itself introduce further intents, which get their own turn.
        let mut attempted = BTreeSet::new();
        while let Some(name) =
            next_unsupported_intent(ctx.builder.state(), &self.supported_intents, &attempted)
        {
            attempted.insert(name.clone());
            ctx.options.intent_name = Some(name);
            let terminal = ResolveIntent {
                resolvers: &self.intent_resolvers,
            };
            self.step(BuildStep::ResolveIntents, &terminal, &mut ctx).await?;
            ctx.options.intent_name = None;
        }

        self.step(BuildStep::Validate, &Validate, &mut ctx).await?;
        Ok(())
    }

    async fn step(
        &self,
        step: BuildStep,
        terminal: &dyn TerminalHandler,
        ctx: &mut StepContext<'_>,
    ) -> TransactionBuilderResult {
        debug!(step = step.name(), "running resolution step");
        let plugins: Vec<Arc<dyn BuildPlugin>> = self
            .plugins
            .iter()
            .filter(|(registered, _)| *registered == step)
            .map(|(_, plugin)| plugin.clone())
            .collect();
        Next {
            plugins: &plugins,
            terminal,
            step,
        }
        .run(ctx)
        .await
    }
}

fn next_unsupported_intent(
    state: &TransactionState,
    supported: &[String],
    attempted: &BTreeSet<String>,
) -> Option<String> {
    state.commands.iter().find_map(|command| match command {
        Command::TransactionIntent(intent)
            if !supported.contains(&intent.name) && !attempted.contains(&intent.name) =>
        {
            Some(intent.name.clone())
        }
        _ => None,
    })
}
