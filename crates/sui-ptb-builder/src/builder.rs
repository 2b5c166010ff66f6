// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value as JsonValue;
use sui_ptb_types::base_types::{ObjectRef, SuiAddress};
use sui_ptb_types::digests::TransactionDigest;
use sui_ptb_types::error::{StateResult, TransactionStateError};
use sui_ptb_types::transaction::{
    Argument, CallArg, Command, RawValueKind, TransactionExpiration, TransactionState,
};
use sui_ptb_types::transaction_data::{TransactionData, TransactionKind};
use sui_ptb_types::{json, v1};

use crate::error::{TransactionBuilderError, TransactionBuilderResult};

/// Field-level overrides applied to a cloned state at encode time. Used by
/// callers to pin gas fields, and by the budget stage to dry-run with the
/// maximum budget and no payment.
#[derive(Debug, Clone, Default)]
pub struct TransactionDataOverrides {
    pub sender: Option<SuiAddress>,
    pub expiration: Option<TransactionExpiration>,
    pub gas_budget: Option<u64>,
    pub gas_price: Option<u64>,
    pub gas_owner: Option<SuiAddress>,
    pub gas_payment: Option<Vec<ObjectRef>>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildParams {
    pub only_transaction_kind: bool,
    pub overrides: Option<TransactionDataOverrides>,
    pub max_size_bytes: Option<u64>,
}

/// Owns a `TransactionState` and implements the index-aware mutations on it:
/// input append, command append, command replacement with reference fixup,
/// and encoding to the canonical binary form.
#[derive(Debug, Clone, Default)]
pub struct TransactionDataBuilder {
    state: TransactionState,
}

impl TransactionDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: TransactionState) -> Self {
        Self { state }
    }

    /// Parses and validates a serialized full transaction.
    pub fn from_bytes(bytes: &[u8]) -> StateResult<Self> {
        let data = TransactionData::from_bytes(bytes)?;
        let state = TransactionState::from(data);
        state.validate()?;
        Ok(Self { state })
    }

    /// Parses and validates a serialized bare transaction kind.
    pub fn from_kind_bytes(bytes: &[u8]) -> StateResult<Self> {
        let kind = TransactionKind::from_bytes(bytes)?;
        let state = TransactionState::from(kind);
        state.validate()?;
        Ok(Self { state })
    }

    /// Restores a JSON snapshot in either schema version, migrating v1.
    pub fn restore(value: &JsonValue) -> StateResult<Self> {
        let state = match value.get("version").and_then(JsonValue::as_u64) {
            Some(1) => v1::from_json(value)?,
            Some(2) => json::from_json(value)?,
            _ => {
                return Err(TransactionStateError::validation(
                    "version",
                    "expected schema version 1 or 2",
                ))
            }
        };
        Ok(Self { state })
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TransactionState {
        &mut self.state
    }

    /// Appends an input and returns the argument referencing it. A raw value
    /// without a declared disposition takes the one given here.
    pub fn add_input(&mut self, kind: RawValueKind, mut value: CallArg) -> Argument {
        if let CallArg::RawValue(raw) = &mut value {
            raw.kind.get_or_insert(kind);
        }
        let index = self.state.inputs.len() as u16;
        self.state.inputs.push(value);
        Argument::Input(index)
    }

    /// Appends a command and returns its index.
    pub fn add_command(&mut self, command: Command) -> u16 {
        let index = self.state.commands.len() as u16;
        self.state.commands.push(command);
        index
    }

    /// Applies `f` to every argument slot of every command.
    pub fn map_arguments(&mut self, f: &mut dyn FnMut(&mut Argument)) {
        self.state.map_arguments(f);
    }

    /// Replaces command `index` with one or more commands. References into
    /// the command list held by the commands around the splice stay bound to
    /// the same logical result: references past the splice point shift by the
    /// growth, references to the replaced command stay on the first inserted
    /// one, and the freshly inserted commands (authored against post-splice
    /// indices) are left untouched.
    pub fn replace_command(&mut self, index: u16, replacement: Vec<Command>) {
        let at = usize::from(index);
        if at >= self.state.commands.len() {
            return;
        }
        let count = replacement.len();
        self.state.commands.splice(at..=at, replacement);
        if count == 1 {
            return;
        }
        let shift = count as isize - 1;
        let inserted = at..at + count;
        for (position, command) in self.state.commands.iter_mut().enumerate() {
            if inserted.contains(&position) {
                continue;
            }
            command.map_arguments(&mut |argument| match argument {
                Argument::Result(command)
                | Argument::NestedResult(command, _)
                | Argument::IntentResult(command)
                | Argument::NestedIntentResult(command, _)
                    if usize::from(*command) > at =>
                {
                    *command = (*command as isize + shift) as u16;
                }
                _ => {}
            });
        }
    }

    /// A deep, schema-validated copy with no aliasing into the builder.
    pub fn snapshot(&self) -> StateResult<TransactionState> {
        self.state.validate()?;
        Ok(self.state.clone())
    }

    /// Encodes the state. For a full transaction the sender and every gas
    /// field must be present (possibly via `overrides`).
    pub fn build(&self, params: &BuildParams) -> TransactionBuilderResult<Vec<u8>> {
        self.state.validate()?;
        let bytes = if params.only_transaction_kind {
            TransactionKind::try_from_state(&self.state)?.to_bytes()?
        } else {
            let mut state = self.state.clone();
            if let Some(overrides) = &params.overrides {
                apply_overrides(&mut state, overrides);
            }
            TransactionData::try_from_state(&state)?.to_bytes()?
        };
        if let Some(max) = params.max_size_bytes {
            if bytes.len() as u64 > max {
                return Err(TransactionBuilderError::TransactionTooLarge {
                    size: bytes.len(),
                    max,
                });
            }
        }
        Ok(bytes)
    }

    /// The digest of the fully-specified transaction.
    pub fn digest(&self) -> TransactionBuilderResult<TransactionDigest> {
        let bytes = self.build(&BuildParams::default())?;
        Ok(TransactionDigest::from_transaction_bytes(&bytes))
    }

    /// The current state in the canonical JSON snapshot form.
    pub fn to_json(&self) -> StateResult<JsonValue> {
        Ok(json::to_json(&self.snapshot()?))
    }
}

fn apply_overrides(state: &mut TransactionState, overrides: &TransactionDataOverrides) {
    if let Some(sender) = overrides.sender {
        state.sender = Some(sender);
    }
    if let Some(expiration) = overrides.expiration {
        state.expiration = Some(expiration);
    }
    if let Some(budget) = overrides.gas_budget {
        state.gas_data.budget = Some(budget);
    }
    if let Some(price) = overrides.gas_price {
        state.gas_data.price = Some(price);
    }
    if let Some(owner) = overrides.gas_owner {
        state.gas_data.owner = Some(owner);
    }
    if let Some(payment) = &overrides.gas_payment {
        state.gas_data.payment = Some(payment.clone());
    }
}
