// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::base_types::{ObjectID, ObjectRef, SharedObjectRef, SuiAddress};
use crate::error::{StateResult, TransactionStateError};
use crate::type_signature::OpenMoveTypeSignature;

#[cfg(test)]
#[path = "unit_tests/transaction_tests.rs"]
mod transaction_tests;

pub type EpochId = u64;

/// The declared disposition of a not-yet-typed raw input.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RawValueKind {
    Pure,
    Object,
}

/// An input captured before its Move type is known. Replaced by a `Pure` or
/// `UnresolvedObject` input during input normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct RawValue {
    pub value: JsonValue,
    pub kind: Option<RawValueKind>,
}

/// An object input known only by id. Replaced by a fully-specified object
/// reference during object resolution; the accumulated type signatures decide
/// mutability and receiving-ness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedObject {
    pub object_id: ObjectID,
    pub type_signatures: Vec<OpenMoveTypeSignature>,
}

/// A fully-resolved object input.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject(SharedObjectRef),
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn object_id(&self) -> ObjectID {
        match self {
            ObjectArg::ImmOrOwnedObject(oref) | ObjectArg::Receiving(oref) => oref.object_id,
            ObjectArg::SharedObject(shared) => shared.object_id,
        }
    }
}

/// A top-level input slot of the transaction. The `UnresolvedObject` and
/// `RawValue` variants are transient: both are gone once the resolution
/// pipeline has run.
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    Pure { bytes: Vec<u8> },
    Object(ObjectArg),
    UnresolvedObject(UnresolvedObject),
    RawValue(RawValue),
}

impl CallArg {
    pub fn kind(&self) -> &'static str {
        match self {
            CallArg::Pure { .. } => "Pure",
            CallArg::Object(_) => "Object",
            CallArg::UnresolvedObject(_) => "UnresolvedObject",
            CallArg::RawValue(_) => "RawValue",
        }
    }

    /// The object id this input refers to, if it refers to one.
    pub fn object_id(&self) -> Option<ObjectID> {
        match self {
            CallArg::Object(arg) => Some(arg.object_id()),
            CallArg::UnresolvedObject(unresolved) => Some(unresolved.object_id),
            CallArg::Pure { .. } | CallArg::RawValue(_) => None,
        }
    }

    pub fn shared_ref_mut(&mut self) -> Option<&mut SharedObjectRef> {
        match self {
            CallArg::Object(ObjectArg::SharedObject(shared)) => Some(shared),
            _ => None,
        }
    }
}

/// A reference to an input slot or to the result of a prior command. The
/// intent-result variants reference intent commands and never survive intent
/// resolution.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
    IntentResult(u16),
    NestedIntentResult(u16, u16),
}

impl Argument {
    pub fn kind(&self) -> &'static str {
        match self {
            Argument::GasCoin => "GasCoin",
            Argument::Input(_) => "Input",
            Argument::Result(_) => "Result",
            Argument::NestedResult(..) => "NestedResult",
            Argument::IntentResult(_) => "IntentResult",
            Argument::NestedIntentResult(..) => "NestedIntentResult",
        }
    }
}

/// A value in a transaction intent's input map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentValue {
    Single(Argument),
    List(Vec<Argument>),
}

/// A higher-level symbolic command that a registered resolver rewrites into
/// primitive commands before the transaction can be built.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionIntent {
    pub name: String,
    pub inputs: BTreeMap<String, IntentValue>,
    pub data: JsonValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

/// A single command in a programmable transaction. Declaration order is the
/// canonical discriminator order of the binary form; `TransactionIntent` is
/// client-only and never serialized.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// Sends objects to an address. All objects must have store.
    TransferObjects(Vec<Argument>, Argument),
    /// Splits off the given amounts into new coins.
    SplitCoins(Argument, Vec<Argument>),
    /// Merges the source coins into the destination coin.
    MergeCoins(Argument, Vec<Argument>),
    /// Builds a Move vector out of the given elements.
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// Publishes the given modules as a new package.
    Publish(Vec<Vec<u8>>, Vec<ObjectID>),
    /// Upgrades an existing package, consuming an upgrade ticket.
    Upgrade(Vec<Vec<u8>>, Vec<ObjectID>, ObjectID, Argument),
    TransactionIntent(TransactionIntent),
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::MoveCall(_) => "MoveCall",
            Command::TransferObjects(..) => "TransferObjects",
            Command::SplitCoins(..) => "SplitCoins",
            Command::MergeCoins(..) => "MergeCoins",
            Command::MakeMoveVec(..) => "MakeMoveVec",
            Command::Publish(..) => "Publish",
            Command::Upgrade(..) => "Upgrade",
            Command::TransactionIntent(_) => "TransactionIntent",
        }
    }

    /// Visits every argument slot of the command without mutating it. Same
    /// traversal schema as [`Self::map_arguments`].
    pub fn visit_arguments(&self, f: &mut dyn FnMut(&Argument)) {
        match self {
            Command::MoveCall(call) => {
                for arg in &call.arguments {
                    f(arg);
                }
            }
            Command::TransferObjects(objects, recipient) => {
                for arg in objects {
                    f(arg);
                }
                f(recipient);
            }
            Command::SplitCoins(coin, amounts) => {
                f(coin);
                for arg in amounts {
                    f(arg);
                }
            }
            Command::MergeCoins(destination, sources) => {
                f(destination);
                for arg in sources {
                    f(arg);
                }
            }
            Command::MakeMoveVec(_, elements) => {
                for arg in elements {
                    f(arg);
                }
            }
            Command::Publish(..) => {}
            Command::Upgrade(_, _, _, ticket) => {
                f(ticket);
            }
            Command::TransactionIntent(intent) => {
                for value in intent.inputs.values() {
                    match value {
                        IntentValue::Single(arg) => f(arg),
                        IntentValue::List(args) => {
                            for arg in args {
                                f(arg);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Visits every argument slot of the command. The traversal schema is
    /// fixed per variant; `Publish` carries no argument slots.
    pub fn map_arguments(&mut self, f: &mut dyn FnMut(&mut Argument)) {
        match self {
            Command::MoveCall(call) => {
                for arg in &mut call.arguments {
                    f(arg);
                }
            }
            Command::TransferObjects(objects, recipient) => {
                for arg in objects.iter_mut() {
                    f(arg);
                }
                f(recipient);
            }
            Command::SplitCoins(coin, amounts) => {
                f(coin);
                for arg in amounts.iter_mut() {
                    f(arg);
                }
            }
            Command::MergeCoins(destination, sources) => {
                f(destination);
                for arg in sources.iter_mut() {
                    f(arg);
                }
            }
            Command::MakeMoveVec(_, elements) => {
                for arg in elements.iter_mut() {
                    f(arg);
                }
            }
            Command::Publish(..) => {}
            Command::Upgrade(_, _, _, ticket) => {
                f(ticket);
            }
            Command::TransactionIntent(intent) => {
                for value in intent.inputs.values_mut() {
                    match value {
                        IntentValue::Single(arg) => f(arg),
                        IntentValue::List(args) => {
                            for arg in args.iter_mut() {
                                f(arg);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Gas configuration. Any field may be absent until the gas stages of the
/// resolution pipeline have run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GasData {
    pub budget: Option<u64>,
    pub price: Option<u64>,
    pub owner: Option<SuiAddress>,
    pub payment: Option<Vec<ObjectRef>>,
}

/// When a transaction stops being eligible for execution.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum TransactionExpiration {
    None,
    Epoch(EpochId),
}

impl Default for TransactionExpiration {
    fn default() -> Self {
        TransactionExpiration::None
    }
}

/// The in-memory form of a partially-built programmable transaction
/// (schema version 2).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionState {
    pub features: Vec<String>,
    pub sender: Option<SuiAddress>,
    pub expiration: Option<TransactionExpiration>,
    pub gas_data: GasData,
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl TransactionState {
    pub const VERSION: u64 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every argument slot of every command, in command order.
    pub fn map_arguments(&mut self, f: &mut dyn FnMut(&mut Argument)) {
        for command in &mut self.commands {
            command.map_arguments(f);
        }
    }

    /// Structural validation: every positional reference must point inside
    /// the lists it indexes.
    pub fn validate(&self) -> StateResult {
        let num_inputs = self.inputs.len();
        let num_commands = self.commands.len();
        for (index, command) in self.commands.iter().enumerate() {
            let mut bad: Option<(String, String)> = None;
            command.visit_arguments(&mut |arg| {
                if bad.is_some() {
                    return;
                }
                let out_of_range = match arg {
                    Argument::GasCoin => None,
                    Argument::Input(input) => {
                        (usize::from(*input) >= num_inputs).then(|| (*input, num_inputs))
                    }
                    Argument::Result(cmd)
                    | Argument::NestedResult(cmd, _)
                    | Argument::IntentResult(cmd)
                    | Argument::NestedIntentResult(cmd, _) => {
                        (usize::from(*cmd) >= num_commands).then(|| (*cmd, num_commands))
                    }
                };
                if let Some((value, bound)) = out_of_range {
                    bad = Some((
                        format!("commands[{index}]"),
                        format!("{} index {value} out of range (< {bound})", arg.kind()),
                    ));
                }
            });
            if let Some((path, message)) = bad {
                return Err(TransactionStateError::validation(path, message));
            }
        }
        Ok(())
    }
}
