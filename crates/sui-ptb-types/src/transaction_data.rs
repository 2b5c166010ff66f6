// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The canonical wire form of a built transaction. These types carry plain
//! serde derives and are only ever serialized through BCS; discriminator
//! indices are fixed by declaration order. A `TransactionState` converts into
//! this form only once every input is resolved and every intent rewritten.

use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use serde::{Deserialize, Serialize};

use crate::base_types::{ObjectID, ObjectRef, SharedObjectRef, SuiAddress};
use crate::error::{StateResult, TransactionStateError};
use crate::transaction::{self as state, TransactionExpiration, TransactionState};

#[cfg(test)]
#[path = "unit_tests/transaction_data_tests.rs"]
mod transaction_data_tests;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject(SharedObjectRef),
    Receiving(ObjectRef),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    Publish(Vec<Vec<u8>>, Vec<ObjectID>),
    Upgrade(Vec<Vec<u8>>, Vec<ObjectID>, ObjectID, Argument),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionDataV1 {
    pub sender: SuiAddress,
    pub expiration: TransactionExpiration,
    pub gas_data: GasData,
    pub kind: TransactionKind,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    /// Missing-state checks happen here, at the last possible moment; the
    /// resolution pipeline is expected to have filled every gas field.
    pub fn try_from_state(state: &TransactionState) -> StateResult<Self> {
        let sender = state.sender.ok_or(TransactionStateError::MissingSender)?;
        let gas = &state.gas_data;
        let budget = gas.budget.ok_or(TransactionStateError::MissingGasBudget)?;
        let payment = gas
            .payment
            .clone()
            .ok_or(TransactionStateError::MissingGasPayment)?;
        let price = gas.price.ok_or(TransactionStateError::MissingGasPrice)?;
        Ok(TransactionData::V1(TransactionDataV1 {
            sender,
            expiration: state.expiration.unwrap_or_default(),
            gas_data: GasData {
                payment,
                owner: gas.owner.unwrap_or(sender),
                price,
                budget,
            },
            kind: TransactionKind::try_from_state(state)?,
        }))
    }

    pub fn to_bytes(&self) -> StateResult<Vec<u8>> {
        bcs::to_bytes(self).map_err(Into::into)
    }

    pub fn from_bytes(bytes: &[u8]) -> StateResult<Self> {
        bcs::from_bytes(bytes).map_err(Into::into)
    }
}

impl TransactionKind {
    pub fn try_from_state(state: &TransactionState) -> StateResult<Self> {
        let inputs = state
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| call_arg_from_state(index, input))
            .collect::<StateResult<Vec<_>>>()?;
        let commands = state
            .commands
            .iter()
            .enumerate()
            .map(|(index, command)| command_from_state(index, command))
            .collect::<StateResult<Vec<_>>>()?;
        Ok(TransactionKind::ProgrammableTransaction(
            ProgrammableTransaction { inputs, commands },
        ))
    }

    pub fn to_bytes(&self) -> StateResult<Vec<u8>> {
        bcs::to_bytes(self).map_err(Into::into)
    }

    pub fn from_bytes(bytes: &[u8]) -> StateResult<Self> {
        bcs::from_bytes(bytes).map_err(Into::into)
    }
}

fn call_arg_from_state(index: usize, input: &state::CallArg) -> StateResult<CallArg> {
    match input {
        state::CallArg::Pure { bytes } => Ok(CallArg::Pure(bytes.clone())),
        state::CallArg::Object(object) => Ok(CallArg::Object(object_arg_from_state(object))),
        state::CallArg::UnresolvedObject(_) => Err(TransactionStateError::validation(
            format!("inputs[{index}]"),
            "object input is unresolved; run the resolution pipeline before building",
        )),
        state::CallArg::RawValue(_) => Err(TransactionStateError::validation(
            format!("inputs[{index}]"),
            "raw input value has not been normalized",
        )),
    }
}

fn object_arg_from_state(object: &state::ObjectArg) -> ObjectArg {
    match object {
        state::ObjectArg::ImmOrOwnedObject(oref) => ObjectArg::ImmOrOwnedObject(*oref),
        state::ObjectArg::SharedObject(shared) => ObjectArg::SharedObject(*shared),
        state::ObjectArg::Receiving(oref) => ObjectArg::Receiving(*oref),
    }
}

fn argument_from_state(path: &str, argument: state::Argument) -> StateResult<Argument> {
    match argument {
        state::Argument::GasCoin => Ok(Argument::GasCoin),
        state::Argument::Input(input) => Ok(Argument::Input(input)),
        state::Argument::Result(command) => Ok(Argument::Result(command)),
        state::Argument::NestedResult(command, result) => {
            Ok(Argument::NestedResult(command, result))
        }
        state::Argument::IntentResult(_) | state::Argument::NestedIntentResult(..) => Err(
            TransactionStateError::validation(path, "intent result must be resolved before building"),
        ),
    }
}

fn arguments_from_state(path: &str, arguments: &[state::Argument]) -> StateResult<Vec<Argument>> {
    arguments
        .iter()
        .enumerate()
        .map(|(index, argument)| argument_from_state(&format!("{path}[{index}]"), *argument))
        .collect()
}

fn command_from_state(index: usize, command: &state::Command) -> StateResult<Command> {
    let path = format!("commands[{index}]");
    Ok(match command {
        state::Command::MoveCall(call) => Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: call.package,
            module: call.module.clone(),
            function: call.function.clone(),
            type_arguments: call.type_arguments.clone(),
            arguments: arguments_from_state(&format!("{path}.arguments"), &call.arguments)?,
        })),
        state::Command::TransferObjects(objects, recipient) => Command::TransferObjects(
            arguments_from_state(&format!("{path}.objects"), objects)?,
            argument_from_state(&format!("{path}.recipient"), *recipient)?,
        ),
        state::Command::SplitCoins(coin, amounts) => Command::SplitCoins(
            argument_from_state(&format!("{path}.coin"), *coin)?,
            arguments_from_state(&format!("{path}.amounts"), amounts)?,
        ),
        state::Command::MergeCoins(destination, sources) => Command::MergeCoins(
            argument_from_state(&format!("{path}.destination"), *destination)?,
            arguments_from_state(&format!("{path}.sources"), sources)?,
        ),
        state::Command::MakeMoveVec(type_, elements) => Command::MakeMoveVec(
            type_.clone(),
            arguments_from_state(&format!("{path}.elements"), elements)?,
        ),
        state::Command::Publish(modules, dependencies) => {
            Command::Publish(modules.clone(), dependencies.clone())
        }
        state::Command::Upgrade(modules, dependencies, package, ticket) => Command::Upgrade(
            modules.clone(),
            dependencies.clone(),
            *package,
            argument_from_state(&format!("{path}.ticket"), *ticket)?,
        ),
        state::Command::TransactionIntent(intent) => {
            return Err(TransactionStateError::validation(
                path,
                format!("unresolved transaction intent `{}`", intent.name),
            ));
        }
    })
}

impl From<TransactionData> for TransactionState {
    fn from(data: TransactionData) -> Self {
        let TransactionData::V1(v1) = data;
        let mut state = TransactionState::from(v1.kind);
        state.sender = Some(v1.sender);
        state.expiration = Some(v1.expiration);
        state.gas_data = state::GasData {
            budget: Some(v1.gas_data.budget),
            price: Some(v1.gas_data.price),
            owner: Some(v1.gas_data.owner),
            payment: Some(v1.gas_data.payment),
        };
        state
    }
}

impl From<TransactionKind> for TransactionState {
    fn from(kind: TransactionKind) -> Self {
        let TransactionKind::ProgrammableTransaction(pt) = kind;
        TransactionState {
            inputs: pt.inputs.into_iter().map(call_arg_into_state).collect(),
            commands: pt.commands.into_iter().map(command_into_state).collect(),
            ..TransactionState::default()
        }
    }
}

fn call_arg_into_state(input: CallArg) -> state::CallArg {
    match input {
        CallArg::Pure(bytes) => state::CallArg::Pure { bytes },
        CallArg::Object(ObjectArg::ImmOrOwnedObject(oref)) => {
            state::CallArg::Object(state::ObjectArg::ImmOrOwnedObject(oref))
        }
        CallArg::Object(ObjectArg::SharedObject(shared)) => {
            state::CallArg::Object(state::ObjectArg::SharedObject(shared))
        }
        CallArg::Object(ObjectArg::Receiving(oref)) => {
            state::CallArg::Object(state::ObjectArg::Receiving(oref))
        }
    }
}

fn argument_into_state(argument: Argument) -> state::Argument {
    match argument {
        Argument::GasCoin => state::Argument::GasCoin,
        Argument::Input(input) => state::Argument::Input(input),
        Argument::Result(command) => state::Argument::Result(command),
        Argument::NestedResult(command, result) => state::Argument::NestedResult(command, result),
    }
}

fn command_into_state(command: Command) -> state::Command {
    match command {
        Command::MoveCall(call) => state::Command::MoveCall(Box::new(state::ProgrammableMoveCall {
            package: call.package,
            module: call.module,
            function: call.function,
            type_arguments: call.type_arguments,
            arguments: call.arguments.into_iter().map(argument_into_state).collect(),
        })),
        Command::TransferObjects(objects, recipient) => state::Command::TransferObjects(
            objects.into_iter().map(argument_into_state).collect(),
            argument_into_state(recipient),
        ),
        Command::SplitCoins(coin, amounts) => state::Command::SplitCoins(
            argument_into_state(coin),
            amounts.into_iter().map(argument_into_state).collect(),
        ),
        Command::MergeCoins(destination, sources) => state::Command::MergeCoins(
            argument_into_state(destination),
            sources.into_iter().map(argument_into_state).collect(),
        ),
        Command::MakeMoveVec(type_, elements) => state::Command::MakeMoveVec(
            type_,
            elements.into_iter().map(argument_into_state).collect(),
        ),
        Command::Publish(modules, dependencies) => state::Command::Publish(modules, dependencies),
        Command::Upgrade(modules, dependencies, package, ticket) => state::Command::Upgrade(
            modules,
            dependencies,
            package,
            argument_into_state(ticket),
        ),
    }
}
