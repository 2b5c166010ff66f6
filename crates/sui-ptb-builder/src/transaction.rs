// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The user-facing assembly API. Appending commands returns result handles
//! whose concrete indices are already bound; appending inputs deduplicates
//! objects by id. `build` drives the resolution pipeline and encodes the
//! canonical bytes.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use move_core_types::language_storage::TypeTag;
use move_core_types::u256::U256;
use serde::Serialize;
use serde_json::Value as JsonValue;

use sui_ptb_types::base_types::{ObjectID, ObjectRef, SuiAddress};
use sui_ptb_types::digests::TransactionDigest;
use sui_ptb_types::error::{StateResult, TransactionStateError};
use sui_ptb_types::transaction::{
    Argument, CallArg, Command, IntentValue, ObjectArg, ProgrammableMoveCall, RawValue,
    RawValueKind, TransactionExpiration, TransactionIntent, TransactionState, UnresolvedObject,
};
use sui_ptb_types::{
    json, SUI_CLOCK_OBJECT_ID, SUI_DENY_LIST_OBJECT_ID, SUI_RANDOMNESS_STATE_OBJECT_ID,
    SUI_SYSTEM_STATE_OBJECT_ID,
};

use crate::builder::{BuildParams, TransactionDataBuilder, TransactionDataOverrides};
use crate::client::{ChainClient, TransactionLimits};
use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{BuildPlugin, BuildStep, ResolutionPipeline, StepOptions};
use crate::signer::{SignedTransaction, Signer};
use crate::steps::intents::IntentResolver;

/// A handle to the result slots of an appended command. Usable directly as
/// the command's single result, or positionally through [`Self::nested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionResult {
    command: u16,
    intent: bool,
}

impl TransactionResult {
    pub fn argument(&self) -> Argument {
        if self.intent {
            Argument::IntentResult(self.command)
        } else {
            Argument::Result(self.command)
        }
    }

    /// The `index`-th result produced by the command.
    pub fn nested(&self, index: u16) -> Argument {
        if self.intent {
            Argument::NestedIntentResult(self.command, index)
        } else {
            Argument::NestedResult(self.command, index)
        }
    }
}

impl From<TransactionResult> for Argument {
    fn from(result: TransactionResult) -> Self {
        result.argument()
    }
}

impl From<&TransactionResult> for Argument {
    fn from(result: &TransactionResult) -> Self {
        result.argument()
    }
}

/// A deferred argument: the closure runs against the transaction at
/// registration time, so helpers can append their own inputs and commands.
pub type ArgumentProducer =
    Box<dyn FnOnce(&mut Transaction) -> TransactionBuilderResult<Argument> + Send>;

/// Anything accepted in an object slot: an id string, a fully-specified call
/// argument, an existing argument handle, or a producer closure.
pub enum ObjectInput {
    Id(String),
    CallArg(CallArg),
    Argument(Argument),
    Producer(ArgumentProducer),
}

impl ObjectInput {
    pub fn producer(
        f: impl FnOnce(&mut Transaction) -> TransactionBuilderResult<Argument> + Send + 'static,
    ) -> Self {
        ObjectInput::Producer(Box::new(f))
    }
}

impl From<&str> for ObjectInput {
    fn from(id: &str) -> Self {
        ObjectInput::Id(id.to_owned())
    }
}

impl From<String> for ObjectInput {
    fn from(id: String) -> Self {
        ObjectInput::Id(id)
    }
}

impl From<ObjectID> for ObjectInput {
    fn from(id: ObjectID) -> Self {
        ObjectInput::Id(id.to_string())
    }
}

impl From<CallArg> for ObjectInput {
    fn from(value: CallArg) -> Self {
        ObjectInput::CallArg(value)
    }
}

impl From<Argument> for ObjectInput {
    fn from(argument: Argument) -> Self {
        ObjectInput::Argument(argument)
    }
}

impl From<TransactionResult> for ObjectInput {
    fn from(result: TransactionResult) -> Self {
        ObjectInput::Argument(result.argument())
    }
}

impl From<&TransactionResult> for ObjectInput {
    fn from(result: &TransactionResult) -> Self {
        ObjectInput::Argument(result.argument())
    }
}

/// An amount slot: a number (or decimal string) becomes a pure u64.
pub enum Amount {
    Value(u64),
    Text(String),
    Argument(Argument),
    Producer(ArgumentProducer),
}

impl Amount {
    pub fn producer(
        f: impl FnOnce(&mut Transaction) -> TransactionBuilderResult<Argument> + Send + 'static,
    ) -> Self {
        Amount::Producer(Box::new(f))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Value(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_owned())
    }
}

impl From<Argument> for Amount {
    fn from(argument: Argument) -> Self {
        Amount::Argument(argument)
    }
}

impl From<TransactionResult> for Amount {
    fn from(result: TransactionResult) -> Self {
        Amount::Argument(result.argument())
    }
}

impl From<&TransactionResult> for Amount {
    fn from(result: &TransactionResult) -> Self {
        Amount::Argument(result.argument())
    }
}

/// A recipient slot: an address (or address string) becomes a pure address.
pub enum AddressInput {
    Address(SuiAddress),
    Text(String),
    Argument(Argument),
    Producer(ArgumentProducer),
}

impl From<SuiAddress> for AddressInput {
    fn from(address: SuiAddress) -> Self {
        AddressInput::Address(address)
    }
}

impl From<&str> for AddressInput {
    fn from(address: &str) -> Self {
        AddressInput::Text(address.to_owned())
    }
}

impl From<String> for AddressInput {
    fn from(address: String) -> Self {
        AddressInput::Text(address)
    }
}

impl From<Argument> for AddressInput {
    fn from(argument: Argument) -> Self {
        AddressInput::Argument(argument)
    }
}

impl From<TransactionResult> for AddressInput {
    fn from(result: TransactionResult) -> Self {
        AddressInput::Argument(result.argument())
    }
}

/// Options for one `build`/`to_json`/`digest` invocation.
#[derive(Clone, Default)]
pub struct BuildOptions {
    pub client: Option<Arc<dyn ChainClient>>,
    pub only_transaction_kind: bool,
    /// Protocol limits; fetched from the client (or defaulted) when absent.
    pub limits: Option<TransactionLimits>,
    /// Intent names the serialization target understands natively; these are
    /// left in place instead of being resolved.
    pub supported_intents: Vec<String>,
    pub overrides: Option<TransactionDataOverrides>,
    pub max_size_bytes: Option<u64>,
}

#[derive(Clone, Default)]
pub struct Transaction {
    builder: TransactionDataBuilder,
    intent_resolvers: BTreeMap<String, Arc<dyn IntentResolver>>,
    plugins: Vec<(BuildStep, Arc<dyn BuildPlugin>)>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: TransactionState) -> Self {
        Self {
            builder: TransactionDataBuilder::from_state(state),
            ..Self::default()
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> StateResult<Self> {
        Ok(Self {
            builder: TransactionDataBuilder::from_bytes(bytes)?,
            ..Self::default()
        })
    }

    pub fn from_kind_bytes(bytes: &[u8]) -> StateResult<Self> {
        Ok(Self {
            builder: TransactionDataBuilder::from_kind_bytes(bytes)?,
            ..Self::default()
        })
    }

    /// Restores a JSON snapshot in either schema version.
    pub fn restore(value: &JsonValue) -> StateResult<Self> {
        Ok(Self {
            builder: TransactionDataBuilder::restore(value)?,
            ..Self::default()
        })
    }

    pub fn data(&self) -> &TransactionDataBuilder {
        &self.builder
    }

    pub fn data_mut(&mut self) -> &mut TransactionDataBuilder {
        &mut self.builder
    }

    /// The coin the transaction pays gas from.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    // -- inputs -----------------------------------------------------------

    /// Registers an object input, deduplicating by object id. Re-registering
    /// a shared object mutably upgrades the existing input.
    pub fn object(&mut self, input: impl Into<ObjectInput>) -> TransactionBuilderResult<Argument> {
        match input.into() {
            ObjectInput::Argument(argument) => Ok(argument),
            ObjectInput::Producer(producer) => producer(self),
            ObjectInput::Id(id) => {
                let object_id = ObjectID::from_str(&id)?;
                self.object_call_arg(CallArg::UnresolvedObject(UnresolvedObject {
                    object_id,
                    type_signatures: Vec::new(),
                }))
            }
            ObjectInput::CallArg(value) => self.object_call_arg(value),
        }
    }

    fn object_call_arg(&mut self, value: CallArg) -> TransactionBuilderResult<Argument> {
        let Some(id) = value.object_id() else {
            return Ok(self.builder.add_input(RawValueKind::Object, value));
        };
        let inputs = &mut self.builder.state_mut().inputs;
        if let Some(index) = inputs
            .iter()
            .position(|input| input.object_id() == Some(id))
        {
            let existing = &mut inputs[index];
            match (&value, &mut *existing) {
                (
                    CallArg::Object(ObjectArg::SharedObject(new)),
                    CallArg::Object(ObjectArg::SharedObject(old)),
                ) => old.mutable |= new.mutable,
                // A fully-specified reference supersedes an unresolved one.
                (CallArg::Object(_), CallArg::UnresolvedObject(_)) => *existing = value,
                _ => {}
            }
            return Ok(Argument::Input(index as u16));
        }
        Ok(self.builder.add_input(RawValueKind::Object, value))
    }

    /// `0x6`, the shared clock.
    pub fn clock_object(&mut self) -> TransactionBuilderResult<Argument> {
        self.well_known_object(SUI_CLOCK_OBJECT_ID)
    }

    /// `0x5`, the system state object.
    pub fn system_state_object(&mut self) -> TransactionBuilderResult<Argument> {
        self.well_known_object(SUI_SYSTEM_STATE_OBJECT_ID)
    }

    /// `0x8`, the randomness state object.
    pub fn random_object(&mut self) -> TransactionBuilderResult<Argument> {
        self.well_known_object(SUI_RANDOMNESS_STATE_OBJECT_ID)
    }

    /// `0x403`, the deny list object.
    pub fn deny_list_object(&mut self) -> TransactionBuilderResult<Argument> {
        self.well_known_object(SUI_DENY_LIST_OBJECT_ID)
    }

    fn well_known_object(&mut self, object_id: ObjectID) -> TransactionBuilderResult<Argument> {
        self.object_call_arg(CallArg::UnresolvedObject(UnresolvedObject {
            object_id,
            type_signatures: Vec::new(),
        }))
    }

    /// Appends an already-serialized pure input.
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Argument {
        self.builder
            .add_input(RawValueKind::Pure, CallArg::Pure { bytes })
    }

    /// Serializes `value` with BCS and appends it as a pure input.
    pub fn pure<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> TransactionBuilderResult<Argument> {
        let bytes = bcs::to_bytes(value).map_err(TransactionStateError::from)?;
        Ok(self.pure_bytes(bytes))
    }

    /// Appends a raw value whose layout is decided later, when input
    /// normalization sees the Move signature it is passed to.
    pub fn pure_value(&mut self, value: JsonValue) -> Argument {
        self.builder.add_input(
            RawValueKind::Pure,
            CallArg::RawValue(RawValue { value, kind: None }),
        )
    }

    pub fn pure_bool(&mut self, value: bool) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u8(&mut self, value: u8) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u16(&mut self, value: u16) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u32(&mut self, value: u32) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u64(&mut self, value: u64) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u128(&mut self, value: u128) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_u256(&mut self, value: U256) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_address(&mut self, value: SuiAddress) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_id(&mut self, value: ObjectID) -> TransactionBuilderResult<Argument> {
        self.pure(&value)
    }

    pub fn pure_string(&mut self, value: &str) -> TransactionBuilderResult<Argument> {
        self.pure(value)
    }

    // -- commands ---------------------------------------------------------

    /// Appends a command and returns the handle to its results.
    pub fn add(&mut self, command: Command) -> TransactionResult {
        let intent = matches!(command, Command::TransactionIntent(_));
        let command = self.builder.add_command(command);
        TransactionResult { command, intent }
    }

    /// Appends a symbolic intent command; a registered resolver rewrites it
    /// at build time.
    pub fn add_intent(
        &mut self,
        name: &str,
        inputs: BTreeMap<String, IntentValue>,
        data: JsonValue,
    ) -> TransactionResult {
        self.add(Command::TransactionIntent(TransactionIntent {
            name: name.to_owned(),
            inputs,
            data,
        }))
    }

    pub fn split_coins(
        &mut self,
        coin: impl Into<ObjectInput>,
        amounts: Vec<Amount>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let coin = self.object(coin)?;
        let amounts = amounts
            .into_iter()
            .map(|amount| self.amount_argument(amount))
            .collect::<TransactionBuilderResult<Vec<_>>>()?;
        Ok(self.add(Command::SplitCoins(coin, amounts)))
    }

    pub fn merge_coins(
        &mut self,
        destination: impl Into<ObjectInput>,
        sources: Vec<ObjectInput>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let destination = self.object(destination)?;
        let sources = self.object_arguments(sources)?;
        Ok(self.add(Command::MergeCoins(destination, sources)))
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<ObjectInput>,
        recipient: impl Into<AddressInput>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let objects = self.object_arguments(objects)?;
        let recipient = self.address_argument(recipient.into())?;
        Ok(self.add(Command::TransferObjects(objects, recipient)))
    }

    pub fn move_call(
        &mut self,
        package: ObjectID,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<ObjectInput>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let module = parse_identifier(module)?;
        let function = parse_identifier(function)?;
        let arguments = self.object_arguments(arguments)?;
        Ok(self.add(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        }))))
    }

    pub fn make_move_vec(
        &mut self,
        type_: Option<TypeTag>,
        elements: Vec<ObjectInput>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let elements = self.object_arguments(elements)?;
        Ok(self.add(Command::MakeMoveVec(type_, elements)))
    }

    pub fn publish(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectID>,
    ) -> TransactionResult {
        self.add(Command::Publish(modules, dependencies))
    }

    pub fn upgrade(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectID>,
        package: ObjectID,
        ticket: impl Into<ObjectInput>,
    ) -> TransactionBuilderResult<TransactionResult> {
        let ticket = self.object(ticket)?;
        Ok(self.add(Command::Upgrade(modules, dependencies, package, ticket)))
    }

    fn object_arguments(
        &mut self,
        inputs: Vec<ObjectInput>,
    ) -> TransactionBuilderResult<Vec<Argument>> {
        inputs
            .into_iter()
            .map(|input| self.object(input))
            .collect()
    }

    fn amount_argument(&mut self, amount: Amount) -> TransactionBuilderResult<Argument> {
        match amount {
            Amount::Value(value) => self.pure(&value),
            Amount::Text(text) => {
                let value: u64 = text.parse().map_err(|_| {
                    TransactionStateError::validation(
                        "amount",
                        format!("invalid u64 amount `{text}`"),
                    )
                })?;
                self.pure(&value)
            }
            Amount::Argument(argument) => Ok(argument),
            Amount::Producer(producer) => producer(self),
        }
    }

    fn address_argument(&mut self, address: AddressInput) -> TransactionBuilderResult<Argument> {
        match address {
            AddressInput::Address(address) => self.pure(&address),
            AddressInput::Text(text) => {
                let address = SuiAddress::from_str(&text)?;
                self.pure(&address)
            }
            AddressInput::Argument(argument) => Ok(argument),
            AddressInput::Producer(producer) => producer(self),
        }
    }

    // -- gas and metadata -------------------------------------------------

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.builder.state_mut().sender = Some(sender);
    }

    pub fn set_sender_if_not_set(&mut self, sender: SuiAddress) {
        let state = self.builder.state_mut();
        if state.sender.is_none() {
            state.sender = Some(sender);
        }
    }

    pub fn set_expiration(&mut self, expiration: Option<TransactionExpiration>) {
        self.builder.state_mut().expiration = expiration;
    }

    pub fn set_gas_price(&mut self, price: u64) {
        self.builder.state_mut().gas_data.price = Some(price);
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.builder.state_mut().gas_data.budget = Some(budget);
    }

    pub fn set_gas_owner(&mut self, owner: SuiAddress) {
        self.builder.state_mut().gas_data.owner = Some(owner);
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) {
        self.builder.state_mut().gas_data.payment = Some(payment);
    }

    // -- extension points -------------------------------------------------

    /// Registers the resolver invoked for intents named `name`.
    pub fn register_intent_resolver(
        &mut self,
        name: &str,
        resolver: Arc<dyn IntentResolver>,
    ) -> TransactionBuilderResult {
        if self.intent_resolvers.contains_key(name) {
            return Err(TransactionBuilderError::IntentResolverConflict(
                name.to_owned(),
            ));
        }
        self.intent_resolvers.insert(name.to_owned(), resolver);
        Ok(())
    }

    /// Registers a plugin on one resolution step. Plugins run in
    /// registration order, ahead of the step's terminal handler.
    pub fn with_build_plugin(&mut self, step: BuildStep, plugin: Arc<dyn BuildPlugin>) {
        self.plugins.push((step, plugin));
    }

    // -- serialization ----------------------------------------------------

    /// The current snapshot in the canonical JSON form, without running any
    /// resolution.
    pub fn serialize(&self) -> StateResult<JsonValue> {
        self.builder.to_json()
    }

    /// Runs the non-gas preparation steps, then returns the JSON snapshot.
    pub async fn to_json(
        &mut self,
        options: &BuildOptions,
    ) -> TransactionBuilderResult<JsonValue> {
        self.prepare(options, false).await?;
        Ok(json::to_json(self.builder.state()))
    }

    /// Runs the full resolution pipeline and encodes the canonical bytes.
    pub async fn build(&mut self, options: &BuildOptions) -> TransactionBuilderResult<Vec<u8>> {
        let with_gas = !options.only_transaction_kind;
        let limits = self.prepare(options, with_gas).await?;
        self.builder.build(&BuildParams {
            only_transaction_kind: options.only_transaction_kind,
            overrides: options.overrides.clone(),
            max_size_bytes: Some(options.max_size_bytes.unwrap_or(limits.max_tx_size_bytes)),
        })
    }

    /// Builds the full transaction and returns its digest.
    pub async fn digest(
        &mut self,
        options: &BuildOptions,
    ) -> TransactionBuilderResult<TransactionDigest> {
        let mut options = options.clone();
        options.only_transaction_kind = false;
        let bytes = self.build(&options).await?;
        Ok(TransactionDigest::from_transaction_bytes(&bytes))
    }

    /// Builds the full transaction and signs its bytes.
    pub async fn sign(
        &mut self,
        options: &BuildOptions,
        signer: &dyn Signer,
    ) -> TransactionBuilderResult<SignedTransaction> {
        let bytes = self.build(options).await?;
        let signature = signer
            .sign(&bytes)
            .await
            .map_err(TransactionBuilderError::Signer)?;
        Ok(SignedTransaction { bytes, signature })
    }

    async fn prepare(
        &mut self,
        options: &BuildOptions,
        with_gas: bool,
    ) -> TransactionBuilderResult<TransactionLimits> {
        let limits = match &options.limits {
            Some(limits) => limits.clone(),
            None => match &options.client {
                Some(client) => {
                    TransactionLimits::from_protocol_config(&client.get_protocol_config().await?)
                }
                None => TransactionLimits::default(),
            },
        };
        let pipeline = ResolutionPipeline {
            plugins: self.plugins.clone(),
            intent_resolvers: self.intent_resolvers.clone(),
            supported_intents: options.supported_intents.clone(),
        };
        pipeline
            .run(
                &mut self.builder,
                options.client.as_deref(),
                &limits,
                StepOptions {
                    only_transaction_kind: options.only_transaction_kind,
                    intent_name: None,
                },
                with_gas,
            )
            .await?;
        Ok(limits)
    }
}

fn parse_identifier(s: &str) -> StateResult<move_core_types::identifier::Identifier> {
    move_core_types::identifier::Identifier::new(s)
        .map_err(|e| TransactionStateError::validation("identifier", format!("`{s}`: {e}")))
}
