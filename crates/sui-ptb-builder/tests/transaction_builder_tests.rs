// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use sui_ptb_builder::client::{
    ChainClient, CoinData, DryRunResult, ExecutionStatus, GasUsedSummary, NormalizedFunction,
    ObjectData, ObjectDataOptions, ObjectResponse, Owner, ProtocolConfigResponse,
    TransactionLimits,
};
use sui_ptb_builder::types::base_types::{
    ObjectID, ObjectRef, SequenceNumber, SharedObjectRef, SuiAddress,
};
use sui_ptb_builder::types::digests::ObjectDigest;
use sui_ptb_builder::types::transaction::{
    Argument, CallArg, Command, ObjectArg, TransactionState,
};
use sui_ptb_builder::types::type_signature::{
    DatatypeSignature, OpenMoveTypeSignature, OpenMoveTypeSignatureBody,
};
use sui_ptb_builder::{
    BuildOptions, BuildPlugin, BuildStep, IntentResolver, Next, StepContext, Transaction,
    TransactionBuilderError, TransactionBuilderResult, TransactionDataBuilder,
};

fn addr(s: &str) -> SuiAddress {
    SuiAddress::from_str(s).unwrap()
}

fn oid(s: &str) -> ObjectID {
    ObjectID::from_str(s).unwrap()
}

fn coin_data(id: ObjectID, version: u64) -> CoinData {
    CoinData {
        coin_object_id: id,
        version: SequenceNumber::new(version),
        digest: ObjectDigest::new([7; 32]),
    }
}

fn owned_object(id: ObjectID, owner: SuiAddress) -> ObjectResponse {
    ObjectResponse {
        data: Some(ObjectData {
            object_id: id,
            version: SequenceNumber::new(2),
            digest: ObjectDigest::new([9; 32]),
            owner: Some(Owner::AddressOwner(owner)),
        }),
        error: None,
    }
}

fn datatype(package: &str, module: &str, type_name: &str) -> OpenMoveTypeSignatureBody {
    OpenMoveTypeSignatureBody::Datatype(DatatypeSignature {
        package: oid(package),
        module: module.to_owned(),
        type_name: type_name.to_owned(),
        type_parameters: vec![],
    })
}

fn tx_context_parameter() -> OpenMoveTypeSignature {
    OpenMoveTypeSignature::by_mut_ref(datatype("0x2", "tx_context", "TxContext"))
}

fn successful_dry_run(computation_cost: u64) -> DryRunResult {
    DryRunResult {
        status: ExecutionStatus::Success,
        error: None,
        gas_used: GasUsedSummary {
            computation_cost,
            storage_cost: 100,
            storage_rebate: 50,
        },
    }
}

#[derive(Default)]
struct MockChainClient {
    reference_gas_price: u64,
    coins: Vec<CoinData>,
    objects: BTreeMap<ObjectID, ObjectResponse>,
    functions: BTreeMap<(ObjectID, String, String), NormalizedFunction>,
    dry_run: Option<DryRunResult>,
    gas_price_calls: AtomicUsize,
    dry_run_calls: AtomicUsize,
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_reference_gas_price(&self) -> Result<u64, anyhow::Error> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reference_gas_price)
    }

    async fn get_coins(
        &self,
        _owner: SuiAddress,
        _coin_type: &str,
    ) -> Result<Vec<CoinData>, anyhow::Error> {
        Ok(self.coins.clone())
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectID],
        _options: ObjectDataOptions,
    ) -> Result<Vec<ObjectResponse>, anyhow::Error> {
        Ok(ids
            .iter()
            .map(|id| {
                self.objects.get(id).cloned().unwrap_or(ObjectResponse {
                    data: None,
                    error: Some(format!("object {id} not found")),
                })
            })
            .collect())
    }

    async fn get_normalized_move_function(
        &self,
        package: ObjectID,
        module: &str,
        function: &str,
    ) -> Result<NormalizedFunction, anyhow::Error> {
        self.functions
            .get(&(package, module.to_owned(), function.to_owned()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown function {package}::{module}::{function}"))
    }

    async fn dry_run_transaction_block(
        &self,
        _tx_bytes: &[u8],
    ) -> Result<DryRunResult, anyhow::Error> {
        self.dry_run_calls.fetch_add(1, Ordering::SeqCst);
        self.dry_run
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no dry run result configured"))
    }

    async fn get_protocol_config(&self) -> Result<ProtocolConfigResponse, anyhow::Error> {
        Ok(ProtocolConfigResponse::default())
    }
}

fn options_with(client: &Arc<MockChainClient>) -> BuildOptions {
    BuildOptions {
        client: Some(client.clone() as Arc<dyn ChainClient>),
        ..Default::default()
    }
}

fn offline_options() -> BuildOptions {
    BuildOptions {
        limits: Some(TransactionLimits::default()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transfer_single_coin_end_to_end() {
    let sender = addr("0x11");
    let transferred = oid("0xaaa");
    let gas_coin = oid("0xccc");

    let mut client = MockChainClient::default();
    client.reference_gas_price = 1_000;
    client.objects.insert(transferred, owned_object(transferred, sender));
    client.coins = vec![coin_data(gas_coin, 5)];
    client.dry_run = Some(successful_dry_run(1_000_000));
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    tx.set_sender(sender);
    tx.transfer_objects(vec!["0xaaa".into()], "0xbbb").unwrap();

    let options = options_with(&client);
    let bytes = tx.build(&options).await.unwrap();

    let state = tx.data().state();
    assert_eq!(state.gas_data.price, Some(1_000));
    // computation 1_000_000 + overhead 1000 * price, plus storage 100 - 50.
    assert_eq!(state.gas_data.budget, Some(2_000_050));
    let payment = state.gas_data.payment.as_ref().unwrap();
    assert_eq!(payment.len(), 1);
    assert_eq!(payment[0].object_id, gas_coin);
    assert_eq!(payment[0].version.value(), 5);
    assert!(matches!(
        state.inputs[0],
        CallArg::Object(ObjectArg::ImmOrOwnedObject(oref)) if oref.object_id == transferred
    ));
    // The recipient was force-encoded as a pure address.
    assert!(matches!(
        &state.inputs[1],
        CallArg::Pure { bytes } if bytes.len() == 32 && bytes[31] == 0xbb
    ));

    // Idempotence: a second build changes nothing and repeats no chain work.
    let bytes_again = tx.build(&options).await.unwrap();
    assert_eq!(bytes_again, bytes);
    assert_eq!(client.dry_run_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.gas_price_calls.load(Ordering::SeqCst), 1);

    // Digest is deterministic across invocations.
    let first = tx.digest(&options).await.unwrap();
    let second = tx.digest(&options).await.unwrap();
    assert_eq!(first, second);
    assert!(!first.base58_encode().is_empty());

    // Round-trip: parsing the bytes and rebuilding offline is byte-identical.
    let mut restored = Transaction::from_bytes(&bytes).unwrap();
    let rebuilt = restored.build(&offline_options()).await.unwrap();
    assert_eq!(rebuilt, bytes);
}

#[tokio::test]
async fn test_shared_object_upgraded_to_mutable_by_signature() {
    let shared_id = oid("0x5ead");
    let package = oid("0x2");

    let mut client = MockChainClient::default();
    client.functions.insert(
        (package, "vault".to_owned(), "touch".to_owned()),
        NormalizedFunction {
            parameters: vec![
                OpenMoveTypeSignature::by_mut_ref(datatype("0x2", "vault", "Vault")),
                tx_context_parameter(),
            ],
        },
    );
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    let vault = tx
        .object(CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
            object_id: shared_id,
            initial_shared_version: SequenceNumber::new(3),
            mutable: false,
        })))
        .unwrap();
    tx.move_call(package, "vault", "touch", vec![], vec![vault.into()])
        .unwrap();

    tx.to_json(&options_with(&client)).await.unwrap();

    let state = tx.data().state();
    assert_eq!(state.inputs.len(), 1);
    let CallArg::Object(ObjectArg::SharedObject(shared)) = &state.inputs[0] else {
        panic!("expected a shared object input");
    };
    assert!(shared.mutable);
    assert_eq!(shared.initial_shared_version.value(), 3);
}

#[test]
fn test_replace_command_shifts_later_references() {
    let mut builder = TransactionDataBuilder::new();
    // [A, B, C]; C references its own slot (2), B's slot (1), and A's (0).
    builder.add_command(Command::SplitCoins(Argument::GasCoin, vec![]));
    builder.add_command(Command::SplitCoins(Argument::GasCoin, vec![]));
    builder.add_command(Command::TransferObjects(
        vec![Argument::Result(2), Argument::Result(1), Argument::Result(0)],
        Argument::GasCoin,
    ));

    builder.replace_command(
        1,
        vec![
            Command::SplitCoins(Argument::GasCoin, vec![]),
            Command::MergeCoins(Argument::GasCoin, vec![Argument::Result(1)]),
        ],
    );

    let commands = &builder.state().commands;
    assert_eq!(commands.len(), 4);
    let Command::TransferObjects(objects, _) = &commands[3] else {
        panic!("expected the transfer at the end");
    };
    // Past the splice: shifted. At the splice: bound to the first inserted
    // command. Before the splice: untouched.
    assert_eq!(
        objects,
        &vec![Argument::Result(3), Argument::Result(1), Argument::Result(0)]
    );
    // The inserted command's own references were authored post-splice and
    // were not rewritten.
    let Command::MergeCoins(_, sources) = &commands[2] else {
        panic!("expected the inserted merge");
    };
    assert_eq!(sources, &vec![Argument::Result(1)]);
}

#[tokio::test]
async fn test_raw_value_typed_against_move_signature() {
    let package = oid("0x42");

    let mut client = MockChainClient::default();
    client.functions.insert(
        (package, "m".to_owned(), "f".to_owned()),
        NormalizedFunction {
            parameters: vec![OpenMoveTypeSignature::by_value(
                OpenMoveTypeSignatureBody::U64,
            )],
        },
    );
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    let amount = tx.pure_value(json!(42));
    tx.move_call(package, "m", "f", vec![], vec![amount.into()])
        .unwrap();

    tx.to_json(&options_with(&client)).await.unwrap();

    assert_eq!(
        tx.data().state().inputs[0],
        CallArg::Pure {
            bytes: 42u64.to_le_bytes().to_vec()
        }
    );
}

struct PaydayResolver;

#[async_trait]
impl IntentResolver for PaydayResolver {
    async fn resolve(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        let index = ctx
            .state()
            .commands
            .iter()
            .position(|command| {
                matches!(command, Command::TransactionIntent(intent) if intent.name == "payday")
            })
            .unwrap() as u16;
        ctx.builder.replace_command(
            index,
            vec![
                Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]),
                Command::TransferObjects(
                    vec![Argument::NestedResult(index, 0)],
                    Argument::Input(1),
                ),
            ],
        );
        Ok(())
    }
}

#[tokio::test]
async fn test_intent_resolution_rewrites_and_shifts() {
    let mut tx = Transaction::new();
    let amount = tx.pure_u64(100).unwrap();
    let recipient = tx.pure_address(addr("0xbbb")).unwrap();
    let Argument::Input(_) = amount else { panic!() };
    let Argument::Input(_) = recipient else { panic!() };

    tx.add_intent("payday", BTreeMap::new(), json!({ "memo": "rent" }));
    // B references the intent's slot; C references B's slot.
    tx.add(Command::MakeMoveVec(None, vec![Argument::Result(0)]));
    tx.add(Command::TransferObjects(
        vec![Argument::Result(1)],
        Argument::Input(1),
    ));

    // No resolver registered: the build aborts.
    let err = tx.to_json(&offline_options()).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::UnresolvedIntent(ref name) if name == "payday"
    ));

    // With the resolver in place the same build resumes and succeeds.
    tx.register_intent_resolver("payday", Arc::new(PaydayResolver))
        .unwrap();
    tx.to_json(&offline_options()).await.unwrap();

    let commands = &tx.data().state().commands;
    assert_eq!(commands.len(), 4);
    assert!(matches!(commands[0], Command::SplitCoins(..)));
    assert!(matches!(commands[1], Command::TransferObjects(..)));
    // B still points at the first replacement command; C shifted past the
    // inserted one.
    let Command::MakeMoveVec(_, elements) = &commands[2] else {
        panic!("expected the vector command");
    };
    assert_eq!(elements, &vec![Argument::Result(0)]);
    let Command::TransferObjects(objects, _) = &commands[3] else {
        panic!("expected the trailing transfer");
    };
    assert_eq!(objects, &vec![Argument::Result(2)]);
}

#[tokio::test]
async fn test_duplicate_intent_resolver_conflicts() {
    let mut tx = Transaction::new();
    tx.register_intent_resolver("payday", Arc::new(PaydayResolver))
        .unwrap();
    let err = tx
        .register_intent_resolver("payday", Arc::new(PaydayResolver))
        .unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::IntentResolverConflict(ref name) if name == "payday"
    ));
}

#[tokio::test]
async fn test_supported_intents_are_left_in_place() {
    let mut tx = Transaction::new();
    tx.add_intent("payday", BTreeMap::new(), json!(null));
    let options = BuildOptions {
        supported_intents: vec!["payday".to_owned()],
        ..offline_options()
    };
    let value = tx.to_json(&options).await.unwrap();
    assert_eq!(value["commands"][0]["$kind"], "TransactionIntent");
}

#[tokio::test]
async fn test_gas_payment_skips_coins_used_as_inputs() {
    let sender = addr("0x11");
    let used = oid("0xabc");
    let free = oid("0xdef");

    let mut client = MockChainClient::default();
    client.reference_gas_price = 1_000;
    client.objects.insert(used, owned_object(used, sender));
    client.coins = vec![coin_data(used, 2), coin_data(free, 3)];
    client.dry_run = Some(successful_dry_run(1_000));
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    tx.set_sender(sender);
    tx.transfer_objects(vec!["0xabc".into()], "0xbbb").unwrap();
    tx.build(&options_with(&client)).await.unwrap();

    let payment = tx.data().state().gas_data.payment.clone().unwrap();
    assert_eq!(payment.len(), 1);
    assert_eq!(payment[0].object_id, free);
}

// ---------------------------------------------------------------------------
// Facade behavior
// ---------------------------------------------------------------------------

#[test]
fn test_object_inputs_are_deduplicated() {
    let mut tx = Transaction::new();
    let first = tx.object("0xaaa").unwrap();
    let second = tx.object("0xaaa").unwrap();
    assert_eq!(first, second);
    assert_eq!(tx.data().state().inputs.len(), 1);
}

#[test]
fn test_shared_object_dedup_takes_strongest_mutability() {
    let shared = |mutable| {
        CallArg::Object(ObjectArg::SharedObject(SharedObjectRef {
            object_id: oid("0x5ead"),
            initial_shared_version: SequenceNumber::new(1),
            mutable,
        }))
    };
    let mut tx = Transaction::new();
    let first = tx.object(shared(false)).unwrap();
    let second = tx.object(shared(true)).unwrap();
    assert_eq!(first, second);

    let state = tx.data().state();
    assert_eq!(state.inputs.len(), 1);
    let CallArg::Object(ObjectArg::SharedObject(merged)) = &state.inputs[0] else {
        panic!("expected a shared object input");
    };
    assert!(merged.mutable);
}

#[test]
fn test_result_handles_expose_nested_results() {
    let mut tx = Transaction::new();
    let result = tx.publish(vec![vec![1, 2, 3]], vec![oid("0x2")]);
    assert_eq!(result.argument(), Argument::Result(0));
    assert_eq!(result.nested(0), Argument::NestedResult(0, 0));
    assert_eq!(result.nested(1), Argument::NestedResult(0, 1));

    let intent = tx.add_intent("payday", BTreeMap::new(), json!(null));
    assert_eq!(intent.argument(), Argument::IntentResult(1));
    assert_eq!(intent.nested(1), Argument::NestedIntentResult(1, 1));
}

#[test]
fn test_argument_producers_run_against_the_builder() {
    let mut tx = Transaction::new();
    tx.split_coins(
        sui_ptb_builder::ObjectInput::producer(|tx| Ok(tx.gas())),
        vec![sui_ptb_builder::Amount::producer(|tx| tx.pure_u64(7))],
    )
    .unwrap();
    let state = tx.data().state();
    assert!(matches!(
        state.commands[0],
        Command::SplitCoins(Argument::GasCoin, ref amounts) if amounts == &vec![Argument::Input(0)]
    ));
    assert_eq!(
        state.inputs[0],
        CallArg::Pure {
            bytes: 7u64.to_le_bytes().to_vec()
        }
    );
}

#[tokio::test]
async fn test_kind_only_build_skips_gas_and_round_trips() {
    let mut tx = Transaction::new();
    let amount = tx.pure_u64(5).unwrap();
    tx.split_coins(tx.gas(), vec![amount.into()]).unwrap();

    let options = BuildOptions {
        only_transaction_kind: true,
        ..offline_options()
    };
    let bytes = tx.build(&options).await.unwrap();

    let restored = Transaction::from_kind_bytes(&bytes).unwrap();
    let state = restored.data().state();
    assert_eq!(state.commands.len(), 1);
    assert_eq!(state.gas_data, Default::default());
}

#[tokio::test]
async fn test_serialize_restore_round_trip() {
    let mut tx = Transaction::new();
    tx.set_sender(addr("0x11"));
    let coin = tx.object("0xaaa").unwrap();
    tx.split_coins(coin, vec![42u64.into()]).unwrap();

    let snapshot = tx.serialize().unwrap();
    let restored = Transaction::restore(&snapshot).unwrap();
    assert_eq!(restored.data().state(), tx.data().state());
}

// ---------------------------------------------------------------------------
// Pipeline behavior
// ---------------------------------------------------------------------------

struct PinGasPrice(u64);

#[async_trait]
impl BuildPlugin for PinGasPrice {
    async fn handle(
        &self,
        _step: BuildStep,
        ctx: &mut StepContext<'_>,
        _next: Next<'_>,
    ) -> TransactionBuilderResult {
        // Short-circuit: the terminal never runs, so the chain is not asked.
        if ctx.state().gas_data.price.is_none() {
            ctx.state_mut().gas_data.price = Some(self.0);
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_plugin_short_circuits_terminal_handler() {
    let sender = addr("0x11");
    let mut client = MockChainClient::default();
    client.reference_gas_price = 1_000;
    client.coins = vec![coin_data(oid("0xccc"), 1)];
    client.dry_run = Some(successful_dry_run(1_000));
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    tx.set_sender(sender);
    let amount = tx.pure_u64(5).unwrap();
    tx.split_coins(tx.gas(), vec![amount.into()]).unwrap();
    tx.with_build_plugin(BuildStep::SetGasPrice, Arc::new(PinGasPrice(777)));

    tx.build(&options_with(&client)).await.unwrap();

    assert_eq!(tx.data().state().gas_data.price, Some(777));
    assert_eq!(client.gas_price_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unresolved_object_without_client_is_an_error() {
    let mut tx = Transaction::new();
    let object = tx.object("0xaaa").unwrap();
    tx.transfer_objects(vec![object.into()], "0xbbb").unwrap();
    let err = tx.to_json(&offline_options()).await.unwrap_err();
    assert!(matches!(err, TransactionBuilderError::MissingClient));
}

#[tokio::test]
async fn test_unknown_object_fails_with_invalid_inputs() {
    let client = Arc::new(MockChainClient::default());
    let mut tx = Transaction::new();
    let object = tx.object("0xaaa").unwrap();
    tx.transfer_objects(vec![object.into()], "0xbbb").unwrap();
    let err = tx.to_json(&options_with(&client)).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::InvalidObjectInputs { ref ids } if ids == &vec![oid("0xaaa")]
    ));
}

#[tokio::test]
async fn test_arity_mismatch_is_reported() {
    let package = oid("0x42");
    let mut client = MockChainClient::default();
    client.functions.insert(
        (package, "m".to_owned(), "f".to_owned()),
        NormalizedFunction {
            parameters: vec![tx_context_parameter()],
        },
    );
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    let amount = tx.pure_value(json!(1));
    tx.move_call(package, "m", "f", vec![], vec![amount.into()])
        .unwrap();
    let err = tx.to_json(&options_with(&client)).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::ArityMismatch {
            expected: 0,
            actual: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn test_non_string_raw_value_for_object_parameter_is_rejected() {
    let package = oid("0x42");
    let mut client = MockChainClient::default();
    client.functions.insert(
        (package, "m".to_owned(), "f".to_owned()),
        NormalizedFunction {
            parameters: vec![OpenMoveTypeSignature::by_value(datatype(
                "0x2", "coin", "Coin",
            ))],
        },
    );
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    let raw = tx.pure_value(json!(42));
    tx.move_call(package, "m", "f", vec![], vec![raw.into()])
        .unwrap();
    let err = tx.to_json(&options_with(&client)).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::ExpectedObjectIdString { index: 0 }
    ));
}

#[tokio::test]
async fn test_pure_size_bound_is_enforced() {
    let mut tx = Transaction::new();
    tx.pure_bytes(vec![0; 32]);
    let options = BuildOptions {
        limits: Some(TransactionLimits {
            max_pure_argument_size: 16,
            ..TransactionLimits::default()
        }),
        ..Default::default()
    };
    let err = tx.to_json(&options).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::PureTooLarge {
            index: 0,
            size: 32,
            max: 16
        }
    ));
}

#[tokio::test]
async fn test_too_many_gas_coins_is_rejected() {
    let mut tx = Transaction::new();
    tx.set_sender(addr("0x11"));
    tx.set_gas_price(1_000);
    tx.set_gas_budget(1_000_000);
    tx.set_gas_payment(
        (0..3)
            .map(|i| ObjectRef::new(oid(&format!("0x{i}1")), SequenceNumber::new(1), ObjectDigest::new([1; 32])))
            .collect(),
    );
    let options = BuildOptions {
        limits: Some(TransactionLimits {
            max_gas_objects: 2,
            ..TransactionLimits::default()
        }),
        ..Default::default()
    };
    let err = tx.build(&options).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::TooManyGasCoins { max: 2 }
    ));
}

#[tokio::test]
async fn test_no_gas_coins_is_rejected() {
    let sender = addr("0x11");
    let mut client = MockChainClient::default();
    client.reference_gas_price = 1_000;
    client.coins = vec![];
    client.dry_run = Some(successful_dry_run(1_000));
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    tx.set_sender(sender);
    let amount = tx.pure_u64(5).unwrap();
    tx.split_coins(tx.gas(), vec![amount.into()]).unwrap();
    let err = tx.build(&options_with(&client)).await.unwrap_err();
    assert!(matches!(err, TransactionBuilderError::NoGasCoins));
}

#[tokio::test]
async fn test_dry_run_failure_aborts_the_build() {
    let sender = addr("0x11");
    let mut client = MockChainClient::default();
    client.reference_gas_price = 1_000;
    client.coins = vec![coin_data(oid("0xccc"), 1)];
    client.dry_run = Some(DryRunResult {
        status: ExecutionStatus::Failure,
        error: Some("insufficient balance".to_owned()),
        gas_used: GasUsedSummary::default(),
    });
    let client = Arc::new(client);

    let mut tx = Transaction::new();
    tx.set_sender(sender);
    let amount = tx.pure_u64(5).unwrap();
    tx.split_coins(tx.gas(), vec![amount.into()]).unwrap();
    let err = tx.build(&options_with(&client)).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::DryRunFailed { ref error, .. } if error == "insufficient balance"
    ));
}

#[tokio::test]
async fn test_transaction_size_bound_is_enforced() {
    let mut tx = Transaction::new();
    let amount = tx.pure_u64(5).unwrap();
    tx.split_coins(tx.gas(), vec![amount.into()]).unwrap();
    let options = BuildOptions {
        only_transaction_kind: true,
        max_size_bytes: Some(4),
        ..offline_options()
    };
    let err = tx.build(&options).await.unwrap_err();
    assert!(matches!(
        err,
        TransactionBuilderError::TransactionTooLarge { max: 4, .. }
    ));
}

#[test]
fn test_snapshot_has_no_aliasing() {
    let mut tx = Transaction::new();
    tx.pure_bytes(vec![1]);
    let mut snapshot: TransactionState = tx.data().snapshot().unwrap();
    snapshot.inputs.clear();
    assert_eq!(tx.data().state().inputs.len(), 1);
}
