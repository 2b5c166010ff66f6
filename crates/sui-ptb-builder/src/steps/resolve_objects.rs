// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Object resolution: every `UnresolvedObject` input is replaced with a
//! fully-specified object reference, using owner metadata fetched from the
//! chain and the type signatures accumulated during input normalization.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use sui_ptb_types::base_types::{ObjectID, SharedObjectRef};
use sui_ptb_types::transaction::{CallArg, ObjectArg};
use sui_ptb_types::type_signature::OpenMoveTypeSignature;

use crate::client::{ObjectData, ObjectDataOptions};
use crate::error::{TransactionBuilderError, TransactionBuilderResult};
use crate::pipeline::{StepContext, TerminalHandler};

/// Object metadata is fetched in chunks of at most this many ids.
const OBJECTS_PER_FETCH: usize = 50;

pub struct ResolveObjectReferences;

#[async_trait]
impl TerminalHandler for ResolveObjectReferences {
    async fn run(&self, ctx: &mut StepContext<'_>) -> TransactionBuilderResult {
        let unresolved: Vec<(usize, ObjectID)> = ctx
            .state()
            .inputs
            .iter()
            .enumerate()
            .filter_map(|(index, input)| match input {
                CallArg::UnresolvedObject(u) => Some((index, u.object_id)),
                _ => None,
            })
            .collect();
        if unresolved.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<ObjectID> = Vec::new();
        let mut seen = BTreeSet::new();
        for (_, id) in &unresolved {
            if seen.insert(*id) {
                ids.push(*id);
            }
        }
        debug!(objects = ids.len(), "resolving object references");

        let client = ctx.client()?;
        let fetches = ids.chunks(OBJECTS_PER_FETCH).map(|chunk| {
            client.multi_get_objects(chunk, ObjectDataOptions { show_owner: true })
        });
        let mut responses = Vec::with_capacity(ids.len());
        for chunk in join_all(fetches).await {
            responses.extend(chunk?);
        }

        let mut by_id: BTreeMap<ObjectID, ObjectData> = BTreeMap::new();
        let mut invalid = Vec::new();
        for (id, response) in ids.iter().zip(responses) {
            match (response.data, response.error) {
                (Some(data), None) => {
                    by_id.insert(*id, data);
                }
                _ => invalid.push(*id),
            }
        }
        if !invalid.is_empty() {
            return Err(TransactionBuilderError::InvalidObjectInputs { ids: invalid });
        }

        // Ids already pinned elsewhere as mutable shared inputs stay mutable.
        let known_mutable: BTreeSet<ObjectID> = ctx
            .state()
            .inputs
            .iter()
            .filter_map(|input| match input {
                CallArg::Object(ObjectArg::SharedObject(shared)) if shared.mutable => {
                    Some(shared.object_id)
                }
                _ => None,
            })
            .collect();

        for (index, id) in unresolved {
            let Some(data) = by_id.get(&id) else {
                return Err(TransactionBuilderError::InvalidObjectInputs { ids: vec![id] });
            };
            let state = ctx.state_mut();
            let Some(CallArg::UnresolvedObject(u)) = state.inputs.get(index) else {
                continue;
            };
            let signatures = &u.type_signatures;
            let initial_shared_version = data
                .owner
                .as_ref()
                .and_then(|owner| owner.initial_shared_version());
            let is_mutable = known_mutable.contains(&id)
                || signatures.iter().any(OpenMoveTypeSignature::is_by_value)
                || signatures
                    .iter()
                    .any(OpenMoveTypeSignature::is_mutable_reference);
            let is_receiving = initial_shared_version.is_none()
                && signatures.iter().any(OpenMoveTypeSignature::is_receiving);

            let resolved = match initial_shared_version {
                Some(initial_shared_version) => ObjectArg::SharedObject(SharedObjectRef {
                    object_id: id,
                    initial_shared_version,
                    mutable: is_mutable,
                }),
                None if is_receiving => ObjectArg::Receiving(data.object_ref()),
                None => ObjectArg::ImmOrOwnedObject(data.object_ref()),
            };
            state.inputs[index] = CallArg::Object(resolved);
        }
        Ok(())
    }
}
