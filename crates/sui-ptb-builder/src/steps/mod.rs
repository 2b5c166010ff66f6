// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod gas;
pub mod intents;
pub mod normalize_inputs;
pub mod resolve_objects;
pub mod validate;
