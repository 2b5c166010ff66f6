// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod base_types;
pub mod digests;
pub mod error;
pub mod json;
pub mod transaction;
pub mod transaction_data;
pub mod type_signature;
pub mod v1;

use base_types::ObjectID;

/// 0x1 -- address of the Move standard library.
pub const MOVE_STDLIB_PACKAGE_ID: ObjectID = builtin_object_id(1);
/// 0x2 -- address of the framework package.
pub const SUI_FRAMEWORK_PACKAGE_ID: ObjectID = builtin_object_id(2);
/// 0x5 -- address of the system state object.
pub const SUI_SYSTEM_STATE_OBJECT_ID: ObjectID = builtin_object_id(5);
/// 0x6 -- address of the shared clock object.
pub const SUI_CLOCK_OBJECT_ID: ObjectID = builtin_object_id(6);
/// 0x8 -- address of the shared randomness state object.
pub const SUI_RANDOMNESS_STATE_OBJECT_ID: ObjectID = builtin_object_id(8);
/// 0x403 -- address of the shared deny list object.
pub const SUI_DENY_LIST_OBJECT_ID: ObjectID = builtin_object_id(0x403);

const fn builtin_object_id(value: u16) -> ObjectID {
    let mut bytes = [0u8; ObjectID::LENGTH];
    bytes[ObjectID::LENGTH - 2] = (value >> 8) as u8;
    bytes[ObjectID::LENGTH - 1] = (value & 0xff) as u8;
    ObjectID::from_bytes(bytes)
}
