// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

/// The seam to key management. Implementations sign the canonical
/// transaction bytes; all key handling stays outside this crate.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, anyhow::Error>;
}

/// A built transaction together with its signature.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub bytes: Vec<u8>,
    pub signature: Vec<u8>,
}
