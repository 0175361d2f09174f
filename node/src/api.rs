// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use merkle_kernel::{Digest, TreeSummary};
use serde::{Deserialize, Serialize};

/// Envelope shared by every response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiStatus {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiStatus {
    pub fn ok() -> Self {
        Self { status: true, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TreeStatusResponse {
    #[serde(flatten)]
    pub api: ApiStatus,
    // null while the tree has no leaves
    pub tree: Option<TreeSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InsertRequest {
    #[serde(default)]
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InsertResponse {
    #[serde(flatten)]
    pub api: ApiStatus,
    pub index: usize,
    pub hash: Digest,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProofResponse {
    #[serde(flatten)]
    pub api: ApiStatus,
    pub index: usize,
    /// Sibling hashes, leaf level first.
    pub hashes: Vec<Digest>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HashAtResponse {
    #[serde(flatten)]
    pub api: ApiStatus,
    pub index: usize,
    pub hash: Digest,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ValidateRequest {
    #[serde(default)]
    pub data: String,
    pub index: usize,
    #[serde(default)]
    pub hashes: Vec<Digest>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub api: ApiStatus,
    pub exists: bool,
}
