// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Offline tools for hash logs: inspect, dump, prove and verify without a
//! running node.

pub mod commands;
pub mod engine;
