// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP layer: thin plumbing between the routing surface and the node
//! facade.

pub mod http_server;

pub use http_server::{router, start_server};
