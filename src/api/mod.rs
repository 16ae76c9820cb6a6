// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP API layer

pub mod courses;
pub mod http_server;

pub use http_server::{build_router, start_server, AppState};
