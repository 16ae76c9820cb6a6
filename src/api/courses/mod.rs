// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course search API endpoint
//!
//! Provides the `/resources/courses` HTTP endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::courses_handler;
pub use request::{CoursesQuery, Language};
pub use response::CoursesApiResponse;
