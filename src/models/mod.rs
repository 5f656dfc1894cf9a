// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling data model: settings, frames, markers, the label table and
//! the session state machine tying them together.

pub mod annotation;
pub mod drag;
pub mod frames;
pub mod project;
pub mod session;
pub mod store;
