// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Execution backends.
//!
//! This module provides the [`QuantumBackend`] contract, the [`Ansatz`]
//! abstraction that drives it, and:
//!
//! - [`RecordingBackend`]: captures an ansatz into a
//!   [`CircuitBuilder`](crate::circuit::CircuitBuilder) for QASM export
//! - [`BackendRegistry`]: selects a backend implementation by name

pub mod recording;
pub mod registry;
pub mod r#trait;

pub use r#trait::{Ansatz, BackendType, CircuitInfo, ExecutionInfo, GateAck, QuantumBackend};
pub use recording::RecordingBackend;
pub use registry::{BackendFactory, BackendRegistry};
