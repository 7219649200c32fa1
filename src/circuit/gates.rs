// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gate table for OpenQASM 2.0 emission.
//!
//! Every supported gate is a [`Gate`] variant. Arity, mnemonic and parameter
//! keys are exhaustive matches, so adding a variant without its data fails to
//! compile. User-facing names (including synonyms such as `cnot` or
//! `toffoli`) resolve through [`ALIASES`].

use std::fmt;

use super::GateParams;

/// Gates the QASM serializer knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Sdg,
    Tdg,
    Rx,
    Ry,
    Rz,
    /// General single-qubit rotation, emitted as `u3`.
    U,
    Cx,
    Cy,
    Cz,
    Swap,
    Ccx,
}

/// Accepted names (lower case) and the gate they resolve to.
pub const ALIASES: &[(&str, Gate)] = &[
    ("h", Gate::H),
    ("hadamard", Gate::H),
    ("x", Gate::X),
    ("pauli-x", Gate::X),
    ("y", Gate::Y),
    ("pauli-y", Gate::Y),
    ("z", Gate::Z),
    ("pauli-z", Gate::Z),
    ("s", Gate::S),
    ("s-gate", Gate::S),
    ("t", Gate::T),
    ("t-gate", Gate::T),
    ("sdg", Gate::Sdg),
    ("tdg", Gate::Tdg),
    ("rx", Gate::Rx),
    ("ry", Gate::Ry),
    ("rz", Gate::Rz),
    ("u", Gate::U),
    ("unitary", Gate::U),
    ("u3", Gate::U),
    ("cx", Gate::Cx),
    ("cnot", Gate::Cx),
    ("cy", Gate::Cy),
    ("cz", Gate::Cz),
    ("swap", Gate::Swap),
    ("ccx", Gate::Ccx),
    ("toffoli", Gate::Ccx),
];

impl Gate {
    /// All gates, in table order.
    pub const ALL: [Gate; 17] = [
        Gate::H,
        Gate::X,
        Gate::Y,
        Gate::Z,
        Gate::S,
        Gate::T,
        Gate::Sdg,
        Gate::Tdg,
        Gate::Rx,
        Gate::Ry,
        Gate::Rz,
        Gate::U,
        Gate::Cx,
        Gate::Cy,
        Gate::Cz,
        Gate::Swap,
        Gate::Ccx,
    ];

    /// Resolve a user-facing gate name, ignoring case.
    pub fn from_name(name: &str) -> Option<Gate> {
        let lower = name.trim().to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, gate)| *gate)
    }

    /// Number of qubits the gate acts on.
    pub fn arity(self) -> usize {
        match self {
            Gate::H
            | Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::S
            | Gate::T
            | Gate::Sdg
            | Gate::Tdg
            | Gate::Rx
            | Gate::Ry
            | Gate::Rz
            | Gate::U => 1,
            Gate::Cx | Gate::Cy | Gate::Cz | Gate::Swap => 2,
            Gate::Ccx => 3,
        }
    }

    /// OpenQASM 2.0 mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::S => "s",
            Gate::T => "t",
            Gate::Sdg => "sdg",
            Gate::Tdg => "tdg",
            Gate::Rx => "rx",
            Gate::Ry => "ry",
            Gate::Rz => "rz",
            Gate::U => "u3",
            Gate::Cx => "cx",
            Gate::Cy => "cy",
            Gate::Cz => "cz",
            Gate::Swap => "swap",
            Gate::Ccx => "ccx",
        }
    }

    /// Parameter keys read from [`GateParams`], in emission order.
    pub fn param_keys(self) -> &'static [&'static str] {
        match self {
            Gate::Rx | Gate::Ry => &["theta"],
            Gate::Rz => &["phi"],
            Gate::U => &["theta", "phi", "lambda"],
            Gate::H
            | Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::S
            | Gate::T
            | Gate::Sdg
            | Gate::Tdg
            | Gate::Cx
            | Gate::Cy
            | Gate::Cz
            | Gate::Swap
            | Gate::Ccx => &[],
        }
    }

    /// Parameter values in emission order; missing keys read as `0.0`.
    pub fn param_values(self, params: &GateParams) -> Vec<f64> {
        self.param_keys()
            .iter()
            .map(|key| params.get(*key).copied().unwrap_or(0.0))
            .collect()
    }

    /// Emit one QASM instruction. Arity and ranges are checked by the caller.
    pub fn emit(self, qubits: &[u32], params: &GateParams) -> String {
        let targets = qubits
            .iter()
            .map(|q| format!("q[{q}]"))
            .collect::<Vec<_>>()
            .join(",");
        let values = self.param_values(params);
        if values.is_empty() {
            format!("{} {};", self.mnemonic(), targets)
        } else {
            let args = values
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(",");
            format!("{}({}) {};", self.mnemonic(), args, targets)
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
