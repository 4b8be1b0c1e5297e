//! The table of functions callable from lattice source: element constructors,
//! `println` and `Line`.

use std::collections::HashMap;

use crate::types::ValueType;

/// A builtin function signature.
#[derive(Debug, PartialEq)]
pub struct Builtin {
    pub name: &'static str,
    pub return_ty: ValueType,
    pub arity: Arity,
    pub lowering: Lowering,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Arity {
    /// Takes exactly these parameters, in this order.
    Fixed(&'static [Param]),
    Variadic,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ValueType,
    /// Omitted optional parameters default to `0.0`.
    pub required: bool,
}

/// How a call to the builtin is lowered to C.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lowering {
    Println,
    Line,
    /// Positional call to the runtime constructor with this name.
    Constructor(&'static str),
}

impl Builtin {
    /// Parameters of a fixed-arity builtin, or an empty slice.
    pub fn params(&self) -> &'static [Param] {
        match self.arity {
            Arity::Fixed(params) => params,
            Arity::Variadic => &[],
        }
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params().iter().position(|p| p.name == name)
    }

    pub fn is_variadic(&self) -> bool {
        self.arity == Arity::Variadic
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.lowering, Lowering::Constructor(_)) && self.return_ty == ValueType::Element
    }
}

const fn required(name: &'static str) -> Param {
    Param {
        name,
        ty: ValueType::Float,
        required: true,
    }
}

const fn optional(name: &'static str) -> Param {
    Param {
        name,
        ty: ValueType::Float,
        required: false,
    }
}

const fn element(name: &'static str, runtime_fn: &'static str, params: &'static [Param]) -> Builtin {
    Builtin {
        name,
        return_ty: ValueType::Element,
        arity: Arity::Fixed(params),
        lowering: Lowering::Constructor(runtime_fn),
    }
}

const DRIFT: &[Param] = &[required("L")];
const QUAD: &[Param] = &[required("L"), optional("K1")];
const BEND: &[Param] = &[required("L"), optional("Phi"), optional("K1")];
const SEXTUPOLE: &[Param] = &[required("L"), optional("K2")];
const OCTUPOLE: &[Param] = &[required("L"), optional("K3")];
const CAVITY: &[Param] = &[
    required("L"),
    optional("Voltage"),
    optional("HarNum"),
    optional("Phi"),
];

/// The standard registry. Parameter order is the runtime constructor's
/// positional order.
pub static STANDARD: &[Builtin] = &[
    element("Drift", "make_drift", DRIFT),
    element("Quad", "make_quad", QUAD),
    element("Bend", "make_sbend", BEND),
    element("Sextupole", "make_sext", SEXTUPOLE),
    element("Octupole", "make_oct", OCTUPOLE),
    element("Cavity", "make_cavity", CAVITY),
    element("Marker", "make_marker", &[]),
    Builtin {
        name: "println",
        return_ty: ValueType::Void,
        arity: Arity::Variadic,
        lowering: Lowering::Println,
    },
    Builtin {
        name: "Line",
        return_ty: ValueType::Line,
        arity: Arity::Variadic,
        lowering: Lowering::Line,
    },
];

/// Name-indexed view over a builtin table. Never mutated after construction.
#[derive(Debug)]
pub struct Builtins {
    map: HashMap<&'static str, &'static Builtin>,
}

impl Builtins {
    pub fn new(table: &'static [Builtin]) -> Builtins {
        let map = table.iter().map(|builtin| (builtin.name, builtin)).collect();
        Builtins { map }
    }

    pub fn standard() -> Builtins {
        Builtins::new(STANDARD)
    }

    pub fn get(&self, name: &str) -> Option<&'static Builtin> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Builtins::standard()
    }
}
