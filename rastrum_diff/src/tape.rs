// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reverse-mode tape: recording, tracked scalars, and reverse accumulation.

use core::cell::RefCell;
use core::iter::Sum;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::Scalar;

/// One recorded operation: up to two parents with their local partial derivatives.
#[derive(Clone, Copy, Debug)]
struct Node {
    parents: [(usize, f64); 2],
    arity: u8,
}

impl Node {
    const LEAF: Self = Self {
        parents: [(0, 0.0); 2],
        arity: 0,
    };
}

/// Append-only record of the operations performed on tracked [`Var`]s.
///
/// A tape lives for one differentiation: create independent variables with [`Tape::var`],
/// evaluate, then call [`Var::gradients`] on the output. Operations whose operands are all
/// constants are not recorded.
#[derive(Default)]
pub struct Tape {
    nodes: RefCell<Vec<Node>>,
}

impl core::fmt::Debug for Tape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tape")
            .field("nodes", &self.len())
            .finish_non_exhaustive()
    }
}

impl Tape {
    /// Create an empty tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an independent variable with the given value.
    pub fn var(&self, value: f64) -> Var<'_> {
        Var {
            value,
            slot: Some(Slot::record(self, Node::LEAF)),
        }
    }

    /// Number of recorded nodes (independent variables included).
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, node: Node) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }
}

#[derive(Clone, Copy)]
struct Slot<'t> {
    tape: &'t Tape,
    index: usize,
}

impl<'t> Slot<'t> {
    fn record(tape: &'t Tape, node: Node) -> Self {
        Self {
            tape,
            index: tape.push(node),
        }
    }
}

/// A scalar that is either a constant or a node on a [`Tape`].
///
/// `Var` is `Copy`; the tape is borrowed, so every tracked value is tied to the lifetime of the
/// tape that recorded it.
#[derive(Clone, Copy)]
pub struct Var<'t> {
    value: f64,
    slot: Option<Slot<'t>>,
}

impl core::fmt::Debug for Var<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Var")
            .field("value", &self.value)
            .field("index", &self.slot.map(|s| s.index))
            .finish_non_exhaustive()
    }
}

impl<'t> Var<'t> {
    /// The primal value.
    pub fn value(self) -> f64 {
        self.value
    }

    /// Whether this value depends on some tape variable.
    pub fn is_tracked(self) -> bool {
        self.slot.is_some()
    }

    /// Reverse accumulation from this output.
    ///
    /// Returns the adjoint of every node recorded before this one. A constant output yields
    /// all-zero gradients.
    pub fn gradients(self) -> Gradients {
        let Some(slot) = self.slot else {
            return Gradients::default();
        };
        let nodes = slot.tape.nodes.borrow();
        let mut adjoints = vec![0.0; slot.index + 1];
        adjoints[slot.index] = 1.0;
        for i in (0..=slot.index).rev() {
            let adjoint = adjoints[i];
            if adjoint == 0.0 {
                continue;
            }
            let node = nodes[i];
            for &(parent, partial) in &node.parents[..usize::from(node.arity)] {
                adjoints[parent] += partial * adjoint;
            }
        }
        Gradients { adjoints }
    }

    fn unary(self, value: f64, partial: f64) -> Self {
        let slot = self.slot.map(|s| {
            Slot::record(
                s.tape,
                Node {
                    parents: [(s.index, partial), (0, 0.0)],
                    arity: 1,
                },
            )
        });
        Self { value, slot }
    }

    fn binary(self, other: Self, value: f64, partial_self: f64, partial_other: f64) -> Self {
        let slot = match (self.slot, other.slot) {
            (None, None) => None,
            (Some(a), None) => Some(Slot::record(
                a.tape,
                Node {
                    parents: [(a.index, partial_self), (0, 0.0)],
                    arity: 1,
                },
            )),
            (None, Some(b)) => Some(Slot::record(
                b.tape,
                Node {
                    parents: [(b.index, partial_other), (0, 0.0)],
                    arity: 1,
                },
            )),
            (Some(a), Some(b)) => {
                debug_assert!(
                    core::ptr::eq(a.tape, b.tape),
                    "operands were recorded on different tapes"
                );
                Some(Slot::record(
                    a.tape,
                    Node {
                        parents: [(a.index, partial_self), (b.index, partial_other)],
                        arity: 2,
                    },
                ))
            }
        };
        Self { value, slot }
    }
}

/// Adjoints produced by [`Var::gradients`].
#[derive(Clone, Debug, Default)]
pub struct Gradients {
    adjoints: Vec<f64>,
}

impl Gradients {
    /// Derivative of the output with respect to `var`.
    ///
    /// Constants, and variables recorded after the output, report zero. `var` must come from the
    /// same tape as the output.
    pub fn wrt(&self, var: Var<'_>) -> f64 {
        var.slot
            .and_then(|s| self.adjoints.get(s.index).copied())
            .unwrap_or(0.0)
    }
}

impl Add for Var<'_> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.binary(rhs, self.value + rhs.value, 1.0, 1.0)
    }
}

impl Sub for Var<'_> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.binary(rhs, self.value - rhs.value, 1.0, -1.0)
    }
}

impl Mul for Var<'_> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.binary(rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl Div for Var<'_> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = 1.0 / rhs.value;
        self.binary(rhs, self.value * inv, inv, -self.value * inv * inv)
    }
}

impl Neg for Var<'_> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.unary(-self.value, -1.0)
    }
}

impl Add<f64> for Var<'_> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: f64) -> Self {
        self.unary(self.value + rhs, 1.0)
    }
}

impl Sub<f64> for Var<'_> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: f64) -> Self {
        self.unary(self.value - rhs, 1.0)
    }
}

impl Mul<f64> for Var<'_> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.unary(self.value * rhs, rhs)
    }
}

impl Div<f64> for Var<'_> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        self.unary(self.value / rhs, 1.0 / rhs)
    }
}

impl<'t> Add<Var<'t>> for f64 {
    type Output = Var<'t>;
    #[inline]
    fn add(self, rhs: Var<'t>) -> Var<'t> {
        rhs + self
    }
}

impl<'t> Sub<Var<'t>> for f64 {
    type Output = Var<'t>;
    #[inline]
    fn sub(self, rhs: Var<'t>) -> Var<'t> {
        rhs.unary(self - rhs.value, -1.0)
    }
}

impl<'t> Mul<Var<'t>> for f64 {
    type Output = Var<'t>;
    #[inline]
    fn mul(self, rhs: Var<'t>) -> Var<'t> {
        rhs * self
    }
}

impl Sum for Var<'_> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::constant(0.0), |acc, v| acc + v)
    }
}

impl Scalar for Var<'_> {
    #[inline]
    fn constant(value: f64) -> Self {
        Self { value, slot: None }
    }

    #[inline]
    fn value(self) -> f64 {
        self.value
    }

    #[inline]
    fn sin(self) -> Self {
        self.unary(self.value.sin(), self.value.cos())
    }

    #[inline]
    fn cos(self) -> Self {
        self.unary(self.value.cos(), -self.value.sin())
    }

    #[inline]
    fn exp(self) -> Self {
        let e = self.value.exp();
        self.unary(e, e)
    }

    #[inline]
    fn sqrt(self) -> Self {
        let r = self.value.max(0.0).sqrt();
        let partial = if r > 0.0 { 0.5 / r } else { 0.0 };
        self.unary(r, partial)
    }

    #[inline]
    fn abs(self) -> Self {
        if self.value >= 0.0 { self } else { -self }
    }
}
