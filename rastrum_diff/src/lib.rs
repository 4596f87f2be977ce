// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=rastrum_diff --heading-base-level=0

//! Rastrum Diff: the numeric layer of the rasterization path.
//!
//! - [`Scalar`] abstracts over plain `f64` and tracked [`Var`] values, so fields, signed
//!   distances, and transforms are written once and evaluated either way.
//! - [`Tape`] records operations on tracked values; [`Var::gradients`] runs reverse accumulation
//!   and returns [`Gradients`].
//! - [`Scalar::detach`] is the explicit stop-gradient: it returns a plain `f64` that carries no
//!   link back to the tape. Derasterization samples through it and nothing else.
//!
//! The tape is single-threaded (`RefCell`) and append-only. Create one per differentiation.
//!
//! # Example
//!
//! ```rust
//! use rastrum_diff::{Scalar, Tape};
//!
//! // A field written against the trait ...
//! fn stripe<S: Scalar>(x: S, y: S, offset: S) -> S {
//!     ((x + y) * 5.0).sin() * 0.5 + offset * 0.5
//! }
//!
//! // ... evaluated with plain numbers,
//! let plain = stripe(0.1, 0.2, 1.0);
//!
//! // and with a tracked parameter.
//! let tape = Tape::new();
//! let offset = tape.var(1.0);
//! let tracked = stripe(Scalar::constant(0.1), Scalar::constant(0.2), offset);
//! assert_eq!(tracked.value(), plain);
//! assert_eq!(tracked.gradients().wrt(offset), 0.5);
//! ```

mod scalar;
mod tape;

pub use scalar::{Scalar, detach_all, lift};
pub use tape::{Gradients, Tape, Var};
