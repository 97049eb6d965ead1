//! Embedded mini-expression evaluator and per-pixel effect interpreter.
//!
//! A client registers an "effect equation" — a tiny text DSL of constant
//! definitions, user functions, and per-channel output assignments — which
//! is parsed once into a [`program::Program`] and then replayed once per
//! pixel against a software buffer by [`program::run_pixel_effect`].

pub mod ast;
pub mod eval;
pub mod parser;
pub mod program;

pub use eval::{Env, PixelAccess, Value};
pub use program::{run_pixel_effect, Function, Program};
