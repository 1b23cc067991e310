//! Test utilities for the resultblock crates.
//!
//! - [`fake_engine`]: an in-memory [`resultblock::NativeEngine`] that records
//!   every call crossing the native boundary and can inject failures.

pub mod fake_engine;

pub use fake_engine::{AccessorKind, FakeColumn, FakeEngine, FakeEngineError};
