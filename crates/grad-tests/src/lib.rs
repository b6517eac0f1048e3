//! # grad-tests
//!
//! Parity and property testing for oxgrad.
//!
//! This crate provides:
//! - Seeded random gradient generation
//! - A harness that shades the same inputs through the stage pipeline and
//!   the vectorized program and measures how far they drift apart
//! - Parameter sweeps that hit stop positions, hard-stop boundaries and
//!   out-of-range values
//!
//! ## Test Categories
//!
//! 1. **Backend parity**: stage pipeline vs program, every tile mode
//! 2. **Normalization**: stop invariants, idempotence, hard-stop collapsing
//! 3. **Examples**: hand-checked colors
//! 4. **Serialization**: flatten/unflatten, serde data types
//! 5. **Concurrency**: shared specs and the table cache under rayon

pub mod parity;
pub mod patterns;

pub use parity::{Backends, ParityResult, ParityTest};
pub use patterns::{random_gradient, sweep_parameters, RandomGradient};

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging once per process
///
/// Honors `RUST_LOG`; defaults to warnings so failed emissions show up.
pub fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }
        // Another harness may have installed a logger already.
        let _ = builder.is_test(true).try_init();
        log::debug!("test logging initialized");
    });
}
