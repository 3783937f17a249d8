//! Top-level facade crate for svcPrism.
//!
//! Re-exports core types and the registry runtime so users can depend on a single crate.

pub mod core {
    pub use svcprism_core::*;
}

pub mod registry {
    pub use svcprism_registry::*;
}
