//! Built-in business handlers used by the demo binary and tests.

pub mod echo;

pub use echo::EchoService;
