/// Loading configuration structs and primitives from environment variables.
pub mod from_env;

/// Tracing subscriber setup.
pub mod tracing;
pub use self::tracing::init_tracing;
