//! Tracing/logging setup shared by shopforge binaries and tests.

pub mod subscriber;

/// Initialize process-wide tracing with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init("info");
}
