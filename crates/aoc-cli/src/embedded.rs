//! Solver artifacts compiled into this binary by `build.rs`.

use aoc_native_loader::EmbeddedResources;

include!(concat!(env!("OUT_DIR"), "/embedded_libraries.rs"));

/// The embedded artifact table.
pub fn resources() -> EmbeddedResources {
    EmbeddedResources::new(EMBEDDED_LIBRARIES)
}
