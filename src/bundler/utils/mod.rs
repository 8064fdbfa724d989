//! Filesystem and path helpers shared by the packaging stages.

pub mod fs;
pub mod path;
