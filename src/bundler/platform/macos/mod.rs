//! macOS `.app` packaging.
//!
//! The stages here only manipulate paths and shell out to Apple tooling, so
//! they compile on every host; the tools themselves only exist on macOS.
//!
//! - `products` - build products directory lookup
//! - `app` - `.app` skeleton with executable, `Info.plist` and `PkgInfo`
//! - `dylib` - dynamic library relocation and install name rewriting
//! - `resources` - resource bundle normalisation
//! - `info_plist` - `Info.plist` generation
//! - `metal` - Metal shader compilation

pub mod app;
pub mod dylib;
pub mod info_plist;
pub mod metal;
pub mod products;
pub mod resources;
