//! Build products directory lookup.
//!
//! Single-architecture SwiftPM builds place products in
//! `.build/<triple>/<configuration>`, where the triple comes from
//! `swift -print-target-info`. Universal builds are merged by xcbuild into the
//! architecture-independent `.build/apple/Products/<Configuration>`.

use crate::bundler::{
    error::LocatorError,
    process::{ToolInvocation, ToolInvoker},
    settings::BuildConfiguration,
};
use std::path::{Path, PathBuf};

/// Directory under `.build` that holds universal build products.
pub const UNIVERSAL_VENDOR_DIRECTORY: &str = "apple";

/// Key path of the triple inside the target-info document.
const TRIPLE_KEY_PATH: &str = "target.unversionedTriple";

/// Resolves the directory containing compiled products.
///
/// # Arguments
/// * `tools` - Invoker used for `swift -print-target-info`
/// * `package_root` - Root of the built package
/// * `configuration` - Build configuration
/// * `universal` - Whether products were built for several architectures
pub async fn locate_products_directory<T: ToolInvoker>(
    tools: &T,
    package_root: &Path,
    configuration: BuildConfiguration,
    universal: bool,
) -> Result<PathBuf, LocatorError> {
    let build_dir = package_root.join(".build");

    if universal {
        let products = build_dir
            .join(UNIVERSAL_VENDOR_DIRECTORY)
            .join("Products")
            .join(configuration.capitalized());
        log::debug!("Universal products directory: {}", products.display());
        return Ok(products);
    }

    let triple = host_triple(tools).await?;
    let products = build_dir.join(&triple).join(configuration.as_str());
    log::debug!("Products directory for {}: {}", triple, products.display());
    Ok(products)
}

/// Queries the toolchain for the host's unversioned target triple.
pub async fn host_triple<T: ToolInvoker>(tools: &T) -> Result<String, LocatorError> {
    let invocation = ToolInvocation::new("swift").arg("-print-target-info");
    let output = tools
        .run_checked(&invocation)
        .await
        .map_err(LocatorError::TargetInfoQueryFailed)?;

    parse_target_info(&output.stdout)
}

/// Extracts `target.unversionedTriple` from `swift -print-target-info` output.
pub fn parse_target_info(stdout: &[u8]) -> Result<String, LocatorError> {
    let text = String::from_utf8(stdout.to_vec()).map_err(LocatorError::NonUtf8Output)?;
    let info: serde_json::Value =
        serde_json::from_str(&text).map_err(LocatorError::InvalidTargetInfo)?;

    info.get("target")
        .and_then(|target| target.get("unversionedTriple"))
        .and_then(|triple| triple.as_str())
        .map(str::to_string)
        .ok_or(LocatorError::MissingTargetInfoField(TRIPLE_KEY_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unversioned_triple() {
        let stdout = br#"{
            "compilerVersion": "Apple Swift version 5.9",
            "target": {
                "triple": "arm64-apple-macosx13.0",
                "unversionedTriple": "arm64-apple-macosx",
                "moduleTriple": "arm64-apple-macos"
            },
            "paths": { "runtimeLibraryPaths": [] }
        }"#;

        assert_eq!(parse_target_info(stdout).unwrap(), "arm64-apple-macosx");
    }

    #[test]
    fn missing_key_is_reported() {
        let err = parse_target_info(br#"{"target": {"triple": "x"}}"#).unwrap_err();
        assert!(matches!(
            err,
            LocatorError::MissingTargetInfoField("target.unversionedTriple")
        ));
    }

    #[test]
    fn non_string_triple_is_missing() {
        let err = parse_target_info(br#"{"target": {"unversionedTriple": 3}}"#).unwrap_err();
        assert!(matches!(err, LocatorError::MissingTargetInfoField(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_target_info(b"warning: something\n").unwrap_err();
        assert!(matches!(err, LocatorError::InvalidTargetInfo(_)));
    }

    #[test]
    fn non_utf8_is_rejected() {
        let err = parse_target_info(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, LocatorError::NonUtf8Output(_)));
    }
}
