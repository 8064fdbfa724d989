//! `Info.plist` generation for apps and resource bundles.

use crate::bundler::{error::ManifestError, settings::AppSettings};
use plist::{Dictionary, Value};
use std::path::Path;

/// File name of bundle manifests.
pub const MANIFEST_FILE_NAME: &str = "Info.plist";

/// Writes bundle manifests.
///
/// The pipeline only decides where a manifest goes and what it is given;
/// implementations own the content.
pub trait ManifestGenerator: Send + Sync {
    /// Writes the manifest of the `.app` itself.
    fn create_app_manifest(
        &self,
        path: &Path,
        app_name: &str,
        app: &AppSettings,
    ) -> Result<(), ManifestError>;

    /// Writes the manifest of a normalised resource bundle.
    ///
    /// `bundle_name` is the bundle's file stem and doubles as its identifier.
    fn create_resource_bundle_manifest(
        &self,
        path: &Path,
        bundle_name: &str,
        minimum_macos_version: &str,
    ) -> Result<(), ManifestError>;
}

/// [`ManifestGenerator`] producing XML property lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlistManifestGenerator;

impl PlistManifestGenerator {
    fn write(path: &Path, entries: Vec<(&str, Value)>) -> Result<(), ManifestError> {
        let mut dict = Dictionary::new();
        for (key, value) in entries {
            dict.insert(key.to_string(), value);
        }

        log::debug!("Writing {}", path.display());
        Value::Dictionary(dict)
            .to_file_xml(path)
            .map_err(|source| ManifestError::Plist {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl ManifestGenerator for PlistManifestGenerator {
    fn create_app_manifest(
        &self,
        path: &Path,
        app_name: &str,
        app: &AppSettings,
    ) -> Result<(), ManifestError> {
        let mut entries = vec![
            ("CFBundleDevelopmentRegion", Value::from("en")),
            ("CFBundleExecutable", Value::from(app_name)),
            ("CFBundleIdentifier", Value::from(app.identifier.as_str())),
            ("CFBundleInfoDictionaryVersion", Value::from("6.0")),
            ("CFBundleName", Value::from(app_name)),
            ("CFBundlePackageType", Value::from("APPL")),
            ("CFBundleShortVersionString", Value::from(app.version.as_str())),
            ("CFBundleVersion", Value::from(app.version.as_str())),
            ("LSMinimumSystemVersion", Value::from(app.minimum_macos_version())),
            ("NSHighResolutionCapable", Value::from(true)),
        ];
        if let Some(category) = &app.category {
            entries.push(("LSApplicationCategoryType", Value::from(category.as_str())));
        }

        Self::write(path, entries)
    }

    fn create_resource_bundle_manifest(
        &self,
        path: &Path,
        bundle_name: &str,
        minimum_macos_version: &str,
    ) -> Result<(), ManifestError> {
        Self::write(
            path,
            vec![
                ("CFBundleDevelopmentRegion", Value::from("en")),
                ("CFBundleIdentifier", Value::from(bundle_name)),
                ("CFBundleInfoDictionaryVersion", Value::from("6.0")),
                ("CFBundleName", Value::from(bundle_name)),
                ("LSMinimumSystemVersion", Value::from(minimum_macos_version)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_bundle_manifest_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(MANIFEST_FILE_NAME);

        PlistManifestGenerator
            .create_resource_bundle_manifest(&path, "App_Shaders", "12.0")
            .unwrap();

        let value = Value::from_file(&path).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(
            dict.get("CFBundleIdentifier").and_then(Value::as_string),
            Some("App_Shaders")
        );
        assert_eq!(
            dict.get("LSMinimumSystemVersion").and_then(Value::as_string),
            Some("12.0")
        );
    }

    #[test]
    fn app_manifest_includes_optional_category() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(MANIFEST_FILE_NAME);
        let app = AppSettings {
            product: "Hello".into(),
            version: "2.1.0".into(),
            identifier: "com.example.Hello".into(),
            minimum_macos_version: None,
            category: Some("public.app-category.utilities".into()),
        };

        PlistManifestGenerator
            .create_app_manifest(&path, "Hello", &app)
            .unwrap();

        let value = Value::from_file(&path).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(
            dict.get("CFBundleExecutable").and_then(Value::as_string),
            Some("Hello")
        );
        assert_eq!(
            dict.get("LSApplicationCategoryType").and_then(Value::as_string),
            Some("public.app-category.utilities")
        );
        assert_eq!(
            dict.get("LSMinimumSystemVersion").and_then(Value::as_string),
            Some("11.0")
        );
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing/dir/Info.plist");

        let err = PlistManifestGenerator
            .create_resource_bundle_manifest(&path, "X", "11.0")
            .unwrap_err();
        assert!(matches!(err, ManifestError::Plist { .. }));
    }
}
