//! Relative path arithmetic for load-path tokens.
//!
//! Everything here is lexical: no symlinks are resolved and the filesystem is
//! never touched, so results depend only on the path strings given.

use std::path::{Component, Path, PathBuf};

/// Computes the path that leads from directory `base` to `target`.
///
/// Returns `None` when no such relative path exists: one path is absolute and
/// the other is not, the roots or drive prefixes differ, or the part of
/// `base` below the common ancestor still contains `..` (its name is unknown,
/// so it cannot be climbed back out of).
///
/// Joining `base` with the result and normalising yields `target`. Equal
/// paths produce `.`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use bundle_relocator::bundler::utils::path::relative_path;
///
/// let rel = relative_path(
///     Path::new("/App.app/Contents/MacOS"),
///     Path::new("/App.app/Contents/Libraries"),
/// );
/// assert_eq!(rel, Some(PathBuf::from("../Libraries")));
/// ```
pub fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base = normalize(base);
    let target = normalize(target);

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if anchor(&base) != anchor(&target) {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in &base[common..] {
        match component {
            Component::Normal(_) => relative.push(".."),
            _ => return None,
        }
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Leading root and drive prefix components.
fn anchor<'a>(components: &[Component<'a>]) -> Vec<Component<'a>> {
    components
        .iter()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .copied()
        .collect()
}

/// Lexically normalises a path: drops `.` and folds `name/..` pairs.
///
/// Leading `..` in a relative path are kept; `..` directly under a root is
/// dropped, matching how the OS resolves `/..`.
pub fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components
}

/// Renders a relative path with `/` separators for use in load-path tokens.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collect(path: &Path) -> PathBuf {
        normalize(path).iter().map(|c| c.as_os_str()).collect()
    }

    #[test]
    fn sibling_directory() {
        assert_eq!(
            relative_path(Path::new("/a/b/MacOS"), Path::new("/a/b/Libraries")),
            Some(PathBuf::from("../Libraries"))
        );
    }

    #[test]
    fn descendant() {
        assert_eq!(
            relative_path(Path::new("/products"), Path::new("/products/Bar.framework/Versions/A/Bar")),
            Some(PathBuf::from("Bar.framework/Versions/A/Bar"))
        );
    }

    #[test]
    fn identical_paths_are_dot() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/")),
            Some(PathBuf::from("."))
        );
    }

    #[test]
    fn ignores_cur_dir_and_folds_parent() {
        assert_eq!(
            relative_path(Path::new("/a/./b/../c"), Path::new("/a/d")),
            Some(PathBuf::from("../d"))
        );
    }

    #[test]
    fn mixed_absolute_and_relative_fail() {
        assert_eq!(relative_path(Path::new("/a"), Path::new("b")), None);
        assert_eq!(relative_path(Path::new("a"), Path::new("/b")), None);
    }

    #[test]
    fn unknown_parent_in_base_fails() {
        assert_eq!(relative_path(Path::new("../x"), Path::new("y")), None);
    }

    #[test]
    fn relative_paths_share_implicit_root() {
        assert_eq!(
            relative_path(Path::new("out/bin"), Path::new("out/lib")),
            Some(PathBuf::from("../lib"))
        );
    }

    #[cfg(windows)]
    #[test]
    fn different_drives_fail() {
        assert_eq!(relative_path(Path::new(r"C:\a"), Path::new(r"D:\a")), None);
    }

    #[test]
    fn forward_slash_token() {
        let path: PathBuf = ["..", "Libraries", "libFoo.dylib"].iter().collect();
        assert_eq!(to_forward_slashes(&path), "../Libraries/libFoo.dylib");
    }

    fn segments() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[A-Za-z0-9_-]{1,8}", 0..5)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            .. ProptestConfig::default()
        })]

        /// Joining the base with the computed relative path lands on the target.
        #[test]
        fn join_is_left_inverse(
            shared in segments(),
            base_tail in segments(),
            target_tail in segments(),
        ) {
            let mut base = PathBuf::from("/");
            let mut target = PathBuf::from("/");
            for s in &shared {
                base.push(s);
                target.push(s);
            }
            for s in &base_tail {
                base.push(s);
            }
            for s in &target_tail {
                target.push(s);
            }

            let relative = relative_path(&base, &target);
            prop_assert!(relative.is_some());
            let joined = base.join(relative.unwrap_or_default());
            prop_assert_eq!(collect(&joined), collect(&target));
        }
    }
}
