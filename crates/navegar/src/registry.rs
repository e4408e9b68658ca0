//! Externalized selector configuration.
//!
//! Page objects never hard-code selectors inline. They name elements
//! semantically and look the selector strings up here, from a hierarchical
//! YAML document keyed application -> page -> element. The document is
//! loaded once and treated as immutable; a missing path is a warning for
//! probing callers and a fail-fast error for page construction.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::result::{NavegarError, NavegarResult};

/// One node of the selector document tree.
///
/// Leaves are selector strings; everything else is a named group. The
/// untagged representation matches the YAML shape directly, so the
/// document needs no schema beyond "strings or nested maps".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectorNode {
    /// A single selector string
    Leaf(String),
    /// A named group of nodes
    Group(BTreeMap<String, SelectorNode>),
}

impl SelectorNode {
    /// The leaf value, if this node is a leaf
    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(s) => Some(s),
            Self::Group(_) => None,
        }
    }

    /// The child map, if this node is a group
    #[must_use]
    pub fn as_group(&self) -> Option<&BTreeMap<String, SelectorNode>> {
        match self {
            Self::Leaf(_) => None,
            Self::Group(children) => Some(children),
        }
    }
}

/// The selector mapping for one page, produced by a group lookup.
///
/// Carries its own dotted path so that missing-leaf errors can name the
/// full offending location.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorGroup {
    path: String,
    entries: BTreeMap<String, SelectorNode>,
}

impl SelectorGroup {
    /// The dotted path this group was resolved from
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up a leaf selector by element name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(SelectorNode::as_leaf)
    }

    /// Look up a leaf selector, failing with the full dotted path when the
    /// element is absent. Page constructors use this so a configuration gap
    /// surfaces as an immediate, attributable error.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` naming `<group path>.<name>`.
    pub fn require(&self, name: &str) -> NavegarResult<String> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| NavegarError::MissingSelectorGroup {
                path: format!("{}.{}", self.path, name),
            })
    }

    /// Element names present in this group
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of entries in this group
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// In-memory selector document with dotted-path resolution.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    root: SelectorNode,
    source: String,
}

impl SelectorRegistry {
    /// Load the registry from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoad` if the file is unreadable or malformed. The
    /// failure is fatal: there is no partial load.
    pub fn load(path: impl AsRef<Path>) -> NavegarResult<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| NavegarError::ConfigLoad {
            path: source.clone(),
            message: e.to_string(),
        })?;
        let registry = Self::from_yaml(&content, &source)?;
        debug!(source = %registry.source, "selector registry loaded");
        Ok(registry)
    }

    /// Parse a registry from YAML text. `source` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoad` on malformed YAML.
    pub fn from_yaml(content: &str, source: &str) -> NavegarResult<Self> {
        let root: SelectorNode =
            serde_yaml_ng::from_str(content).map_err(|e| NavegarError::ConfigLoad {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            root,
            source: source.to_string(),
        })
    }

    /// Re-read the registry from its original file. The registry never
    /// refreshes itself; callers opt in explicitly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoad` on any read or parse failure; the previous
    /// contents are left untouched in that case.
    pub fn reload(&mut self) -> NavegarResult<()> {
        let fresh = Self::load(&self.source)?;
        self.root = fresh.root;
        Ok(())
    }

    /// Where this registry was loaded from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolve a dotted path to a single selector string.
    ///
    /// Returns `None` (with one logged warning) when any segment is missing
    /// or the path lands on a group instead of a leaf. Callers decide
    /// whether that is fatal.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let node = self.walk(path)?;
        let leaf = node.as_leaf();
        if leaf.is_none() {
            warn!(path, "selector path resolves to a group, not a leaf");
        }
        leaf
    }

    /// Resolve a dotted path to the selector group at that path.
    ///
    /// Returns `None` (with one logged warning) when any segment is missing
    /// or the path lands on a leaf.
    #[must_use]
    pub fn resolve_group(&self, path: &str) -> Option<SelectorGroup> {
        let node = self.walk(path)?;
        match node.as_group() {
            Some(children) => Some(SelectorGroup {
                path: path.to_string(),
                entries: children.clone(),
            }),
            None => {
                warn!(path, "selector path resolves to a leaf, not a group");
                None
            }
        }
    }

    /// Like [`resolve_group`](Self::resolve_group) but failing with
    /// `MissingSelectorGroup` when the path does not resolve. Page
    /// constructors call this so a missing group aborts construction
    /// immediately rather than surfacing as a confusing failure deep
    /// inside a test step.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` carrying the offending path.
    pub fn require_group(&self, path: &str) -> NavegarResult<SelectorGroup> {
        self.resolve_group(path)
            .ok_or_else(|| NavegarError::MissingSelectorGroup {
                path: path.to_string(),
            })
    }

    /// Walk the tree segment by segment. A missing segment at any depth
    /// short-circuits to `None` and logs exactly one warning.
    fn walk(&self, path: &str) -> Option<&SelectorNode> {
        let mut current = &self.root;
        for segment in path.split('.') {
            match current.as_group().and_then(|g| g.get(segment)) {
                Some(child) => current = child,
                None => {
                    warn!(path, segment, "selector path not found in registry");
                    return None;
                }
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn registry(yaml: &str) -> SelectorRegistry {
        SelectorRegistry::from_yaml(yaml, "test.yaml").unwrap()
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_resolve_leaf() {
            let reg = registry("app:\n  home:\n    loginBtn: '#login'\n");
            assert_eq!(reg.resolve("app.home.loginBtn"), Some("#login"));
        }

        #[test]
        fn test_resolve_group() {
            let reg = registry("app:\n  home:\n    loginBtn: '#login'\n");
            let group = reg.resolve_group("app.home").unwrap();
            assert_eq!(group.get("loginBtn"), Some("#login"));
            assert_eq!(group.path(), "app.home");
            assert_eq!(group.len(), 1);
        }

        #[test]
        fn test_missing_path_returns_none() {
            let reg = registry("app:\n  home:\n    loginBtn: '#login'\n");
            assert!(reg.resolve_group("app.missing").is_none());
            assert!(reg.resolve("app.home.missing").is_none());
            assert!(reg.resolve("other.home.loginBtn").is_none());
        }

        #[test]
        fn test_group_at_leaf_position() {
            let reg = registry("app:\n  home:\n    loginBtn: '#login'\n");
            // A leaf is not a group and vice versa
            assert!(reg.resolve("app.home").is_none());
            assert!(reg.resolve_group("app.home.loginBtn").is_none());
        }

        #[test]
        fn test_deeply_nested_resolution() {
            let reg = registry(
                "bilibili:\n  loginPage:\n    tabs:\n      qrCode: '.login-type li:nth-child(1)'\n",
            );
            assert_eq!(
                reg.resolve("bilibili.loginPage.tabs.qrCode"),
                Some(".login-type li:nth-child(1)")
            );
            let tabs = reg.resolve_group("bilibili.loginPage.tabs").unwrap();
            assert_eq!(tabs.get("qrCode"), Some(".login-type li:nth-child(1)"));
        }
    }

    mod group_tests {
        use super::*;

        #[test]
        fn test_require_present_leaf() {
            let reg = registry("app:\n  login:\n    username: 'input[name=username]'\n");
            let group = reg.require_group("app.login").unwrap();
            assert_eq!(group.require("username").unwrap(), "input[name=username]");
        }

        #[test]
        fn test_require_missing_leaf_names_full_path() {
            let reg = registry("app:\n  login:\n    username: 'input[name=username]'\n");
            let group = reg.require_group("app.login").unwrap();
            let err = group.require("password").unwrap_err();
            assert!(matches!(
                err,
                NavegarError::MissingSelectorGroup { ref path } if path == "app.login.password"
            ));
        }

        #[test]
        fn test_require_group_missing() {
            let reg = registry("app: {}\n");
            let err = reg.require_group("app.login").unwrap_err();
            assert!(matches!(
                err,
                NavegarError::MissingSelectorGroup { ref path } if path == "app.login"
            ));
        }

        #[test]
        fn test_group_names() {
            let reg = registry("app:\n  login:\n    a: '#a'\n    b: '#b'\n");
            let group = reg.resolve_group("app.login").unwrap();
            assert_eq!(group.names(), vec!["a", "b"]);
            assert!(!group.is_empty());
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "app:\n  home:\n    loginBtn: '#login'").unwrap();
            let reg = SelectorRegistry::load(file.path()).unwrap();
            assert_eq!(reg.resolve("app.home.loginBtn"), Some("#login"));
        }

        #[test]
        fn test_load_missing_file_is_config_error() {
            let err = SelectorRegistry::load("/nonexistent/selectors.yaml").unwrap_err();
            assert!(matches!(err, NavegarError::ConfigLoad { .. }));
        }

        #[test]
        fn test_malformed_yaml_is_config_error() {
            let err = SelectorRegistry::from_yaml("app: [unclosed", "bad.yaml").unwrap_err();
            assert!(matches!(
                err,
                NavegarError::ConfigLoad { ref path, .. } if path == "bad.yaml"
            ));
        }

        #[test]
        fn test_reload_refreshes_contents() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "app:\n  home:\n    loginBtn: '#login'").unwrap();
            let mut reg = SelectorRegistry::load(file.path()).unwrap();
            assert_eq!(reg.resolve("app.home.loginBtn"), Some("#login"));

            file.as_file_mut().set_len(0).unwrap();
            let mut fresh = std::fs::File::create(file.path()).unwrap();
            writeln!(fresh, "app:\n  home:\n    loginBtn: '#signin'").unwrap();

            reg.reload().unwrap();
            assert_eq!(reg.resolve("app.home.loginBtn"), Some("#signin"));
        }
    }

    mod scenario_tests {
        use super::*;

        /// Registry `{"app":{"home":{"loginBtn":"#login"}}}`:
        /// `resolve_group("app.home")` yields the mapping,
        /// `resolve_group("app.missing")` yields `None`.
        #[test]
        fn test_documented_scenario() {
            let reg = registry("app:\n  home:\n    loginBtn: '#login'\n");
            let group = reg.resolve_group("app.home").unwrap();
            assert_eq!(group.get("loginBtn"), Some("#login"));
            assert!(reg.resolve_group("app.missing").is_none());
        }
    }
}
