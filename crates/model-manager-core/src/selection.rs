//! User selection of model paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scanner::ModelFile;

/// Set of selected model paths
///
/// Serializes as a plain list of paths so a UI host can encode it however
/// it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    paths: BTreeSet<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        self.paths.remove(path)
    }

    /// Select or deselect `path`
    pub fn set(&mut self, path: &Path, selected: bool) {
        if selected {
            self.paths.insert(path.to_path_buf());
        } else {
            self.paths.remove(path);
        }
    }

    pub fn toggle(&mut self, path: &Path) {
        let selected = self.contains(path);
        self.set(path, !selected);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// First selected path in path order
    pub fn first(&self) -> Option<&PathBuf> {
        self.paths.iter().next()
    }

    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.paths.iter().cloned().collect()
    }

    /// Drop every path that is not part of `visible`
    pub fn retain_visible(&mut self, visible: &[&ModelFile]) {
        self.paths.retain(|p| visible.iter().any(|m| m.path == *p));
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for Selection {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::model;

    #[test]
    fn test_toggle_and_set() {
        let mut sel = Selection::new();
        let path = Path::new("/ckpts/a.pt");
        sel.toggle(path);
        assert!(sel.contains(path));
        sel.toggle(path);
        assert!(!sel.contains(path));
        sel.set(path, true);
        sel.set(path, true);
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_retain_visible_drops_hidden_paths() {
        let a = model("a.pt", 1, 0, "Model");
        let b = model("b.pt", 1, 0, "Model");
        let mut sel: Selection = [a.path.clone(), b.path.clone(), PathBuf::from("/gone.pt")]
            .into_iter()
            .collect();

        sel.retain_visible(&[&a]);
        assert_eq!(sel.to_vec(), vec![a.path.clone()]);
    }

    #[test]
    fn test_first_follows_path_order() {
        let mut sel = Selection::new();
        sel.insert(Path::new("/ckpts/z.pt"));
        sel.insert(Path::new("/ckpts/a.pt"));
        assert_eq!(sel.first(), Some(&PathBuf::from("/ckpts/a.pt")));
    }

    #[test]
    fn test_serializes_as_path_list() {
        let sel: Selection = ["/ckpts/b.pt", "/ckpts/a.pt"].into_iter().collect();
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, r#"["/ckpts/a.pt","/ckpts/b.pt"]"#);

        let back: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sel);
    }
}
