use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::path::Path;

/// Saved paths, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCatalog {
    paths: Vec<Path>,
}

impl PathCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a path with the same id is already saved.
    pub fn add(&mut self, path: Path) -> Result<()> {
        if self.get(path.id()).is_some() {
            return Err(Error::integrity(format!(
                "path {} is already in the catalog",
                path.id()
            )));
        }
        debug!(id = %path.id(), name = path.name(), "Adding path to catalog");
        self.paths.push(path);
        Ok(())
    }

    /// Remove a path, returning it if it was present.
    pub fn remove(&mut self, id: Uuid) -> Option<Path> {
        let index = self.paths.iter().position(|p| p.id() == id)?;
        debug!(%id, "Removing path from catalog");
        Some(self.paths.remove(index))
    }

    /// Look up a path by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Path> {
        self.paths.iter().find(|p| p.id() == id)
    }

    /// All paths, oldest first.
    #[must_use]
    pub fn list(&self) -> &[Path] {
        &self.paths
    }

    /// Number of saved paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no path has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Serialize every path as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.paths)?)
    }

    /// Build a catalog from a JSON array of paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or two paths share an id.
    pub fn from_json(json: &str) -> Result<Self> {
        let paths: Vec<Path> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for path in paths {
            catalog.add(path)?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Waypoint;
    use chrono::DateTime;

    fn path(id: u128, name: &str) -> Path {
        Path::new(
            Uuid::from_u128(id),
            name,
            vec![Waypoint::new(1.0, 0.0, 1.0)],
            DateTime::default(),
        )
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut catalog = PathCatalog::new();
        catalog.add(path(2, "b")).unwrap();
        catalog.add(path(1, "a")).unwrap();

        let names: Vec<_> = catalog.list().iter().map(Path::name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_add_duplicate_id() {
        let mut catalog = PathCatalog::new();
        catalog.add(path(1, "first")).unwrap();

        let err = catalog.add(path(1, "second")).unwrap_err();
        assert!(matches!(err, Error::Integrity { .. }));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.list()[0].name(), "first");
    }

    #[test]
    fn test_remove() {
        let mut catalog = PathCatalog::new();
        catalog.add(path(1, "a")).unwrap();
        catalog.add(path(2, "b")).unwrap();

        let removed = catalog.remove(Uuid::from_u128(1)).unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(Uuid::from_u128(1)).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut catalog = PathCatalog::new();
        catalog.add(path(1, "a")).unwrap();

        assert!(catalog.remove(Uuid::from_u128(9)).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut catalog = PathCatalog::new();
        catalog.add(path(1, "a")).unwrap();
        catalog.add(path(2, "b")).unwrap();

        let restored = PathCatalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(restored, catalog);
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = serde_json::to_string(&vec![path(1, "a"), path(1, "b")]).unwrap();
        let err = PathCatalog::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::Integrity { .. }));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = PathCatalog::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
