//! Faculty office directory
//!
//! Destinations are looked up by id. [`StaticDirectory`] holds a fixed
//! list, either the built-in campus offices or one loaded from JSON.

mod json;

use std::collections::HashSet;
use std::path::Path;

use campus_nav_core::Coordinate;

use crate::error::NavigationError;

/// A navigable office
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub department: String,
    pub building: String,
    pub room: String,
    pub floor: i32,
    pub coordinate: Coordinate,
}

impl Destination {
    /// Display label, e.g. "Dr. Jane Smith (Computer Science)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.department)
    }

    /// Office location, e.g. "Technology Hall, Room 301, Floor 3"
    pub fn office(&self) -> String {
        format!("{}, Room {}, Floor {}", self.building, self.room, self.floor)
    }
}

/// Destination lookup
pub trait Directory: Send + Sync {
    fn lookup(&self, id: &str) -> Option<Destination>;

    /// All destinations, in directory order
    fn list(&self) -> Vec<Destination>;
}

/// Fixed, in-memory directory
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    entries: Vec<Destination>,
}

impl StaticDirectory {
    /// Build a directory, rejecting duplicate ids and invalid coordinates
    pub fn new(entries: Vec<Destination>) -> Result<Self, NavigationError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(NavigationError::Directory(format!(
                    "duplicate destination id '{}'",
                    entry.id
                )));
            }
            entry.coordinate.validate().map_err(|e| {
                NavigationError::Directory(format!("destination '{}': {}", entry.id, e))
            })?;
        }
        Ok(Self { entries })
    }

    /// The built-in campus offices
    pub fn campus() -> Self {
        let office = |id: &str,
                      name: &str,
                      department: &str,
                      building: &str,
                      room: &str,
                      floor: i32,
                      coordinate: Coordinate| Destination {
            id: id.to_string(),
            name: name.to_string(),
            department: department.to_string(),
            building: building.to_string(),
            room: room.to_string(),
            floor,
            coordinate,
        };
        Self {
            entries: vec![
                office(
                    "prof-101",
                    "Dr. Jane Smith",
                    "Computer Science",
                    "Technology Hall",
                    "301",
                    3,
                    Coordinate::new(37.9315, 41.9378),
                ),
                office(
                    "prof-102",
                    "Dr. Robert Johnson",
                    "Mathematics",
                    "Science Building",
                    "205",
                    2,
                    Coordinate::new(37.9320, 41.9380),
                ),
                office(
                    "prof-103",
                    "Dr. Maria Garcia",
                    "Biology",
                    "Life Sciences",
                    "412",
                    4,
                    Coordinate::new(37.9318, 41.9375),
                ),
            ],
        }
    }

    /// Parse a `{"faculty": [...]}` document
    pub fn from_json_str(json: &str) -> Result<Self, NavigationError> {
        Self::new(json::parse(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NavigationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Directory for StaticDirectory {
    fn lookup(&self, id: &str) -> Option<Destination> {
        self.entries.iter().find(|entry| entry.id == id).cloned()
    }

    fn list(&self) -> Vec<Destination> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campus_lookup() {
        let directory = StaticDirectory::campus();
        assert_eq!(directory.len(), 3);

        let jane = directory.lookup("prof-101").unwrap();
        assert_eq!(jane.label(), "Dr. Jane Smith (Computer Science)");
        assert_eq!(jane.office(), "Technology Hall, Room 301, Floor 3");
        assert_eq!(jane.coordinate, Coordinate::new(37.9315, 41.9378));

        assert!(directory.lookup("prof-999").is_none());
        assert!(directory.lookup("").is_none());
    }

    #[test]
    fn test_list_preserves_order() {
        let ids: Vec<String> = StaticDirectory::campus()
            .list()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["prof-101", "prof-102", "prof-103"]);
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut entries = StaticDirectory::campus().list();
        entries.push(entries[0].clone());
        assert!(matches!(
            StaticDirectory::new(entries),
            Err(NavigationError::Directory(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_coordinate() {
        let mut entries = StaticDirectory::campus().list();
        entries[1].coordinate = Coordinate::new(f64::NAN, 41.9380);
        assert!(matches!(
            StaticDirectory::new(entries),
            Err(NavigationError::Directory(_))
        ));
    }
}
