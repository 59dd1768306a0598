use campus_nav_core::Coordinate;
use serde::Deserialize;

use super::Destination;
use crate::error::NavigationError;

#[derive(Debug, Deserialize)]
struct DirectoryJson {
    faculty: Vec<FacultyJson>,
}

#[derive(Debug, Deserialize)]
struct FacultyJson {
    id: String,
    name: String,
    #[serde(default)]
    department: String,
    office: OfficeJson,
}

#[derive(Debug, Deserialize)]
struct OfficeJson {
    building: String,
    room: String,
    floor: i32,
    /// `[latitude, longitude]`
    coordinates: [f64; 2],
}

impl From<FacultyJson> for Destination {
    fn from(faculty: FacultyJson) -> Self {
        let [latitude, longitude] = faculty.office.coordinates;
        Destination {
            id: faculty.id,
            name: faculty.name,
            department: faculty.department,
            building: faculty.office.building,
            room: faculty.office.room,
            floor: faculty.office.floor,
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

pub(super) fn parse(json: &str) -> Result<Vec<Destination>, NavigationError> {
    let document: DirectoryJson = serde_json::from_str(json)
        .map_err(|e| NavigationError::Directory(format!("JSON parse error: {}", e)))?;
    Ok(document.faculty.into_iter().map(Destination::from).collect())
}
