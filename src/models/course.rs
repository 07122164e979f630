//! Domain model for an enrolled course.

use serde::Serialize;

/// One enrolled course from the portal listing.
///
/// `instructors` holds the space-joined instructor names exactly as the
/// portal renders them; the portal does not expose them individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub name: String,
    pub instructors: String,
}
