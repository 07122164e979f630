//! Enrolled-course listing from the portal home tab.
//!
//! The course list is an AJAX module the portal frameset loads after login;
//! refreshing it directly returns a small HTML fragment that is easy to
//! query. This is a plain consumer of an authenticated [`Session`]: no
//! retry, no pagination, no caching.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::auth::{AuthError, Session};
use crate::models::Course;

/// Tab-action endpoint serving portal module fragments.
const MODULE_PATH: &str = "/webapps/portal/execute/tabs/tabAction";

/// Form that refreshes the course-list module on the home tab.
const REFRESH_FORM: [(&str, &str); 4] = [
    ("action", "refreshAjaxModule"),
    ("modId", "_25_1"),
    ("tabId", "_2_1"),
    ("tab_tab_group_id", "_2_1"),
];

/// Fetch the enrolled-course listing through an authenticated session.
pub async fn fetch_courses(session: &Session) -> Result<Vec<Course>, AuthError> {
    let response = session.post_form(MODULE_PATH, &REFRESH_FORM).await?;
    let body = response.error_for_status()?.text().await?;

    let courses = extract_courses(&body);
    debug!(count = courses.len(), "Extracted course listing");
    Ok(courses)
}

/// Extract the courses from a course-module fragment.
///
/// Each listing item names the course in its first link and the instructors
/// in `span.name` elements under the course information block. Course names
/// are unique within one listing (a duplicate overwrites the earlier entry)
/// and order is not meaningful.
fn extract_courses(body: &str) -> Vec<Course> {
    let item = Selector::parse("ul.courseListing > li").expect("static selector");
    let link = Selector::parse("a").expect("static selector");
    let instructor = Selector::parse("div.courseInformation span.name").expect("static selector");

    let document = Html::parse_document(body);
    let mut by_name: HashMap<String, String> = HashMap::new();

    for li in document.select(&item) {
        let Some(name) = li.select(&link).next().map(text_of) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let instructors = li
            .select(&instructor)
            .map(text_of)
            .collect::<Vec<_>>()
            .join(" ");
        by_name.insert(name, instructors);
    }

    by_name
        .into_iter()
        .map(|(name, instructors)| Course { name, instructors })
        .collect()
}

/// Concatenated, trimmed text content of an element.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div class="portlet">
          <ul class="portletList-img courseListing coursefakeclass">
            <li>
              <a href="/webapps/blackboard/execute/launcher?course_id=_101_1">MAT-101 Calculus I</a>
              <div class="courseInformation">
                <span class="name">Ada</span>
                <span class="name">Lovelace</span>
              </div>
            </li>
            <li>
              <a href="/webapps/blackboard/execute/launcher?course_id=_201_1">PHY-201 Mechanics</a>
              <div class="courseInformation">
                <span class="name">Isaac Newton</span>
              </div>
            </li>
          </ul>
        </div>"#;

    fn find<'a>(courses: &'a [Course], name: &str) -> &'a Course {
        courses
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing course {name}"))
    }

    #[test]
    fn test_extract_courses_pairs_names_with_instructors() {
        let courses = extract_courses(LISTING);
        assert_eq!(courses.len(), 2);
        assert_eq!(find(&courses, "MAT-101 Calculus I").instructors, "Ada Lovelace");
        assert_eq!(find(&courses, "PHY-201 Mechanics").instructors, "Isaac Newton");
    }

    #[test]
    fn test_extract_courses_without_instructor_block() {
        let body = r#"<ul class="courseListing"><li><a>CHE-110 Lab</a></li></ul>"#;
        let courses = extract_courses(body);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].instructors, "");
    }

    #[test]
    fn test_extract_courses_duplicate_names_collapse() {
        let body = r#"<ul class="courseListing">
            <li><a>MAT-101</a><div class="courseInformation"><span class="name">First</span></div></li>
            <li><a>MAT-101</a><div class="courseInformation"><span class="name">Second</span></div></li>
        </ul>"#;
        let courses = extract_courses(body);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].instructors, "Second");
    }

    #[test]
    fn test_extract_courses_from_unrelated_markup_is_empty() {
        assert!(extract_courses("<html><body><p>No modules</p></body></html>").is_empty());
    }
}
