//! Course file parsing.
//!
//! A course file is a JSON object whose `result` array holds one entry per
//! section:
//!
//! ```json
//! { "result": [ { "Subject": "cpsc", "Course": "310", "Avg": 78.2,
//!                 "Professor": "smith, jane", "Title": "sft eng",
//!                 "Pass": 100, "Fail": 3, "Audit": 0, "id": 1234,
//!                 "Year": "2015", "Section": "101" } ] }
//! ```
//!
//! Sections missing any required attribute are skipped. The `overall`
//! section aggregates all sections of a course and is dated 1900.

use insight_core::{Field, Record, Value};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::error::Result;

/// Year assigned to `"Section": "overall"` entries.
pub const OVERALL_SECTION_YEAR: f64 = 1900.0;

#[derive(Deserialize)]
struct CourseFile {
    result: Vec<Json>,
}

/// Parses one course file into course records.
///
/// Fails only if the text is not a JSON object with a `result` array;
/// malformed sections inside it are skipped.
pub fn parse_course_file(text: &str) -> Result<Vec<Record>> {
    let file: CourseFile = serde_json::from_str(text)?;
    let total = file.result.len();
    let records: Vec<Record> = file.result.iter().filter_map(parse_section).collect();
    if records.len() < total {
        log::debug!("skipped {} of {} course sections", total - records.len(), total);
    }
    Ok(records)
}

/// Parses several course files, concatenating their records in order.
pub fn parse_course_files<I, S>(files: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    for file in files {
        records.extend(parse_course_file(file.as_ref())?);
    }
    Ok(records)
}

fn parse_section(section: &Json) -> Option<Record> {
    let section_obj = section.as_object()?;
    let get = |name: &str| section_obj.get(name);

    let year = if get("Section").and_then(Json::as_str) == Some("overall") {
        get("Year")?;
        OVERALL_SECTION_YEAR
    } else {
        number(get("Year")?)?
    };

    Some(
        Record::new()
            .with(Field::Dept, text(get("Subject")?)?)
            .with(Field::Id, text(get("Course")?)?)
            .with(Field::Avg, number(get("Avg")?)?)
            .with(Field::Instructor, text(get("Professor")?)?)
            .with(Field::Title, text(get("Title")?)?)
            .with(Field::Pass, number(get("Pass")?)?)
            .with(Field::Fail, number(get("Fail")?)?)
            .with(Field::Audit, number(get("Audit")?)?)
            .with(Field::Uuid, text(get("id")?)?)
            .with(Field::Year, Value::Number(year)),
    )
}

/// Reads a string attribute; numbers are accepted and rendered as text.
fn text(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a numeric attribute; numeric strings are accepted.
fn number(value: &Json) -> Option<f64> {
    match value {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
