//! Conversion of raw dataset files into records.
//!
//! Only the course file format is supported; unpacking archives and the
//! rooms format are left to callers.

pub mod courses;

pub use courses::{parse_course_file, parse_course_files};
