//! Dropdown option derivation from gateway rows.

use super::SelectOption;
use crate::gateway::{ClassRow, CourseRow, InstituteRow, MediumRow, SectionRow, TalukaRow};

impl From<TalukaRow> for SelectOption {
    fn from(row: TalukaRow) -> Self {
        SelectOption::new(row.taluka.clone(), row.taluka)
    }
}

impl From<InstituteRow> for SelectOption {
    fn from(row: InstituteRow) -> Self {
        SelectOption::new(row.institute_name, row.ccode)
    }
}

impl From<SectionRow> for SelectOption {
    fn from(row: SectionRow) -> Self {
        SelectOption::new(row.section_name, row.section_id)
    }
}

impl From<CourseRow> for SelectOption {
    fn from(row: CourseRow) -> Self {
        SelectOption::new(row.course_name, row.course_id)
    }
}

impl From<ClassRow> for SelectOption {
    fn from(row: ClassRow) -> Self {
        SelectOption::new(row.class_name, row.class_id)
    }
}

impl From<MediumRow> for SelectOption {
    fn from(row: MediumRow) -> Self {
        SelectOption::new(row.medium, row.medium_id)
    }
}

/// Convert rows to options, dropping rows without a usable key and
/// collapsing duplicate keys onto their first occurrence.
pub(crate) fn to_options<R: Into<SelectOption>>(rows: Vec<R>) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = Vec::with_capacity(rows.len());
    for option in rows.into_iter().map(Into::into) {
        if option.value.trim().is_empty() || options.iter().any(|o| o.value == option.value) {
            continue;
        }
        options.push(option);
    }
    options
}
