//! Read-only booking summary projection.
//!
//! The final wizard step and the confirmation panel both render the same
//! thing: the selected course followed by whatever the user actually
//! entered. Rows whose backing field is absent or empty are omitted
//! entirely rather than shown blank; an optional "Notes" or "PO number" row
//! only exists if the user supplied one.

use std::collections::HashMap;

use crate::catalog::Course;

use super::StepSpec;

/// One label/value pair in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Display label.
    pub label: String,
    /// Display value, never empty.
    pub value: String,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Project a course and the accumulated fields into summary rows.
///
/// Course rows come first, then field rows in step/field declaration order.
/// Empty or missing field values produce no row.
pub fn project(
    course: &Course,
    steps: &[StepSpec],
    fields: &HashMap<String, String>,
) -> Vec<SummaryRow> {
    let mut rows = vec![
        SummaryRow::new("Course", &course.title),
        SummaryRow::new("Instructor", &course.instructor),
        SummaryRow::new("Date", course.schedule_text()),
        SummaryRow::new("Duration", course.duration_text()),
        SummaryRow::new("Price", course.price_text()),
    ];

    for step in steps {
        for field in &step.fields {
            if let Some(value) = fields.get(&field.name) {
                let value = value.trim();
                if !value.is_empty() {
                    rows.push(SummaryRow::new(&field.label, value));
                }
            }
        }
    }

    rows
}
