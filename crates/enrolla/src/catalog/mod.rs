//! The course catalog.
//!
//! A [`Catalog`] is a read-only collection of [`Course`] records plus the
//! taxonomy used to build filter controls. It is loaded once at startup,
//! either from an embedded JSON literal or from any reader serving the static
//! catalog document, and never mutated afterwards.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "taxonomy": {
//!     "categories": [ { "id": "design", "label": "Design" } ]
//!   },
//!   "courses": [
//!     {
//!       "id": "design-systems",
//!       "title": "Design Systems Fundamentals",
//!       "instructor": "Sarah Chen",
//!       "category": "design",
//!       "start_date": "2025-12-15",
//!       "duration_days": 2,
//!       "price_cents": 89900,
//!       "capacity": 20,
//!       "remaining": 12,
//!       "summary": "...",
//!       "curriculum": ["..."],
//!       "prerequisites": "...",
//!       "includes": ["..."]
//!     }
//!   ]
//! }
//! ```

mod filter;

pub use filter::{CatalogView, DateRange, PriceBand, SearchHit};

use std::io::Read;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A bookable course: the immutable subject a booking attempt is made for.
///
/// Courses are loaded from the catalog document and referenced, never
/// mutated, by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Instructor display name.
    pub instructor: String,
    /// Taxonomy category ID.
    pub category: String,
    /// First day of the course.
    pub start_date: NaiveDate,
    /// Length in days (at least 1).
    pub duration_days: u32,
    /// Price in cents, to avoid float money.
    pub price_cents: u64,
    /// Total seats.
    pub capacity: u32,
    /// Seats still available.
    pub remaining: u32,
    /// One-paragraph description.
    pub summary: String,
    /// Ordered learning-outcome strings.
    #[serde(default)]
    pub curriculum: Vec<String>,
    /// Free-text prerequisites.
    #[serde(default)]
    pub prerequisites: String,
    /// Ordered "what's included" strings.
    #[serde(default)]
    pub includes: Vec<String>,
}

impl Course {
    /// Whether no seats remain.
    pub fn is_sold_out(&self) -> bool {
        self.remaining == 0
    }

    /// Last day of the course.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + chrono::Duration::days(i64::from(self.duration_days.max(1)) - 1)
    }

    /// Availability line for course cards.
    ///
    /// Low availability (five seats or fewer) switches to urgency wording.
    pub fn availability_text(&self) -> String {
        if self.remaining <= 5 {
            format!("Only {} spots remaining", self.remaining)
        } else {
            format!("{} spots available", self.remaining)
        }
    }

    /// Price formatted for display, e.g. `$1,099`.
    pub fn price_text(&self) -> String {
        let dollars = self.price_cents / 100;
        let cents = self.price_cents % 100;
        let mut whole = format_thousands(dollars);
        if cents != 0 {
            whole.push_str(&format!(".{cents:02}"));
        }
        format!("${whole}")
    }

    /// Schedule line for cards and summaries, e.g. `Dec 15-16, 2025`.
    pub fn schedule_text(&self) -> String {
        let start = self.start_date;
        let end = self.end_date();
        if start == end {
            format!("{} {}, {}", start.format("%b"), start.day(), start.year())
        } else if start.month() == end.month() && start.year() == end.year() {
            format!("{} {}-{}, {}", start.format("%b"), start.day(), end.day(), start.year())
        } else if start.year() == end.year() {
            format!(
                "{} {} - {} {}, {}",
                start.format("%b"),
                start.day(),
                end.format("%b"),
                end.day(),
                start.year()
            )
        } else {
            format!(
                "{} {}, {} - {} {}, {}",
                start.format("%b"),
                start.day(),
                start.year(),
                end.format("%b"),
                end.day(),
                end.year()
            )
        }
    }

    /// Duration line, e.g. `2 days`.
    pub fn duration_text(&self) -> String {
        if self.duration_days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.duration_days)
        }
    }
}

fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One selectable category in the filter UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Stable identifier matched against [`Course::category`].
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

/// Filter taxonomy shipped with the catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Category filter definitions, in display order.
    #[serde(default)]
    pub categories: Vec<CategoryDef>,
}

impl Taxonomy {
    /// Label for a category ID, falling back to the raw ID.
    pub fn category_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or(id, |c| c.label.as_str())
    }
}

/// The static, load-once course catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Filter taxonomy.
    #[serde(default)]
    pub taxonomy: Taxonomy,
    /// All courses, in document order.
    courses: Vec<Course>,
}

impl Catalog {
    /// Parse a catalog from its JSON document text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a catalog from a reader serving the JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// All courses in document order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by ID.
    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Look up a course by ID, erroring when absent.
    pub fn require(&self, id: &str) -> Result<&Course> {
        self.get(id).ok_or_else(|| Error::UnknownCourse { id: id.to_string() })
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog holds no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
