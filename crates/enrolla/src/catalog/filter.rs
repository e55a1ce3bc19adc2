//! Filtering and searching over the catalog.
//!
//! [`CatalogView`] is the one parameterized implementation behind every
//! browse surface: category pills, date-range and price-band dropdowns, and
//! incremental text search. It keeps a visible subset of an immutable
//! [`Catalog`] plus the derived presentation strings (results count,
//! empty-state message, screen-reader announcement) so hosts render state
//! instead of recomputing it.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use super::{Catalog, Course};

/// Date-range buckets for the schedule filter.
///
/// Buckets are evaluated against a reference date supplied by the host, so
/// filtering is deterministic and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// No date filtering.
    #[default]
    Any,
    /// Courses starting in the reference month.
    ThisMonth,
    /// Courses starting in the calendar month after the reference month.
    NextMonth,
    /// Courses starting in the reference quarter.
    ThisQuarter,
    /// Courses starting in the calendar quarter after the reference quarter.
    NextQuarter,
}

impl DateRange {
    /// Whether `date` falls inside this bucket relative to `today`.
    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::Any => true,
            Self::ThisMonth => {
                date.month() == today.month() && date.year() == today.year()
            }
            Self::NextMonth => {
                let (next_year, next_month) = if today.month() == 12 {
                    (today.year() + 1, 1)
                } else {
                    (today.year(), today.month() + 1)
                };
                date.month() == next_month && date.year() == next_year
            }
            Self::ThisQuarter => {
                quarter(date) == quarter(today) && date.year() == today.year()
            }
            Self::NextQuarter => {
                let (next_year, next_quarter) = if quarter(today) == 3 {
                    (today.year() + 1, 0)
                } else {
                    (today.year(), quarter(today) + 1)
                };
                quarter(date) == next_quarter && date.year() == next_year
            }
        }
    }
}

fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3
}

/// Price-band buckets for the price filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBand {
    /// No price filtering.
    #[default]
    Any,
    /// Price strictly below the given amount in cents.
    Under(u64),
    /// Price at or above the given amount in cents.
    AtLeast(u64),
}

impl PriceBand {
    /// Whether `price_cents` falls inside this band.
    pub fn matches(&self, price_cents: u64) -> bool {
        match self {
            Self::Any => true,
            Self::Under(limit) => price_cents < *limit,
            Self::AtLeast(floor) => price_cents >= *floor,
        }
    }
}

/// A ranked search result from [`CatalogView::search`].
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// The matching course.
    pub course: &'a Course,
    /// Relevance score; higher ranks earlier. Title matches dominate.
    pub score: u32,
}

/// A filtered, searchable view over an immutable catalog.
///
/// The view owns its filter state; every mutation rebuilds the visible
/// subset eagerly. Visible order is document order, matching the static
/// markup the filters progressively enhance.
pub struct CatalogView {
    catalog: Arc<Catalog>,
    /// Lowercased search query; empty means "no search".
    query: String,
    /// Active category ID; `None` means all categories.
    category: Option<String>,
    date_range: DateRange,
    price_band: PriceBand,
    /// Reference date for [`DateRange`] bucketing.
    today: NaiveDate,
    /// Indices into the catalog's course list.
    visible: Vec<usize>,
}

impl CatalogView {
    /// Create a view showing the whole catalog.
    ///
    /// `today` anchors the date-range buckets.
    pub fn new(catalog: Arc<Catalog>, today: NaiveDate) -> Self {
        let visible = (0..catalog.len()).collect();
        Self {
            catalog,
            query: String::new(),
            category: None,
            date_range: DateRange::Any,
            price_band: PriceBand::Any,
            today,
            visible,
        }
    }

    /// Set the free-text search query. Matching is case-insensitive.
    pub fn set_search(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        self.rebuild();
    }

    /// Restrict to one category, or pass `None` for all.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.map(str::to_string);
        self.rebuild();
    }

    /// Set the schedule filter bucket.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.rebuild();
    }

    /// Set the price filter band.
    pub fn set_price_band(&mut self, band: PriceBand) {
        self.price_band = band;
        self.rebuild();
    }

    /// Clear search and all filters.
    pub fn reset(&mut self) {
        self.query.clear();
        self.category = None;
        self.date_range = DateRange::Any;
        self.price_band = PriceBand::Any;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.visible = self
            .catalog
            .courses()
            .iter()
            .enumerate()
            .filter(|(_, course)| self.course_matches(course))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            visible = self.visible.len(),
            total = self.catalog.len(),
            "catalog view rebuilt"
        );
    }

    fn course_matches(&self, course: &Course) -> bool {
        if let Some(category) = &self.category {
            if &course.category != category {
                return false;
            }
        }
        if !self.date_range.matches(course.start_date, self.today) {
            return false;
        }
        if !self.price_band.matches(course.price_cents) {
            return false;
        }
        self.query.is_empty() || self.match_score(course) > 0
    }

    /// Relevance of the current query against one course. Zero means no match.
    fn match_score(&self, course: &Course) -> u32 {
        let query = self.query.as_str();
        let mut score = 0;
        if course.title.to_lowercase().contains(query) {
            score += 4;
        }
        if course.instructor.to_lowercase().contains(query) {
            score += 2;
        }
        if course.summary.to_lowercase().contains(query)
            || self.catalog.taxonomy.category_label(&course.category).to_lowercase().contains(query)
        {
            score += 1;
        }
        if course.curriculum.iter().any(|item| item.to_lowercase().contains(query)) {
            score += 1;
        }
        score
    }

    /// The visible courses, in document order.
    pub fn visible(&self) -> Vec<&Course> {
        self.visible
            .iter()
            .filter_map(|&i| self.catalog.courses().get(i))
            .collect()
    }

    /// Number of visible courses.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Whether the current filters hide everything.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Visible courses ranked by search relevance.
    ///
    /// With an empty query this is the same as [`visible`](Self::visible)
    /// with every score zero. Ties keep document order.
    pub fn search(&self) -> Vec<SearchHit<'_>> {
        let mut hits: Vec<SearchHit<'_>> = self
            .visible
            .iter()
            .filter_map(|&i| self.catalog.courses().get(i))
            .map(|course| SearchHit {
                course,
                score: if self.query.is_empty() { 0 } else { self.match_score(course) },
            })
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }

    /// Results-count line, e.g. `Showing 3 courses`.
    pub fn results_count_text(&self) -> String {
        let count = self.visible.len();
        let noun = if count == 1 { "course" } else { "courses" };
        format!("Showing {count} {noun}")
    }

    /// Screen-reader announcement for the current result set.
    pub fn announcement_text(&self) -> String {
        let count = self.visible.len();
        if count == 0 {
            "No courses found. Try adjusting your search or filters.".to_string()
        } else {
            let noun = if count == 1 { "course" } else { "courses" };
            format!("{count} {noun} found")
        }
    }

    /// Empty-state message naming whatever is hiding the results.
    pub fn empty_state_text(&self) -> String {
        let has_search = !self.query.is_empty();
        let filter_label = self
            .category
            .as_deref()
            .map(|id| self.catalog.taxonomy.category_label(id).to_string());

        match (has_search, filter_label) {
            (true, Some(label)) => {
                format!("No matches for \"{}\" in {label}", self.query)
            }
            (true, None) => format!("No matches for \"{}\"", self.query),
            (false, Some(label)) => format!("No courses found in {label}"),
            (false, None) => {
                "Try adjusting your search or browse all categories".to_string()
            }
        }
    }
}
