#![forbid(unsafe_code)]

//! Multi-predicate record filtering.
//!
//! A record passes the filter when **every** constrained [`Predicate`] holds.
//! Predicates whose value is empty or the `"All"` sentinel are unconstrained
//! and contribute nothing, which is how "no filter selected" degrades to
//! "match everything". Evaluation order never affects the result.
//!
//! [`FilterState`] holds the named predicates of one table together with its
//! [`PageCursor`]. Every change to a predicate value resets the cursor to
//! page 1.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::{self, Page, PageCursor};

/// Sentinel choice value meaning "do not constrain this field".
pub const ALL: &str = "All";

/// Date format accepted by [`DateRange::parse`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building filter values from user input.
///
/// Filtering itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A date bound could not be parsed.
    #[error("invalid date {input:?}: {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The start bound is after the end bound.
    #[error("date range starts at {start} after it ends at {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// The value of one record field, as seen by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Free text or an enum label.
    Text(Cow<'a, str>),
    /// A calendar date.
    Date(NaiveDate),
    /// The record has no value for this field.
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Borrowed text value.
    pub fn text(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }

    /// Text view of the value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Date view of the value, if it is a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::text(value)
    }
}

impl From<NaiveDate> for FieldValue<'_> {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// A filterable domain entity.
///
/// `Field` is usually a fieldless enum naming the record's columns.
pub trait Record {
    /// Field selector.
    type Field: Copy + Eq + fmt::Debug;

    /// Value of `field` on this record.
    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}

/// An inclusive date interval; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Both bounds open: matches every date.
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Build a range, rejecting `start > end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(FilterError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds as typed into a date picker.
    ///
    /// Blank input leaves that bound open.
    pub fn parse(start: &str, end: &str) -> Result<Self, FilterError> {
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    /// Whether neither bound is set.
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Inclusive containment.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

fn parse_bound(input: &str) -> Result<Option<NaiveDate>, FilterError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|source| FilterError::InvalidDate {
            input: input.to_owned(),
            source,
        })
}

/// One AND-term of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate<F> {
    /// Case-insensitive substring match against any of `fields`.
    Search { fields: Vec<F>, query: String },
    /// Exact match of `field` against `value`, unless `value` is `"All"` or empty.
    Exact { field: F, value: String },
    /// Inclusive containment of the date in `field`.
    DateRange { field: F, range: DateRange },
}

impl<F: Copy + Eq + fmt::Debug> Predicate<F> {
    /// An empty free-text search over `fields`.
    pub fn search(fields: impl IntoIterator<Item = F>) -> Self {
        Self::Search {
            fields: fields.into_iter().collect(),
            query: String::new(),
        }
    }

    /// A single-select filter on `field`, initially `"All"`.
    pub fn exact(field: F) -> Self {
        Self::Exact {
            field,
            value: ALL.to_owned(),
        }
    }

    /// An unbounded date-range filter on `field`.
    pub fn date_range(field: F) -> Self {
        Self::DateRange {
            field,
            range: DateRange::unbounded(),
        }
    }

    /// Whether this predicate currently matches every record.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::Search { query, .. } => query.trim().is_empty(),
            Self::Exact { value, .. } => value.is_empty() || value == ALL,
            Self::DateRange { range, .. } => range.is_unbounded(),
        }
    }

    /// Whether `record` satisfies this predicate.
    pub fn matches<R: Record<Field = F>>(&self, record: &R) -> bool {
        self.compile().is_none_or(|compiled| compiled.matches(record))
    }

    /// Reset to the unconstrained value. Returns `true` if it changed.
    fn clear(&mut self) -> bool {
        if self.is_unconstrained() {
            return false;
        }
        match self {
            Self::Search { query, .. } => query.clear(),
            Self::Exact { value, .. } => *value = ALL.to_owned(),
            Self::DateRange { range, .. } => *range = DateRange::unbounded(),
        }
        true
    }

    fn compile(&self) -> Option<Compiled<'_, F>> {
        if self.is_unconstrained() {
            return None;
        }
        Some(match self {
            Self::Search { fields, query } => Compiled::Search {
                fields,
                needle: query.trim().to_lowercase(),
            },
            Self::Exact { field, value } => Compiled::Exact {
                field: *field,
                value,
            },
            Self::DateRange { field, range } => Compiled::Range {
                field: *field,
                range: *range,
            },
        })
    }
}

/// A constrained predicate with its per-call work (lowercasing) done once.
enum Compiled<'p, F> {
    Search { fields: &'p [F], needle: String },
    Exact { field: F, value: &'p str },
    Range { field: F, range: DateRange },
}

impl<F: Copy> Compiled<'_, F> {
    fn matches<R: Record<Field = F>>(&self, record: &R) -> bool {
        match self {
            Self::Search { fields, needle } => fields.iter().any(|field| {
                record
                    .field(*field)
                    .as_text()
                    .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
            }),
            Self::Exact { field, value } => record.field(*field).as_text() == Some(*value),
            Self::Range { field, range } => record
                .field(*field)
                .as_date()
                .is_some_and(|date| range.contains(date)),
        }
    }
}

/// Records satisfying every predicate, in their original order.
pub fn apply_filters<'a, 'p, R, I>(records: &'a [R], predicates: I) -> Vec<&'a R>
where
    R: Record,
    R::Field: 'p,
    I: IntoIterator<Item = &'p Predicate<R::Field>>,
{
    let compiled: Vec<_> = predicates
        .into_iter()
        .filter_map(Predicate::compile)
        .collect();
    if compiled.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| compiled.iter().all(|c| c.matches(*record)))
        .collect()
}

/// Named predicates plus the page cursor of one table.
#[derive(Debug, Clone)]
pub struct FilterState<F> {
    filters: Vec<(String, Predicate<F>)>,
    cursor: PageCursor,
}

impl<F: Copy + Eq + fmt::Debug> FilterState<F> {
    /// Empty filter set paging `items_per_page` records at a time.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            filters: Vec::new(),
            cursor: PageCursor::new(items_per_page),
        }
    }

    /// Register a predicate under `key`, replacing any previous one.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, predicate: Predicate<F>) -> Self {
        self.insert(key, predicate);
        self
    }

    /// Register a predicate under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, predicate: Predicate<F>) {
        let key = key.into();
        match self.filters.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = predicate,
            None => self.filters.push((key, predicate)),
        }
        self.cursor.reset();
    }

    /// Predicate registered under `key`.
    pub fn get(&self, key: &str) -> Option<&Predicate<F>> {
        self.filters.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    /// All predicates in registration order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate<F>> {
        self.filters.iter().map(|(_, p)| p)
    }

    /// Whether any predicate is currently constrained.
    pub fn is_filtered(&self) -> bool {
        self.predicates().any(|p| !p.is_unconstrained())
    }

    /// The page cursor.
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Mutable page cursor for page navigation.
    pub fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }

    /// Set the text of the search predicate `key`.
    pub fn set_query(&mut self, key: &str, query: &str) -> bool {
        self.update(key, |predicate| match predicate {
            Predicate::Search { query: current, .. } if current != query => {
                query.clone_into(current);
                true
            }
            _ => false,
        })
    }

    /// Set the selected value of the exact-match predicate `key`.
    pub fn set_choice(&mut self, key: &str, value: &str) -> bool {
        self.update(key, |predicate| match predicate {
            Predicate::Exact { value: current, .. } if current != value => {
                value.clone_into(current);
                true
            }
            _ => false,
        })
    }

    /// Set the range of the date predicate `key`.
    pub fn set_date_range(&mut self, key: &str, range: DateRange) -> bool {
        self.update(key, |predicate| match predicate {
            Predicate::DateRange { range: current, .. } if *current != range => {
                *current = range;
                true
            }
            _ => false,
        })
    }

    /// Reset predicate `key` to its unconstrained value.
    pub fn clear(&mut self, key: &str) -> bool {
        self.update(key, Predicate::clear)
    }

    /// Reset every predicate. Returns `true` if anything changed.
    pub fn clear_all(&mut self) -> bool {
        let mut changed = false;
        for (_, predicate) in &mut self.filters {
            changed |= predicate.clear();
        }
        if changed {
            self.cursor.reset();
        }
        changed
    }

    /// Filter, clamp the cursor, and slice out the current page.
    pub fn view<'a, R: Record<Field = F>>(&mut self, records: &'a [R]) -> Page<'a, R> {
        let filtered = apply_filters(records, self.predicates());
        self.cursor.clamp(filtered.len());
        pagination::page_of(
            &filtered,
            self.cursor.current_page(),
            self.cursor.items_per_page(),
        )
    }

    fn update(&mut self, key: &str, apply: impl FnOnce(&mut Predicate<F>) -> bool) -> bool {
        let Some((_, predicate)) = self.filters.iter_mut().find(|(k, _)| k == key) else {
            crate::debug!(key, "filter.update ignored for unknown key");
            return false;
        };
        let changed = apply(predicate);
        if changed {
            self.cursor.reset();
            crate::trace!(key, "filter.changed");
        }
        changed
    }
}
