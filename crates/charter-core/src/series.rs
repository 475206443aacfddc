//! TimeSeries container for indicator output.

use std::ops::Range;

/// A candle-aligned series of values, typically used for indicator output.
///
/// Slot `i` belongs to candle `i` of the series the values were computed
/// from. Positions where the indicator has no value hold `None`; a missing
/// value is never encoded as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    values: Vec<Option<T>>,
}

impl<T> TimeSeries<T> {
    /// Creates a new empty TimeSeries.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates a TimeSeries from explicit slots.
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        Self { values }
    }

    /// Creates a series of `len` absent slots.
    pub fn absent(len: usize) -> Self {
        Self {
            values: (0..len).map(|_| None).collect(),
        }
    }

    /// Returns the number of slots in this series (present or absent).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this series has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the value at the given candle index, if present.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.as_ref())
    }

    /// Returns an iterator over (index, value) pairs of present values.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|val| (i, val)))
    }

    /// Returns the underlying slots.
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Number of present values.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// True when no slot holds a value (an empty series counts as absent).
    pub fn is_all_absent(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Index of the first present value.
    pub fn first_present_index(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Value in the last slot, if that slot is present.
    pub fn last(&self) -> Option<&T> {
        self.values.last().and_then(|v| v.as_ref())
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Creates a TimeSeries from a slice of values, all present.
    pub fn from_values(values: &[T]) -> Self {
        Self {
            values: values.iter().cloned().map(Some).collect(),
        }
    }

    /// Copies the slots in `range` into a new series re-indexed from zero.
    ///
    /// Absent slots stay absent. The range is clamped to the series length.
    pub fn clip(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.values.len());
        let start = range.start.min(end);
        Self {
            values: self.values[start..end].to_vec(),
        }
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Option<T>> for TimeSeries<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
