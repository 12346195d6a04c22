// Field sort orders and the composite keys they produce

use crate::error::{Error, TypeError};
use crate::field::Field;
use crate::value::Value;
use std::cmp::Ordering;

/// Compare two sequences position by position.
///
/// The first non-equal position decides. When one sequence is a prefix of
/// the other, the shorter sorts first.
pub fn compare_lexicographic<T, E>(
    left: &[T],
    right: &[T],
    mut compare: impl FnMut(usize, &T, &T) -> Result<Ordering, E>,
) -> Result<Ordering, E> {
    for (position, (a, b)) in left.iter().zip(right).enumerate() {
        match compare(position, a, b)? {
            Ordering::Equal => continue,
            decided => return Ok(decided),
        }
    }
    Ok(left.len().cmp(&right.len()))
}

#[derive(Debug, Clone)]
pub struct OrderSegment {
    pub field: Field,
    pub ascending: bool,
}

/// Schema-level sort: fields with a direction each
#[derive(Debug, Clone, Default)]
pub struct Order {
    segments: Vec<OrderSegment>,
}

impl Order {
    pub fn new() -> Self {
        Order::default()
    }

    pub fn add(&mut self, field: Field, ascending: bool) -> &mut Self {
        self.segments.push(OrderSegment { field, ascending });
        self
    }

    pub fn ascending(&mut self, field: Field) -> &mut Self {
        self.add(field, true)
    }

    pub fn descending(&mut self, field: Field) -> &mut Self {
        self.add(field, false)
    }

    pub fn segments(&self) -> &[OrderSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct KeySegment {
    pub value: Value,
    pub ascending: bool,
}

impl KeySegment {
    fn compare(&self, other: &KeySegment) -> Result<Ordering, TypeError> {
        let ordering = self.value.compare(&other.value)?;
        Ok(if self.ascending {
            ordering
        } else {
            ordering.reverse()
        })
    }
}

/// Value-level composite key, compared segment by segment
#[derive(Debug, Clone, Default)]
pub struct OrderKey {
    segments: Vec<KeySegment>,
}

impl OrderKey {
    pub fn new() -> Self {
        OrderKey::default()
    }

    pub fn add(&mut self, value: Value, ascending: bool) -> &mut Self {
        self.segments.push(KeySegment { value, ascending });
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.segments.iter().map(|s| &s.value)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first unequal segment decides, flipped when that segment is descending
    pub fn compare(&self, other: &OrderKey) -> Result<Ordering, Error> {
        compare_lexicographic(&self.segments, &other.segments, |position, a, b| {
            a.compare(b)
                .map_err(|source| Error::IncomparableSegment { position, source })
        })
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &OrderKey) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &OrderKey) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
