//! Value pools
//!
//! A pool is the ordered, finite sequence a pooled provider walks through. It
//! is either a literal list, an inclusive integer interval, or the same
//! interval rendered through a string template. Range pools are never
//! materialized; `value_at` computes the element on demand.

use crate::error::InitFailure;
use crate::value::Value;

/// Marker replaced by the current number in a templated range
pub const TEMPLATE_MARKER: &str = "{0}";

/// Ordered source of values
#[derive(Debug, Clone, PartialEq)]
pub enum ValuePool {
    /// Literal values, handed out in declaration order
    List(Vec<Value>),

    /// Integers `start..=end`
    Range { start: i64, end: i64 },

    /// Integers `start..=end` rendered by replacing every `{0}` in `template`
    Template { template: String, start: i64, end: i64 },
}

impl ValuePool {
    /// Number of elements, or `None` if the interval is inverted or too large
    /// to index
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::List(values) => Some(values.len()),
            Self::Range { start, end } | Self::Template { start, end, .. } => {
                if end < start {
                    return None;
                }
                let span = end.checked_sub(*start)?;
                usize::try_from(span).ok()?.checked_add(1)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Check that the pool can be walked
    pub fn validate(&self) -> Result<(), InitFailure> {
        match self {
            Self::List(values) if values.is_empty() => Err(InitFailure::EmptyPool),
            Self::List(_) => Ok(()),
            Self::Range { start, end } | Self::Template { start, end, .. } => {
                if self.len().is_some() {
                    Ok(())
                } else {
                    Err(InitFailure::InvalidRange {
                        start: *start,
                        end: *end,
                    })
                }
            }
        }
    }

    /// Element at `index`, or `None` when out of bounds
    pub fn value_at(&self, index: usize) -> Option<Value> {
        match self {
            Self::List(values) => values.get(index).cloned(),
            Self::Range { start, end } => Self::number_at(*start, *end, index).map(Value::Int),
            Self::Template { template, start, end } => Self::number_at(*start, *end, index)
                .map(|n| Value::Text(template.replace(TEMPLATE_MARKER, &n.to_string()))),
        }
    }

    fn number_at(start: i64, end: i64, index: usize) -> Option<i64> {
        let offset = i64::try_from(index).ok()?;
        let n = start.checked_add(offset)?;
        (n <= end).then_some(n)
    }
}
