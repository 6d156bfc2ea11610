//! Lazy expansion of compact range notation.
//!
//! `"1-3,5"` expands to `1, 2, 3, 5`. Tokens are comma-separated and may be
//! padded with whitespace. A token is either a bare integer or an inclusive
//! `start-end` pair. Runs are produced one value at a time, so huge ranges
//! cost nothing until they are consumed.

use std::iter::{Enumerate, FusedIterator};
use std::ops::RangeInclusive;
use std::str::Split;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// What to do with arrow-decorated tokens such as `20->exit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowPolicy {
    /// Report the token as unparseable.
    #[default]
    Reject,
    /// Keep the number before the arrow and drop the target.
    KeepStart,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("empty token at position {position}")]
    EmptyToken { position: usize },
    #[error("invalid number {value:?} in token {token:?}")]
    InvalidNumber { token: String, value: String },
    #[error("range {token:?} runs backwards ({start} > {end})")]
    Descending { token: String, start: i64, end: i64 },
    #[error("token {token:?} carries non-numeric decoration")]
    Decorated { token: String },
}

/// Configurable entry point; [`parse_ranges`] uses the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeParser {
    arrows: ArrowPolicy,
}

impl RangeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrows(mut self, policy: ArrowPolicy) -> Self {
        self.arrows = policy;
        self
    }

    pub fn parse<'a>(&self, input: &'a str) -> ParseRanges<'a> {
        ParseRanges {
            tokens: input.split(',').enumerate(),
            current: None,
            arrows: self.arrows,
            done: input.trim().is_empty(),
        }
    }
}

/// Expand `input` with the default (strict) parser.
pub fn parse_ranges(input: &str) -> ParseRanges<'_> {
    RangeParser::new().parse(input)
}

/// Expand `input` eagerly, stopping at the first malformed token.
pub fn collect_ranges(input: &str) -> Result<Vec<i64>, RangeError> {
    parse_ranges(input).collect()
}

/// Single-pass iterator over expanded values.
///
/// A malformed token is reported once as `Err`, after which the iterator is
/// exhausted.
#[derive(Debug)]
pub struct ParseRanges<'a> {
    tokens: Enumerate<Split<'a, char>>,
    current: Option<RangeInclusive<i64>>,
    arrows: ArrowPolicy,
    done: bool,
}

impl Iterator for ParseRanges<'_> {
    type Item = Result<i64, RangeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(value));
            }
            if self.done {
                return None;
            }
            let Some((position, raw)) = self.tokens.next() else {
                self.done = true;
                return None;
            };
            match parse_token(raw, position, self.arrows) {
                Ok(run) => self.current = Some(run),
                Err(err) => {
                    debug!(position, token = raw, err = %err, "rejecting range token");
                    self.done = true;
                    self.current = None;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl FusedIterator for ParseRanges<'_> {}

fn parse_token(
    raw: &str,
    position: usize,
    arrows: ArrowPolicy,
) -> Result<RangeInclusive<i64>, RangeError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(RangeError::EmptyToken { position });
    }

    let body = match token.find("->") {
        None => token,
        Some(index) => match arrows {
            ArrowPolicy::Reject => {
                return Err(RangeError::Decorated {
                    token: token.to_string(),
                });
            }
            ArrowPolicy::KeepStart => token[..index].trim_end(),
        },
    };
    if body.is_empty() {
        return Err(RangeError::Decorated {
            token: token.to_string(),
        });
    }

    if let Ok(value) = body.parse::<i64>() {
        return Ok(value..=value);
    }

    // The first character may be a sign, so the separator is searched after it.
    let Some(split) = body
        .char_indices()
        .skip(1)
        .find(|&(_, ch)| ch == '-')
        .map(|(index, _)| index)
    else {
        return Err(invalid_number(token, body));
    };

    let start = parse_bound(token, &body[..split])?;
    let end = parse_bound(token, &body[split + 1..])?;
    if start > end {
        return Err(RangeError::Descending {
            token: token.to_string(),
            start,
            end,
        });
    }
    Ok(start..=end)
}

fn parse_bound(token: &str, value: &str) -> Result<i64, RangeError> {
    let value = value.trim();
    value.parse().map_err(|_| invalid_number(token, value))
}

fn invalid_number(token: &str, value: &str) -> RangeError {
    RangeError::InvalidNumber {
        token: token.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: &str) -> Vec<i64> {
        collect_ranges(input).expect("valid ranges")
    }

    #[test]
    fn expands_ranges_in_order() {
        assert_eq!(expand("1-2,4-4,8-10"), vec![1, 2, 4, 8, 9, 10]);
        assert_eq!(expand("1-3,4-4,8-11"), vec![1, 2, 3, 4, 8, 9, 10, 11]);
    }

    #[test]
    fn tolerates_whitespace_around_tokens() {
        assert_eq!(
            expand("0-0, 4-8, 20-21, 43-45"),
            vec![0, 4, 5, 6, 7, 8, 20, 21, 43, 44, 45]
        );
    }

    #[test]
    fn bare_numbers_yield_themselves() {
        assert_eq!(
            expand("0,4-8,20,43-45"),
            vec![0, 4, 5, 6, 7, 8, 20, 43, 44, 45]
        );
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        assert_eq!(expand("3,1-2,2,3"), vec![3, 1, 2, 2, 3]);
    }

    #[test]
    fn negative_bounds_are_supported() {
        assert_eq!(expand("-2--1,-5"), vec![-2, -1, -5]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert_eq!(expand(""), Vec::<i64>::new());
        assert_eq!(expand("   "), Vec::<i64>::new());
    }

    #[test]
    fn iterator_is_single_pass() {
        let mut numbers = parse_ranges("0-0, 4-8, 20-21, 43-45");
        assert_eq!(numbers.next(), Some(Ok(0)));
        let rest: Result<Vec<i64>, RangeError> = numbers.by_ref().collect();
        assert_eq!(rest, Ok(vec![4, 5, 6, 7, 8, 20, 21, 43, 44, 45]));
        assert_eq!(numbers.next(), None);
    }

    #[test]
    fn huge_ranges_are_not_materialized() {
        let mut numbers = parse_ranges("100-1000000000000");
        assert_eq!(numbers.next(), Some(Ok(100)));
        assert_eq!(numbers.next(), Some(Ok(101)));
    }

    #[test]
    fn arrows_are_rejected_by_default() {
        let mut numbers = parse_ranges("0, 20->exit, 43-45");
        assert_eq!(numbers.next(), Some(Ok(0)));
        assert_eq!(
            numbers.next(),
            Some(Err(RangeError::Decorated {
                token: "20->exit".to_string()
            }))
        );
        assert_eq!(numbers.next(), None);
    }

    #[test]
    fn keep_start_policy_drops_arrow_targets() {
        let parser = RangeParser::new().arrows(ArrowPolicy::KeepStart);
        let values: Result<Vec<i64>, RangeError> =
            parser.parse("0, 4-8, 20->exit, 43-45").collect();
        assert_eq!(values, Ok(vec![0, 4, 5, 6, 7, 8, 20, 43, 44, 45]));
    }

    #[test]
    fn malformed_tokens_are_reported() {
        assert!(matches!(
            collect_ranges("1,,2"),
            Err(RangeError::EmptyToken { position: 1 })
        ));
        assert!(matches!(
            collect_ranges("1-x"),
            Err(RangeError::InvalidNumber { .. })
        ));
        assert!(matches!(
            collect_ranges("1-2-3"),
            Err(RangeError::InvalidNumber { .. })
        ));
        assert!(matches!(
            collect_ranges("5-3"),
            Err(RangeError::Descending { start: 5, end: 3, .. })
        ));
        assert!(matches!(
            collect_ranges("abc"),
            Err(RangeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn range_ending_at_max_terminates() {
        let max = i64::MAX;
        let values = expand(&format!("{}-{}", max - 1, max));
        assert_eq!(values, vec![max - 1, max]);
    }
}
