//! Typed Helpers
//!
//! Small, total functions over sequences, maps and numbers. None of them keep
//! state; each takes its input by reference or by value and returns a fresh
//! result.
//!
//! # Overview
//!
//! | Helper                | Input                 | Output              |
//! |-----------------------|-----------------------|---------------------|
//! | [`safe_first_element`]| slice                 | first element       |
//! | [`safely_get_value`]  | map, key, default     | value or default    |
//! | [`zoom_array`]        | slice, factor         | repeated elements   |
//! | [`sum_mixed_list`]    | ints and floats       | float total         |
//! | [`to_kv`]             | key, number           | `(key, number²)`    |
//! | [`make_multiplier`]   | factor                | closure             |
//! | [`element_length`]    | iterable of sized     | `(element, length)` |

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use serde::{Deserialize, Serialize};

/// Default repetition factor for [`zoom_array`]
pub const DEFAULT_ZOOM_FACTOR: usize = 2;

// ============================================================================
// Numbers
// ============================================================================

/// An integer or a floating-point value
///
/// Deserializes from either JSON representation, so `[1, 2.5]` parses as
/// `[Number::Int(1), Number::Float(2.5)]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Whole number
    Int(i64),
    /// Floating-point number
    Float(f64),
}

impl Number {
    /// Widen to `f64`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

// ============================================================================
// Scalars
// ============================================================================

/// Sum of two floats
#[must_use]
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Concatenate two strings
#[must_use]
pub fn concat(first: &str, second: &str) -> String {
    let mut joined = String::with_capacity(first.len() + second.len());
    joined.push_str(first);
    joined.push_str(second);
    joined
}

/// Largest integer less than or equal to `n`
///
/// Values outside the `i64` range saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn floor(n: f64) -> i64 {
    n.floor() as i64
}

/// String form of a float
#[must_use]
pub fn to_str(n: f64) -> String {
    n.to_string()
}

/// Pair a key with the square of a number
#[must_use]
pub fn to_kv(key: impl Into<String>, value: impl Into<Number>) -> (String, f64) {
    let v = value.into().as_f64();
    (key.into(), v * v)
}

/// Build a closure that multiplies its argument by `multiplier`
///
/// Each call captures its own factor; closures built with different factors
/// are independent.
pub fn make_multiplier(multiplier: f64) -> impl Fn(f64) -> f64 + Clone + Send + Sync {
    move |x| x * multiplier
}

// ============================================================================
// Sequences
// ============================================================================

/// Sum of a list of floats
#[must_use]
pub fn sum_list(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Sum of a list of integers and floats, as a float
#[must_use]
pub fn sum_mixed_list(values: &[Number]) -> f64 {
    values.iter().map(|n| n.as_f64()).sum()
}

/// First element of a sequence, or `None` when it is empty
#[must_use]
pub fn safe_first_element<T>(items: &[T]) -> Option<&T> {
    items.first()
}

/// Repeat each element `factor` times, keeping input order
///
/// `zoom_array(&[12, 72], 2)` is `[12, 12, 72, 72]`. A factor of zero
/// yields an empty vector.
#[must_use]
pub fn zoom_array<T: Clone>(items: &[T], factor: usize) -> Vec<T> {
    let mut zoomed = Vec::with_capacity(items.len().saturating_mul(factor));
    for item in items {
        zoomed.extend(std::iter::repeat(item).take(factor).cloned());
    }
    zoomed
}

/// Anything with a length
///
/// Strings count characters; sequences count elements.
pub trait Length {
    /// Number of characters or elements
    fn length(&self) -> usize;
}

impl Length for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl Length for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl<T> Length for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Length for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Length for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

impl<T: Length + ?Sized> Length for &T {
    fn length(&self) -> usize {
        (**self).length()
    }
}

/// Pair each element with its length, in input order
pub fn element_length<I>(items: I) -> Vec<(I::Item, usize)>
where
    I: IntoIterator,
    I::Item: Length,
{
    items
        .into_iter()
        .map(|item| {
            let len = item.length();
            (item, len)
        })
        .collect()
}

// ============================================================================
// Maps
// ============================================================================

/// Value stored under `key`, or `default` when the key is absent
///
/// Passing `None` as the default makes a missing key return `None`.
pub fn safely_get_value<'a, K, V, Q, S>(
    map: &'a HashMap<K, V, S>,
    key: &Q,
    default: Option<&'a V>,
) -> Option<&'a V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    match map.get(key) {
        Some(value) => Some(value),
        None => default,
    }
}
