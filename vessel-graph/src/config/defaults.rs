//! Default value functions for serde deserialization.

use crate::radius::DEFAULT_LUT_SIZE;

pub fn resolution() -> f64 {
    1.0
}

pub fn prune_length() -> f64 {
    5.0
}

pub fn filter_length() -> f64 {
    10.0
}

pub fn enabled() -> bool {
    true
}

pub fn class_two_limit() -> usize {
    50
}

pub fn max_slices() -> usize {
    5
}

pub fn search_limit() -> usize {
    DEFAULT_LUT_SIZE
}
