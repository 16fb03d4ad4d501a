use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounds, tick marks and starting value of a range filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub max: u64,
    pub marks: BTreeMap<u64, String>,
    pub default: u64,
    pub step: u64,
}

impl SliderConfig {
    /// A slider from 0 to `max` starting at `default`, stepping by 50 on wide ranges.
    pub fn new(max: u64, default: u64) -> Self {
        let step = step_for(max);
        SliderConfig {
            max,
            marks: build_slider_marks(max, step),
            default,
            step,
        }
    }
}

pub fn step_for(max: u64) -> u64 {
    if max >= 400 {
        50
    } else {
        10
    }
}

/// Every integer on short ranges, every `step` otherwise, always ending on `max`.
pub fn build_slider_marks(max: u64, step: u64) -> BTreeMap<u64, String> {
    let mut marks = BTreeMap::new();
    if max <= 10 {
        marks.extend((0..=max).map(|v| (v, v.to_string())));
    } else {
        marks.extend((0..=max).step_by(step.max(1) as usize).map(|v| (v, v.to_string())));
    }
    if max > 0 {
        marks.entry(max).or_insert_with(|| max.to_string());
    }
    marks
}
