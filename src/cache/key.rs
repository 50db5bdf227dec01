use crate::LatLon;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const CACHE_FILE_PREFIX: &str = "wind-";

/// Identity of a fetch: month, set of years, exact coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub month: u32,
    /// Sorted and free of duplicates.
    pub years: Vec<i32>,
    pub latitude: OrderedFloat<f64>,
    pub longitude: OrderedFloat<f64>,
}

impl CacheKey {
    pub fn new(month: u32, years: &BTreeSet<i32>, location: LatLon) -> Self {
        Self {
            month,
            years: years.iter().copied().collect(),
            latitude: OrderedFloat(location.0),
            longitude: OrderedFloat(location.1),
        }
    }

    /// File name for the on-disk entry. Coordinates are written as raw bits so two
    /// distinct points never share a file.
    pub fn file_name(&self) -> String {
        let years = self
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join("_");
        format!(
            "{}{:02}-{}-{:016x}-{:016x}.bin",
            CACHE_FILE_PREFIX,
            self.month,
            years,
            self.latitude.0.to_bits(),
            self.longitude.0.to_bits()
        )
    }

    pub(crate) fn is_cache_file(name: &str) -> bool {
        name.starts_with(CACHE_FILE_PREFIX) && name.ends_with(".bin")
    }
}
