//! In-memory evaluation of [`AdvocateFilter`] over a loaded record set.

use crate::domain::advocate::Advocate;
use crate::domain::query::{AdvocateFilter, FilterOptions};

/// Returns the advocates matching `filter`, in their original order.
pub fn filter_advocates(filter: &AdvocateFilter, advocates: &[Advocate]) -> Vec<Advocate> {
    if filter.is_empty() {
        return advocates.to_vec();
    }
    advocates
        .iter()
        .filter(|advocate| filter.matches(advocate))
        .cloned()
        .collect()
}

/// Derives selector options from whatever records are loaded.
pub fn filter_options(advocates: &[Advocate]) -> FilterOptions {
    FilterOptions::from_labels(
        advocates.iter().map(|a| a.city.as_str()),
        advocates
            .iter()
            .flat_map(|a| a.specialties.iter().map(|s| s.as_str())),
    )
}
