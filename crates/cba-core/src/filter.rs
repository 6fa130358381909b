//! Client-side filtering of a recommendation set.
//!
//! Three independent equality filters (component, cost, ease), each either
//! `all` (no-op) or one exact value, combined with logical AND. Filtering is
//! derived state: it never triggers a fetch.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::models::{Component, Indicator, Level, UnknownValue};

/// One filter slot: either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue<T> {
    All,
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        FilterValue::All
    }
}

impl<T: PartialEq> FilterValue<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for FilterValue<T>
where
    T: FromStr<Err = UnknownValue>,
{
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(FilterValue::All)
        } else {
            s.parse().map(FilterValue::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for FilterValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::All => f.write_str("all"),
            FilterValue::Only(v) => write!(f, "{}", v),
        }
    }
}

impl<T: fmt::Display> Serialize for FilterValue<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The filter sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndicatorFilters {
    pub component: FilterValue<Component>,
    pub cost: FilterValue<Level>,
    pub ease: FilterValue<Level>,
}

impl IndicatorFilters {
    pub fn matches(&self, indicator: &Indicator) -> bool {
        self.component.accepts(&indicator.component)
            && self.cost.accepts(&indicator.cost)
            && self.ease.accepts(&indicator.ease)
    }

    /// Keep the indicators that pass every filter, preserving order.
    pub fn apply<'a>(&self, indicators: &'a [Indicator]) -> Vec<&'a Indicator> {
        indicators.iter().filter(|i| self.matches(i)).collect()
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == IndicatorFilters::default()
    }

    pub fn reset(&mut self) {
        *self = IndicatorFilters::default();
    }
}

/// Radio options shown for the component filter.
pub fn component_options() -> Vec<FilterValue<Component>> {
    std::iter::once(FilterValue::All)
        .chain(Component::ALL.into_iter().map(FilterValue::Only))
        .collect()
}

/// Radio options shown for the cost and ease filters.
pub fn level_options() -> Vec<FilterValue<Level>> {
    std::iter::once(FilterValue::All)
        .chain(Level::ALL.into_iter().map(FilterValue::Only))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_indicators;

    fn ids(v: &[&Indicator]) -> Vec<i64> {
        v.iter().map(|i| i.id).collect()
    }

    #[test]
    fn all_filters_are_noop() {
        let set = fallback_indicators();
        let f = IndicatorFilters::default();
        assert!(f.is_unfiltered());
        assert_eq!(ids(&f.apply(&set)), vec![47, 89, 12, 34]);
    }

    #[test]
    fn each_slot_filters_by_equality() {
        let set = fallback_indicators();

        let f = IndicatorFilters {
            component: FilterValue::Only(Component::Abiotic),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&set)), vec![89, 12]);

        let f = IndicatorFilters {
            cost: FilterValue::Only(Level::Low),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&set)), vec![89, 34]);

        let f = IndicatorFilters {
            ease: FilterValue::Only(Level::Medium),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&set)), vec![47]);
    }

    #[test]
    fn filters_combine_with_and() {
        let set = fallback_indicators();
        let f = IndicatorFilters {
            component: FilterValue::Only(Component::Abiotic),
            cost: FilterValue::Only(Level::Low),
            ease: FilterValue::Only(Level::High),
        };
        assert_eq!(ids(&f.apply(&set)), vec![89]);

        let none = IndicatorFilters {
            component: FilterValue::Only(Component::Biotic),
            cost: FilterValue::Only(Level::Low),
            ..Default::default()
        };
        assert!(none.apply(&set).is_empty());
    }

    #[test]
    fn every_result_satisfies_its_filter() {
        let set = fallback_indicators();
        for level in Level::ALL {
            let f = IndicatorFilters {
                cost: FilterValue::Only(level),
                ..Default::default()
            };
            let kept = f.apply(&set);
            assert!(kept.iter().all(|i| i.cost == level));
            let dropped = set.iter().filter(|i| i.cost != level).count();
            assert_eq!(kept.len() + dropped, set.len());
        }
    }

    #[test]
    fn parse_filter_values() {
        assert_eq!("all".parse::<FilterValue<Level>>().unwrap(), FilterValue::All);
        assert_eq!(
            "High".parse::<FilterValue<Level>>().unwrap(),
            FilterValue::Only(Level::High)
        );
        assert!("pricey".parse::<FilterValue<Level>>().is_err());
        assert_eq!(FilterValue::Only(Component::Biotic).to_string(), "Biotic");
    }

    #[test]
    fn reset_restores_all() {
        let mut f = IndicatorFilters {
            ease: FilterValue::Only(Level::Low),
            ..Default::default()
        };
        f.reset();
        assert!(f.is_unfiltered());
    }

    #[test]
    fn option_lists_start_with_all() {
        assert_eq!(component_options().len(), 4);
        assert_eq!(level_options()[0], FilterValue::All);
    }
}
