//! Type exclusion filters.
//!
//! A complex node's properties are only validated when no registered filter
//! excludes the node's underlying type. The built-in [`SimpleTypesFilter`]
//! excludes the well-known primitive-like types that carry no properties
//! worth descending into, even when metadata claims otherwise.

use std::any::TypeId;
use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

/// Decides whether a type is excluded from property-level validation.
pub trait ExcludeFilter: Send + Sync {
    /// Returns true if values of `type_id` should not have their properties
    /// validated.
    fn is_type_excluded(&self, type_id: TypeId) -> bool;
}

/// Excludes well-known simple types from deep property validation.
///
/// Covers the primitive numerics, `bool`, `char`, text, [`Decimal`], the
/// `chrono` date and time types, [`Uuid`], durations, and [`Url`]. Each type
/// is excluded together with its `Option` wrapper, so a nullable simple type
/// is treated the same as the type itself.
///
/// # Example
///
/// ```rust
/// use std::any::TypeId;
/// use walkabout::{ExcludeFilter, SimpleTypesFilter};
///
/// let filter = SimpleTypesFilter::new();
/// assert!(filter.is_type_excluded(TypeId::of::<i32>()));
/// assert!(filter.is_type_excluded(TypeId::of::<Option<i32>>()));
///
/// struct Custom;
/// assert!(!filter.is_type_excluded(TypeId::of::<Custom>()));
/// ```
pub struct SimpleTypesFilter {
    excluded: HashSet<TypeId>,
}

impl SimpleTypesFilter {
    /// Creates a filter covering the default set of simple types.
    pub fn new() -> Self {
        let mut filter = Self {
            excluded: HashSet::new(),
        };

        filter.exclude::<bool>();
        filter.exclude::<char>();
        filter.exclude::<i8>();
        filter.exclude::<i16>();
        filter.exclude::<i32>();
        filter.exclude::<i64>();
        filter.exclude::<i128>();
        filter.exclude::<isize>();
        filter.exclude::<u8>();
        filter.exclude::<u16>();
        filter.exclude::<u32>();
        filter.exclude::<u64>();
        filter.exclude::<u128>();
        filter.exclude::<usize>();
        filter.exclude::<f32>();
        filter.exclude::<f64>();
        filter.exclude::<String>();
        filter.exclude::<&'static str>();
        filter.exclude::<Decimal>();
        filter.exclude::<NaiveDate>();
        filter.exclude::<NaiveDateTime>();
        filter.exclude::<DateTime<Utc>>();
        filter.exclude::<DateTime<FixedOffset>>();
        filter.exclude::<Uuid>();
        filter.exclude::<chrono::Duration>();
        filter.exclude::<Duration>();
        filter.exclude::<Url>();

        filter
    }

    /// Excludes `T` and `Option<T>`.
    ///
    /// Registering the `Option` wrapper alongside the type is the nullable
    /// unwrap: an optional simple type is excluded exactly like its
    /// underlying type.
    pub fn exclude<T: 'static>(&mut self) {
        self.excluded.insert(TypeId::of::<T>());
        self.excluded.insert(TypeId::of::<Option<T>>());
    }
}

impl Default for SimpleTypesFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcludeFilter for SimpleTypesFilter {
    fn is_type_excluded(&self, type_id: TypeId) -> bool {
        self.excluded.contains(&type_id)
    }
}
