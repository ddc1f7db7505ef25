//! Default value with optional per-season overrides
//!
//! Gauge ranges and THI thresholds share this shape: one value that always
//! exists plus up to four sparse overrides. A missing override falls back to
//! the default, never to another season's override. Presence is explicit, so
//! a zero-valued override is still an override.

use heapless::LinearMap;

use crate::season::Season;

/// Value resolved per season
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seasonal<T> {
    default: T,
    overrides: LinearMap<Season, T, 4>,
}

impl<T> Seasonal<T> {
    /// Value with no overrides
    pub fn new(default: T) -> Self {
        Self {
            default,
            overrides: LinearMap::new(),
        }
    }

    /// Builder form of [`Seasonal::set_override`]
    pub fn with_override(mut self, season: Season, value: T) -> Self {
        self.set_override(season, value);
        self
    }

    /// Set the override for a season, returning the one it replaced
    pub fn set_override(&mut self, season: Season, value: T) -> Option<T> {
        // Capacity equals the number of seasons, so insert cannot overflow
        self.overrides.insert(season, value).ok().flatten()
    }

    /// Drop a season's override
    pub fn clear_override(&mut self, season: Season) -> Option<T> {
        self.overrides.remove(&season)
    }

    /// The fallback value
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Override for a season, if one is defined
    pub fn override_for(&self, season: Season) -> Option<&T> {
        self.overrides.get(&season)
    }

    /// Defined overrides in season order
    pub fn overrides(&self) -> impl Iterator<Item = (Season, &T)> {
        Season::ALL
            .into_iter()
            .filter_map(move |season| self.override_for(season).map(|value| (season, value)))
    }

    /// Effective value: the season's override if `season` is given and one
    /// exists, otherwise the default
    pub fn resolve(&self, season: Option<Season>) -> &T {
        season
            .and_then(|season| self.overrides.get(&season))
            .unwrap_or(&self.default)
    }
}

impl<T: Default> Default for Seasonal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
