use std::{collections::HashMap, rc::Rc};

use log::{info, warn};

use crate::appearance::{
    error::AppearanceError,
    state_set::{StateIndex, StateSet},
    theme::{StyleMap, Theme},
};

type CacheKey = (String, String, String);

/// Memoized style lookups for the active theme.
///
/// Results, including "no style", are cached per
/// `(theme, appearance id, canonical state key)` and handed out as shared
/// `Rc`s, so repeated lookups return the very same map.
pub struct AppearanceCache {
    theme: Option<Rc<Theme>>,
    strict: bool,
    state_index: StateIndex,
    cache: HashMap<CacheKey, Option<Rc<StyleMap>>>,
}

impl AppearanceCache {
    pub fn new(strict: bool) -> Self {
        Self {
            theme: None,
            strict,
            state_index: StateIndex::new(),
            cache: HashMap::new(),
        }
    }

    pub fn theme(&self) -> Option<&Rc<Theme>> {
        self.theme.as_ref()
    }

    /// Switches the active theme and drops every cached result
    pub fn set_theme(&mut self, theme: Rc<Theme>) {
        info!(
            "AppearanceCache: Switching to theme {}, dropping {} cached styles",
            theme.name(),
            self.cache.len()
        );
        self.theme = Some(theme);
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn style_from(
        &mut self,
        id: &str,
        states: &StateSet,
    ) -> Result<Option<Rc<StyleMap>>, AppearanceError> {
        let Some(theme) = self.theme.clone() else {
            if self.strict {
                return Err(AppearanceError::NoTheme { id: id.to_string() });
            }
            warn!("AppearanceCache: No theme set, {} resolves to no style", id);
            return Ok(None);
        };

        let key = (
            theme.name().to_string(),
            id.to_string(),
            self.state_index.key_for(states),
        );
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let resolved = match self.resolve(&theme, id, states, &mut Vec::new()) {
            Ok(style) => Some(Rc::new(style)),
            Err(error) if self.strict => return Err(error),
            Err(error) => {
                warn!("AppearanceCache: {}, using no style", error);
                None
            }
        };

        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    fn resolve(
        &self,
        theme: &Rc<Theme>,
        id: &str,
        states: &StateSet,
        visiting: &mut Vec<(String, String)>,
    ) -> Result<StyleMap, AppearanceError> {
        let Some(appearance) = theme.get(id) else {
            return match theme.base_theme() {
                Some(base) if base.defines(id) => self.resolve(base, id, states, visiting),
                _ => Err(AppearanceError::UndefinedAppearance {
                    theme: theme.name().to_string(),
                    id: id.to_string(),
                }),
            };
        };

        let marker = (theme.name().to_string(), id.to_string());
        if visiting.contains(&marker) {
            return Err(AppearanceError::IncludeCycle {
                theme: marker.0,
                id: marker.1,
            });
        }
        visiting.push(marker);

        let mut merged = StyleMap::new();

        if appearance.merges_base() {
            if let Some(base) = theme.base_theme().filter(|base| base.defines(id)) {
                // a fresh path: the base theme may legitimately reuse this id
                let base_style = self.resolve(base, id, states, &mut Vec::new())?;
                merged.extend(base_style);
            }
        }

        if let Some(include) = appearance.included() {
            match self.resolve(theme, include, states, visiting) {
                Ok(included) => merged.extend(included),
                Err(AppearanceError::UndefinedAppearance { .. }) if !self.strict => {
                    warn!(
                        "AppearanceCache: {} includes undefined appearance {}",
                        id, include
                    );
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(style) = appearance.style_fn() {
            merged.extend(style(states));
        }

        visiting.pop();
        Ok(merged)
    }
}
