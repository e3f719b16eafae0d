use std::collections::{HashMap, HashSet};

/// Unordered set of boolean widget states that are currently on
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSet {
    states: HashSet<String>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, state: &str) -> Self {
        self.insert(state);
        self
    }

    pub fn insert(&mut self, state: &str) -> bool {
        self.states.insert(state.to_string())
    }

    pub fn remove(&mut self, state: &str) -> bool {
        self.states.remove(state)
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for StateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Hands out a stable number to every state name on first sight, so that
/// equal sets map to equal keys regardless of insertion order
#[derive(Default)]
pub struct StateIndex {
    indices: HashMap<String, u32>,
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_of(&mut self, state: &str) -> u32 {
        let next = self.indices.len() as u32;
        *self.indices.entry(state.to_string()).or_insert(next)
    }

    pub fn key_for(&mut self, states: &StateSet) -> String {
        let mut indices: Vec<u32> = states.iter().map(|state| self.index_of(state)).collect();
        indices.sort_unstable();
        indices
            .iter()
            .map(u32::to_string)
            .collect::<Vec<String>>()
            .join(",")
    }
}
