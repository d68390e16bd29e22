use std::collections::HashMap;

use crate::color::random_color;
use crate::types::Rgb;

use super::SessionError;

/// Result of submitting a name to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    /// Nothing was submitted (empty or whitespace-only input).
    Blank,
}

/// Ordered, duplicate-free list of work elements with their display colors.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    names: Vec<String>,
    colors: HashMap<String, Rgb>,
}

impl ElementRegistry {
    pub fn add(&mut self, name: &str) -> Result<AddOutcome, SessionError> {
        self.add_with_color(name, random_color)
    }

    fn add_with_color(
        &mut self,
        name: &str,
        color: impl FnOnce() -> Rgb,
    ) -> Result<AddOutcome, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(AddOutcome::Blank);
        }
        if self.contains(name) {
            return Err(SessionError::DuplicateElement(name.to_string()));
        }
        self.names.push(name.to_string());
        self.colors.insert(name.to_string(), color());
        Ok(AddOutcome::Added(name.to_string()))
    }

    pub fn remove(&mut self, index: usize) -> Result<String, SessionError> {
        if index >= self.names.len() {
            return Err(SessionError::IndexOutOfBounds {
                index,
                len: self.names.len(),
            });
        }
        let name = self.names.remove(index);
        self.colors.remove(&name);
        Ok(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn color_of(&self, name: &str) -> Option<Rgb> {
        self.colors.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
