//! Profile set
//!
//! The working set of configurations shown side by side on the chart and
//! written by the spreadsheet export. Slot 0 is the base profile; further
//! slots are copies or factory maps.

use serde::{Deserialize, Serialize};

use crate::params::{presets, ParameterVector};

/// Most profiles shown at once, base profile included
pub const MAX_PROFILES: usize = 6;

/// One configuration on the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// User-visible name; unnamed profiles are labelled by position
    pub name: Option<String>,
    /// Settings charted for this profile
    pub params: ParameterVector,
    /// Shown on the chart and included in exports
    pub visible: bool,
}

impl Profile {
    /// Unnamed, visible profile
    pub fn new(params: ParameterVector) -> Self {
        Self {
            name: None,
            params,
            visible: true,
        }
    }

    /// Display name, falling back to "Config N" (1-based)
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Config {}", index + 1))
    }
}

/// Ordered profiles plus the one being edited. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
    selected: usize,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            profiles: vec![Profile::new(ParameterVector::default())],
            selected: 0,
        }
    }
}

impl ProfileSet {
    /// A set holding only the power-on profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of profiles, at least 1
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false; the base profile cannot be removed
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile at `index`
    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    /// Profiles in slot order
    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    /// Slot being edited
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Profile being edited
    pub fn selected(&self) -> &Profile {
        &self.profiles[self.selected]
    }

    /// Select a profile for editing. Returns false for an unknown index.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.profiles.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Replace the parameters of the selected profile
    pub fn set_selected_params(&mut self, params: ParameterVector) {
        self.profiles[self.selected].params = params;
    }

    /// Append a copy of the selected profile and select it.
    ///
    /// Returns the new index, or None when the set is full.
    pub fn add(&mut self) -> Option<usize> {
        if self.profiles.len() >= MAX_PROFILES {
            return None;
        }
        let params = self.selected().params;
        self.profiles.push(Profile::new(params));
        self.selected = self.profiles.len() - 1;
        Some(self.selected)
    }

    /// Back to the single base profile
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep the base profile and append every factory map, all visible
    pub fn load_presets(&mut self) {
        self.profiles.truncate(1);
        self.profiles[0].visible = true;
        for preset in presets() {
            self.profiles.push(Profile {
                name: Some(preset.name.to_string()),
                params: preset.params,
                visible: true,
            });
        }
        self.profiles.truncate(MAX_PROFILES);
        self.selected = 1;
    }

    /// Show a single factory map (0-based) with the base profile hidden.
    ///
    /// Returns false for an unknown map.
    pub fn load_preset(&mut self, index: usize) -> bool {
        let Some(preset) = presets().get(index).copied() else {
            return false;
        };
        self.profiles.truncate(1);
        self.profiles[0].visible = false;
        self.profiles.push(Profile {
            name: Some(preset.name.to_string()),
            params: preset.params,
            visible: true,
        });
        self.selected = 1;
        true
    }

    /// Flip a profile's visibility. Returns the new state.
    pub fn toggle_visibility(&mut self, index: usize) -> Option<bool> {
        let profile = self.profiles.get_mut(index)?;
        profile.visible = !profile.visible;
        Some(profile.visible)
    }

    /// Visible profiles with their indices
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Profile)> {
        self.profiles.iter().enumerate().filter(|(_, p)| p.visible)
    }
}
