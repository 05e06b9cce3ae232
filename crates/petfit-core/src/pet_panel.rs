use thiserror::Error;

use crate::page::PetProfile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_pet_id: Option<String>,
    pub selected_has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("unknown pet profile '{0}'")]
    UnknownPet(String),
}

#[derive(Debug, Clone)]
pub struct PetSelectionPanel {
    profiles: Vec<PetProfile>,
    active: Option<usize>,
    cursor: usize,
    warning_visible: bool,
}

impl PetSelectionPanel {
    pub fn new(profiles: Vec<PetProfile>) -> Self {
        Self {
            profiles,
            active: None,
            cursor: 0,
            warning_visible: false,
        }
    }

    pub fn select(&mut self, pet_id: &str) -> Result<(), PanelError> {
        let index = self
            .profiles
            .iter()
            .position(|profile| profile.id == pet_id)
            .ok_or_else(|| PanelError::UnknownPet(pet_id.to_string()))?;
        self.activate(index);
        Ok(())
    }

    pub fn current(&self) -> SelectionState {
        match self.active.and_then(|index| self.profiles.get(index)) {
            Some(profile) => SelectionState {
                selected_pet_id: Some(profile.id.clone()),
                selected_has_image: profile.has_image,
            },
            None => SelectionState::default(),
        }
    }

    /// Selects the first profile when nothing is selected yet.
    pub fn ensure_default(&mut self) {
        if self.active.is_none() && !self.profiles.is_empty() {
            self.activate(0);
        }
    }

    pub fn select_cursor(&mut self) {
        if self.cursor < self.profiles.len() {
            self.activate(self.cursor);
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.profiles.len() {
            self.cursor += 1;
        }
    }

    pub fn show_warning(&mut self) {
        self.warning_visible = true;
    }

    pub fn warning_visible(&self) -> bool {
        self.warning_visible
    }

    pub fn profiles(&self) -> &[PetProfile] {
        &self.profiles
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn activate(&mut self, index: usize) {
        self.active = Some(index);
        self.cursor = index;
        self.warning_visible = !self.profiles[index].has_image;
    }
}
