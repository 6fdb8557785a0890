use serde::{Deserialize, Serialize};

/// Operating mode of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    /// Plain task tracking, no restrictions
    #[serde(rename = "normal")]
    Normal,
    /// Focus mode: new tasks carry a time limit and the window locks while one runs
    #[serde(rename = "study_mode")]
    Focus,
}

impl Default for StudyMode {
    fn default() -> Self {
        StudyMode::Normal
    }
}

impl StudyMode {
    /// Parse mode from its persisted tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "study_mode" | "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    /// Get the display name for this mode
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Focus => "Focus",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Normal => Self::Focus,
            Self::Focus => Self::Normal,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    AddingMistake,
    Notice,        // Blocking message, dismissed with Enter/Esc
    ConfirmQuit,   // Close was allowed, ask before leaving
    ConfirmDelete, // Ask before deleting the selected task
    Unlock,        // Password dialog shown over the lock screen
}

/// Which tab of the main view is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Pending,
    Completed,
    Mistakes,
    Stats,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Pending => "Pending",
            Tab::Completed => "Completed",
            Tab::Mistakes => "Mistakes",
            Tab::Stats => "Stats",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Pending => Tab::Completed,
            Tab::Completed => Tab::Mistakes,
            Tab::Mistakes => Tab::Stats,
            Tab::Stats => Tab::Pending,
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Pending, Tab::Completed, Tab::Mistakes, Tab::Stats]
    }
}
