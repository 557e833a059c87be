use serde::{Deserialize, Serialize};

/// Engine input. Assumed pre-validated: a present gestational week is in 1..=42.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomReport {
    pub symptoms: Vec<String>,
    pub gestational_week: Option<u32>,
    pub previous_complications: Option<bool>,
    pub additional_notes: Option<String>,
}

impl SymptomReport {
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_week(mut self, week: u32) -> Self {
        self.gestational_week = Some(week);
        self
    }

    pub fn with_previous_complications(mut self, flag: bool) -> Self {
        self.previous_complications = Some(flag);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.additional_notes = Some(notes.into());
        self
    }

    pub fn has_previous_complications(&self) -> bool {
        self.previous_complications.unwrap_or(false)
    }
}
