use serde::Serialize;

use super::domain::{PhotoSlot, SelectedFile};
use super::photos::PhotoStore;
use super::rules::ValidatedApplicant;

/// Body of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(SelectedFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: String,
    pub value: PartValue,
}

/// Multipart-style body handed to the submission sink. Built once per submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    parts: Vec<PayloadPart>,
}

impl SubmissionPayload {
    /// Non-empty applicant values followed by every slot that holds a file.
    pub fn assemble(applicant: &ValidatedApplicant, photos: &PhotoStore) -> Self {
        let mut parts: Vec<PayloadPart> = applicant
            .fields()
            .into_iter()
            .map(|(field, value)| PayloadPart {
                name: field.key().to_string(),
                value: PartValue::Text(value),
            })
            .collect();

        for (slot, photo) in photos.iter() {
            if let Some(file) = &photo.file {
                parts.push(PayloadPart {
                    name: slot.field_name().to_string(),
                    value: PartValue::File(file.clone()),
                });
            }
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, slot: PhotoSlot) -> Option<&SelectedFile> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::File(file) if part.name == slot.field_name() => Some(file),
            _ => None,
        })
    }

    pub fn text_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part.value, PartValue::Text(_)))
            .count()
    }

    pub fn file_count(&self) -> usize {
        self.parts.len() - self.text_count()
    }

    /// Loggable view: text values verbatim, files reduced to name, type, and size.
    pub fn summary(&self) -> PayloadSummary {
        PayloadSummary {
            parts: self
                .parts
                .iter()
                .map(|part| match &part.value {
                    PartValue::Text(value) => PartSummary {
                        name: part.name.clone(),
                        value: Some(value.clone()),
                        file_name: None,
                        content_type: None,
                        size: None,
                    },
                    PartValue::File(file) => PartSummary {
                        name: part.name.clone(),
                        value: None,
                        file_name: Some(file.name.clone()),
                        content_type: Some(file.content_type.clone()),
                        size: Some(file.size()),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadSummary {
    pub parts: Vec<PartSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}
