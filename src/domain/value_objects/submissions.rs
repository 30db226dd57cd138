use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::submissions::Submission,
    value_objects::enums::submission_statuses::SubmissionStatus,
};

/// Intake payload for a new submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertSubmissionModel {
    pub alias: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

/// Outcome of an admin decision on a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streamer_id: Option<String>,
}

impl ProcessedSubmission {
    pub fn approved(submission: Submission, streamer_id: String) -> Self {
        Self {
            submission,
            status: SubmissionStatus::Approved,
            streamer_id: Some(streamer_id),
        }
    }

    pub fn rejected(submission: Submission) -> Self {
        Self {
            submission,
            status: SubmissionStatus::Rejected,
            streamer_id: None,
        }
    }
}

/// Trims, lowercases and de-duplicates language tags, keeping first-seen order.
pub fn normalize_languages(raw: Option<Vec<String>>) -> Option<Vec<String>> {
    let mut languages: Vec<String> = Vec::new();
    for tag in raw.unwrap_or_default() {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !languages.contains(&tag) {
            languages.push(tag);
        }
    }

    if languages.is_empty() {
        None
    } else {
        Some(languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn languages_are_cleaned() {
        let cleaned = normalize_languages(Some(vec![
            " EN ".to_string(),
            "ja".to_string(),
            "en".to_string(),
            "".to_string(),
        ]));
        assert_eq!(cleaned, Some(vec!["en".to_string(), "ja".to_string()]));
    }

    #[test]
    fn empty_language_list_becomes_none() {
        assert_eq!(normalize_languages(Some(vec![" ".to_string()])), None);
        assert_eq!(normalize_languages(None), None);
    }
}
