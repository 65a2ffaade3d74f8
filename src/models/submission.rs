use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One captured signup, as persisted in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub email: String,
    pub form_id: String,
    pub timestamp: String,
}

impl Submission {
    pub fn new(email: impl Into<String>, form_id: impl Into<String>) -> Self {
        Self::at(email, form_id, Utc::now())
    }

    pub fn at(email: impl Into<String>, form_id: impl Into<String>, when: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            form_id: form_id.into(),
            timestamp: when.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// JSON body sent to the remote form endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload<'a> {
    pub email: &'a str,
    pub form_id: &'a str,
    pub timestamp: &'a str,
    pub source: &'a str,
}

impl<'a> SubmissionPayload<'a> {
    pub fn new(submission: &'a Submission, source: &'a str) -> Self {
        Self {
            email: &submission.email,
            form_id: &submission.form_id,
            timestamp: &submission.timestamp,
            source,
        }
    }
}
