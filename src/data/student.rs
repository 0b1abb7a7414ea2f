use serde::{Deserialize, Serialize};

/// Who took the test. Every field is free text straight from the form and is only ever displayed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub first_name: String,
    pub surname: String,
    pub group: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub student_info: StudentInfo,
    pub set_name: String,
}
