use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Choice, Question};

// -- Listing --

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub latest_question_list: Vec<Question>,
}

// -- Detail --

/// A choice as offered on the voting form, without its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: i64,
    pub choice_text: String,
}

impl From<&Choice> for ChoiceOption {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub question: Question,
    pub choices: Vec<ChoiceOption>,
    /// Set when a vote was rejected and the form is shown again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

// -- Results --

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub question: Question,
    pub choices: Vec<Choice>,
}

// -- Voting --

/// Form body of a vote submission. `choice` is kept as raw text so a
/// missing or garbled selector can be told apart from a transport error.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

impl VoteForm {
    /// The selected choice id, if one was submitted and is numeric.
    pub fn selected(&self) -> Option<i64> {
        self.choice.as_deref().and_then(|c| c.trim().parse().ok())
    }
}

// -- Admin --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub pub_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddChoiceRequest {
    pub choice_text: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_form_selected() {
        let form = VoteForm { choice: Some("12".into()) };
        assert_eq!(form.selected(), Some(12));

        let form = VoteForm { choice: Some(" 3 ".into()) };
        assert_eq!(form.selected(), Some(3));

        assert_eq!(VoteForm::default().selected(), None);
        assert_eq!(VoteForm { choice: Some("abc".into()) }.selected(), None);
        assert_eq!(VoteForm { choice: Some(String::new()) }.selected(), None);
    }

    #[test]
    fn detail_omits_empty_error_message() {
        let detail = DetailResponse {
            question: Question {
                id: 1,
                question_text: "q".into(),
                pub_date: Utc::now(),
            },
            choices: vec![],
            error_message: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("error_message").is_none());
    }

    #[test]
    fn create_question_rejects_unknown_fields() {
        let res: Result<CreateQuestionRequest, _> =
            serde_json::from_str(r#"{"question_text":"q","votes":3}"#);
        assert!(res.is_err());
    }
}
