use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use portal_domain::service::FaqBook;

#[derive(Debug, Deserialize)]
pub struct FaqQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FaqResponse {
    #[serde(rename_all = "camelCase")]
    Answer {
        question: String,
        answer: String,
        matched: bool,
    },
    Suggestions {
        suggested: Vec<String>,
    },
}

/// Answer `q`, or list suggested questions when it is absent
pub async fn answer(Query(query): Query<FaqQuery>) -> Json<FaqResponse> {
    let book = FaqBook::builtin();
    let response = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => FaqResponse::Answer {
            question: question.to_string(),
            answer: book.find_answer(question).to_string(),
            matched: book.lookup(question).is_some(),
        },
        None => FaqResponse::Suggestions {
            suggested: book.suggested_questions().to_vec(),
        },
    };
    Json(response)
}
