use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::word::{Word, WordResponse};

/// DB model (internal, used for Mongo)
#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<ObjectId>,
    pub answers: Vec<String>,
    pub correct_answer: i32,
}

/// Validated question payload from a create-test body. The word reference
/// stays a raw hex string here and is cast when the document is built.
#[derive(Debug, Default, Clone)]
pub struct QuestionSpec {
    pub text: Option<String>,
    pub word: Option<String>,
    pub answers: Vec<String>,
    pub correct_answer: i32,
}

impl TryFrom<QuestionSpec> for Question {
    type Error = bson::oid::Error;

    fn try_from(spec: QuestionSpec) -> Result<Self, Self::Error> {
        let word = spec.word.as_deref().map(ObjectId::parse_str).transpose()?;

        Ok(Question {
            id: ObjectId::new(),
            text: spec.text,
            word,
            answers: spec.answers,
            correct_answer: spec.correct_answer,
        })
    }
}

/// Projection of a question down to its answer key, for listings.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKey {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub correct_answer: i32,
}

/// Question with its word reference joined in, as produced by the full
/// resolution pass of get-test.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuestion {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: Option<String>,
    pub word: Option<Word>,
    pub answers: Vec<String>,
    pub correct_answer: i32,
}

/// Response DTO (server → client)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<WordResponse>,
    pub answers: Vec<String>,
    pub correct_answer: i32,
}

impl From<ResolvedQuestion> for QuestionResponse {
    fn from(q: ResolvedQuestion) -> Self {
        QuestionResponse {
            id: q.id.to_hex(),
            text: q.text,
            word: q.word.map(WordResponse::from),
            answers: q.answers,
            correct_answer: q.correct_answer,
        }
    }
}

/// Answer-key response used by the listing, which never ships full
/// question bodies.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKeyResponse {
    pub id: String,
    pub correct_answer: i32,
}

impl From<AnswerKey> for AnswerKeyResponse {
    fn from(key: AnswerKey) -> Self {
        AnswerKeyResponse {
            id: key.id.to_hex(),
            correct_answer: key.correct_answer,
        }
    }
}
