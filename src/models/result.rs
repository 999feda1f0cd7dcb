use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-user progress for one test. Created empty the first time an
/// authenticated user opens the test; answer entries are written by the
/// result-submission feature.
#[derive(Serialize, Deserialize, Clone)]
pub struct TestResult {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub test: ObjectId,
    pub answers: Vec<ResultAnswer>,
    pub score: i32,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ResultAnswer {
    pub question: ObjectId,
    pub answer: i32,
    pub correct: bool,
}

impl TestResult {
    /// Empty progress record for a (user, test) pair.
    pub fn new(user: ObjectId, test: ObjectId) -> Self {
        TestResult {
            id: ObjectId::new(),
            user,
            test,
            answers: Vec::new(),
            score: 0,
        }
    }
}

/// Response DTO (server → client)
#[derive(Serialize, ToSchema)]
pub struct ResultResponse {
    pub id: String,
    pub user: String,
    pub test: String,
    pub answers: Vec<ResultAnswerResponse>,
    pub score: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ResultAnswerResponse {
    pub question: String,
    pub answer: i32,
    pub correct: bool,
}

impl From<TestResult> for ResultResponse {
    fn from(result: TestResult) -> Self {
        ResultResponse {
            id: result.id.to_hex(),
            user: result.user.to_hex(),
            test: result.test.to_hex(),
            answers: result
                .answers
                .into_iter()
                .map(ResultAnswerResponse::from)
                .collect(),
            score: result.score,
        }
    }
}

impl From<ResultAnswer> for ResultAnswerResponse {
    fn from(answer: ResultAnswer) -> Self {
        ResultAnswerResponse {
            question: answer.question.to_hex(),
            answer: answer.answer,
            correct: answer.correct,
        }
    }
}

/// Serializes a missing result as `{}` so anonymous callers still get an
/// object in the payload.
pub mod result_or_empty {
    use serde::ser::{SerializeMap, Serializer};
    use serde::Serialize;

    use super::ResultResponse;

    pub fn serialize<S>(
        result: &Option<ResultResponse>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match result {
            Some(result) => result.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}
