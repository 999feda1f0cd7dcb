use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Vocabulary entry a question can point at instead of carrying its own
/// text. Owned by the word feature; this module only reads it when
/// resolving a test's questions.
#[derive(Serialize, Deserialize, Clone)]
pub struct Word {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct WordResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl From<Word> for WordResponse {
    fn from(w: Word) -> Self {
        WordResponse {
            id: w.id.to_hex(),
            text: w.text,
            translation: w.translation,
        }
    }
}
