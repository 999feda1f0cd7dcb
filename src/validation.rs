use serde_json::Value;
use url::Url;

use crate::error::FieldErrors;
use crate::models::question::QuestionSpec;

/// Common test fields collected from a create or update body.
pub struct TestFields {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

/// Collects title, description and image, recording one message per failing
/// field. Failing fields come back empty; the caller rejects the request
/// before using them.
pub fn collect_test_fields(body: &Value, errors: &mut FieldErrors) -> TestFields {
    let title = match body.get("title").and_then(Value::as_str) {
        Some(title) if title.chars().count() >= 3 => title.to_string(),
        _ => {
            errors.insert("title", "title is invalid");
            String::new()
        }
    };

    let description = match body.get("description").and_then(Value::as_str) {
        Some(description) if description.chars().count() >= 3 => description.to_string(),
        _ => {
            errors.insert("description", "description is invalid");
            String::new()
        }
    };

    let image = match body.get("image") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.is_empty() => None,
        Some(value) => {
            let raw = match value.as_str() {
                Some(raw) => raw.to_string(),
                None => value.to_string(),
            };
            if Url::parse(&raw).is_ok() {
                Some(raw)
            } else {
                errors.insert("image", "image is not URL");
                None
            }
        }
    };

    TestFields {
        title,
        description,
        image,
    }
}

/// Collects the nested question specs of a create body. Each entry is
/// checked in order (text or word, answers array, integer correctAnswer)
/// and stops at its first failing rule; entries share the `questions` error
/// key, so a later entry's message replaces an earlier one.
pub fn collect_question_specs(body: &Value, errors: &mut FieldErrors) -> Vec<QuestionSpec> {
    let entries = match body.get("questions") {
        Some(Value::Array(entries)) => entries,
        _ => {
            errors.insert("questions", "questions is not array");
            return Vec::new();
        }
    };

    let mut specs = Vec::with_capacity(entries.len());
    for entry in entries {
        let text = entry
            .get("text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        let word = entry
            .get("word")
            .and_then(Value::as_str)
            .filter(|word| !word.is_empty())
            .map(str::to_string);
        let answers = entry.get("answers").and_then(Value::as_array);
        let correct_answer = parse_integer(entry.get("correctAnswer"));

        if text.is_none() && word.is_none() {
            errors.insert("questions", "question is required word or text");
        } else if answers.is_none() {
            errors.insert("questions", "answers is invalid");
        } else if correct_answer.is_none() {
            errors.insert("questions", "correctAnswer must be integer");
        }

        specs.push(QuestionSpec {
            text,
            word,
            answers: answers.map(|answers| collect_strings(answers)).unwrap_or_default(),
            correct_answer: correct_answer.unwrap_or_default(),
        });
    }
    specs
}

/// Collects the question-id list of an update body. Returns `None` when the
/// field is not an array; id format is not checked here.
pub fn collect_question_ids(body: &Value, errors: &mut FieldErrors) -> Option<Vec<String>> {
    match body.get("questions") {
        Some(Value::Array(entries)) => Some(collect_strings(entries)),
        _ => {
            errors.insert("questions", "questions is not array");
            None
        }
    }
}

/// Accepts only a JSON boolean.
pub fn collect_is_public(body: &Value) -> Option<bool> {
    match body.get("isPublic") {
        Some(Value::Bool(flag)) => Some(*flag),
        _ => None,
    }
}

/// Boolean-ish query flags: `true` and `1` count, anything else does not.
pub fn is_truthy(value: &str) -> bool {
    matches!(value, "true" | "1")
}

fn parse_integer(value: Option<&Value>) -> Option<i32> {
    match value {
        Some(Value::Number(number)) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Some(Value::String(raw)) => raw.parse().ok(),
        _ => None,
    }
}

fn collect_strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|value| match value.as_str() {
            Some(raw) => raw.to_string(),
            None => value.to_string(),
        })
        .collect()
}
