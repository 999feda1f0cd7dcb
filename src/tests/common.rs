use axum::body::{to_bytes, Body};
use axum::http::Response;
use axum::Router;
use bson::oid::ObjectId;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::models::question::Question;
use crate::models::test::Test;
use crate::routes::tests::test_routes;
use crate::services::test_service::TestService;
use crate::store::memory::{MemoryQuestionStore, MemoryResultStore, MemoryTestStore};
use crate::utils::generate_jwt;

pub struct TestStores {
    pub tests: Arc<MemoryTestStore>,
    pub questions: Arc<MemoryQuestionStore>,
    pub results: Arc<MemoryResultStore>,
}

pub struct TestContext {
    pub app: Router,
    pub stores: TestStores,
    jwt_secret: String,
}

/// Builds the router over fresh in-memory stores.
pub fn setup() -> TestContext {
    let config = Arc::new(Config {
        mongodb_uri: String::new(),
        jwt_secret: "test_secret".to_string(),
        port: 8001,
    });

    let tests = Arc::new(MemoryTestStore::default());
    let questions = Arc::new(MemoryQuestionStore::default());
    let results = Arc::new(MemoryResultStore::default());

    let service = Arc::new(TestService::new(
        tests.clone(),
        questions.clone(),
        results.clone(),
    ));
    let app = test_routes(service, config.clone());

    TestContext {
        app,
        stores: TestStores {
            tests,
            questions,
            results,
        },
        jwt_secret: config.jwt_secret.clone(),
    }
}

impl TestContext {
    /// Bearer token for the given user id.
    pub fn token_for(&self, user: ObjectId) -> String {
        generate_jwt(&user.to_hex(), "user", &self.jwt_secret)
    }
}

pub fn seed_question(
    ctx: &TestContext,
    text: &str,
    answers: &[&str],
    correct_answer: i32,
) -> Question {
    let question = Question {
        id: ObjectId::new(),
        text: Some(text.to_string()),
        word: None,
        answers: answers.iter().map(|answer| answer.to_string()).collect(),
        correct_answer,
    };
    ctx.stores.questions.put(question.clone());
    question
}

pub fn seed_test(
    ctx: &TestContext,
    title: &str,
    questions: Vec<ObjectId>,
    is_public: bool,
) -> Test {
    let test = Test {
        id: ObjectId::new(),
        title: title.to_string(),
        description: "seeded description".to_string(),
        image: None,
        questions,
        is_public,
    };
    ctx.stores.tests.put(test.clone());
    test
}

/// Helper to create a JSON body for requests.
pub fn json_body(json: &Value) -> Body {
    Body::from(json.to_string())
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
