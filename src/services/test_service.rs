use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bson::oid::ObjectId;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ApiError, FieldErrors};
use crate::models::question::{AnswerKey, Question, QuestionSpec};
use crate::models::result::{result_or_empty, ResultResponse, TestResult};
use crate::models::test::{Test, TestDetailResponse, TestListResponse, TestResponse};
use crate::store::{QuestionStore, ResultStore, TestStore, TestUpdate};
use crate::validation;

/// Cap on question writes in flight during bulk creation.
const QUESTION_WRITE_CONCURRENCY: usize = 30;

pub struct TestService {
    tests: Arc<dyn TestStore>,
    questions: Arc<dyn QuestionStore>,
    results: Arc<dyn ResultStore>,
}

/// `GET /tests` payload: tests plus the caller's results keyed by result id.
#[derive(Serialize, ToSchema)]
pub struct ListTestsResponse {
    pub tests: Vec<TestListResponse>,
    pub results: HashMap<String, ResultResponse>,
}

/// `GET /tests/{testId}` payload; `result` collapses to `{}` for anonymous
/// callers.
#[derive(Serialize, ToSchema)]
pub struct GetTestResponse {
    pub test: TestDetailResponse,
    #[serde(with = "result_or_empty")]
    pub result: Option<ResultResponse>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub is_success: bool,
}

impl TestService {
    pub fn new(
        tests: Arc<dyn TestStore>,
        questions: Arc<dyn QuestionStore>,
        results: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            tests,
            questions,
            results,
        }
    }

    pub async fn list_tests(
        &self,
        public_only: bool,
        user: Option<ObjectId>,
    ) -> Result<ListTestsResponse, ApiError> {
        let tests = self.tests.find(public_only).await?;

        let all_ids: Vec<ObjectId> = tests
            .iter()
            .flat_map(|test| test.questions.iter().copied())
            .collect();
        let keys: HashMap<ObjectId, AnswerKey> = self
            .questions
            .find_answer_keys(&all_ids)
            .await?
            .into_iter()
            .map(|key| (key.id, key))
            .collect();

        let mut results = HashMap::new();
        if let Some(user) = user {
            let test_ids: Vec<ObjectId> = tests.iter().map(|test| test.id).collect();
            for result in self.results.find_for_user(user, &test_ids).await? {
                results.insert(result.id.to_hex(), ResultResponse::from(result));
            }
        }

        let tests = tests
            .into_iter()
            .map(|test| {
                // Reference order drives the response; dangling references
                // drop out.
                let test_keys: Vec<AnswerKey> = test
                    .questions
                    .iter()
                    .filter_map(|id| keys.get(id).cloned())
                    .collect();
                TestListResponse::from((test, test_keys))
            })
            .collect();

        Ok(ListTestsResponse { tests, results })
    }

    pub async fn get_test(
        &self,
        id: ObjectId,
        public_only: bool,
        user: Option<ObjectId>,
    ) -> Result<GetTestResponse, ApiError> {
        let test = self
            .tests
            .find_by_id(id, public_only)
            .await?
            .ok_or(ApiError::NotFound("Test not found"))?;

        // First pass pulls the plain documents, dropping references that no
        // longer resolve; the second joins the word entities in. The
        // response keeps the second pass's order.
        let populated = self.questions.find_by_ids(&test.questions).await?;
        let ids: Vec<ObjectId> = populated.iter().map(|question| question.id).collect();
        let questions = self.questions.find_resolved(&ids).await?;

        let result = match user {
            Some(user) => Some(self.result_for(user, test.id).await?),
            None => None,
        };

        Ok(GetTestResponse {
            test: TestDetailResponse::from((test, questions)),
            result: result.map(ResultResponse::from),
        })
    }

    // Check-then-create: two racing first views by the same user can both
    // miss the lookup and insert duplicate results.
    async fn result_for(&self, user: ObjectId, test: ObjectId) -> Result<TestResult, ApiError> {
        if let Some(existing) = self.results.find_by_user_and_test(user, test).await? {
            return Ok(existing);
        }

        let created = TestResult::new(user, test);
        self.results.insert(&created).await?;
        Ok(created)
    }

    pub async fn create_test(&self, body: &Value) -> Result<TestResponse, ApiError> {
        let mut errors = FieldErrors::new();
        let fields = validation::collect_test_fields(body, &mut errors);
        let specs = validation::collect_question_specs(body, &mut errors);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let questions = self.create_questions(specs).await?;

        let test = Test {
            id: ObjectId::new(),
            title: fields.title,
            description: fields.description,
            image: fields.image,
            questions,
            is_public: false,
        };
        self.tests.insert(&test).await?;

        Ok(TestResponse::from(test))
    }

    /// Persists question specs with a bounded number of writes in flight.
    /// Completion order is arbitrary, so each write carries its input index
    /// and the reference list is sorted back into input order afterwards.
    async fn create_questions(&self, specs: Vec<QuestionSpec>) -> Result<Vec<ObjectId>, ApiError> {
        let mut indexed: Vec<(usize, ObjectId)> = stream::iter(specs.into_iter().enumerate())
            .map(|(index, spec)| async move {
                let question = Question::try_from(spec)?;
                self.questions.insert(&question).await?;
                Ok::<_, ApiError>((index, question.id))
            })
            .buffer_unordered(QUESTION_WRITE_CONCURRENCY)
            .try_collect()
            .await?;

        indexed.sort_unstable_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, id)| id).collect())
    }

    pub async fn update_test(&self, id: ObjectId, body: &Value) -> Result<SuccessResponse, ApiError> {
        let mut errors = FieldErrors::new();
        let fields = validation::collect_test_fields(body, &mut errors);
        let ids = validation::collect_question_ids(body, &mut errors);

        let questions = match ids {
            Some(ids) => {
                let questions = ids
                    .iter()
                    .map(|raw| ObjectId::parse_str(raw))
                    .collect::<Result<Vec<_>, _>>()?;

                // Existence is checked by count, so duplicates of existing
                // ids pass while any missing id fails the whole list.
                let distinct: HashSet<ObjectId> = questions.iter().copied().collect();
                let found = self.questions.count_existing(&questions).await?;
                if found != distinct.len() as u64 {
                    errors.insert("questions", "some questions cannot be found");
                }
                questions
            }
            None => Vec::new(),
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let update = TestUpdate {
            title: fields.title,
            description: fields.description,
            image: fields.image,
            questions,
        };
        self.tests.update_fields(id, update).await?;

        Ok(SuccessResponse { is_success: true })
    }

    pub async fn update_visibility(
        &self,
        id: ObjectId,
        body: &Value,
    ) -> Result<SuccessResponse, ApiError> {
        let Some(is_public) = validation::collect_is_public(body) else {
            let mut errors = FieldErrors::new();
            errors.insert("isPublic", "isPublic must be boolean");
            return Err(ApiError::Validation(errors));
        };

        self.tests.set_public(id, is_public).await?;
        Ok(SuccessResponse { is_success: true })
    }
}
