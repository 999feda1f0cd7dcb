use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::StoreError;
use crate::models::question::{AnswerKey, Question, ResolvedQuestion};
use crate::models::result::TestResult;
use crate::models::test::Test;

pub mod mongo;

#[cfg(test)]
pub mod memory;

/// Field set applied by a test update. `image` is only written when the
/// caller supplied one; the remaining fields always overwrite.
#[derive(Debug, Clone)]
pub struct TestUpdate {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub questions: Vec<ObjectId>,
}

#[async_trait]
pub trait TestStore: Send + Sync {
    /// Lists tests, restricted to public ones when `public_only` is set.
    async fn find(&self, public_only: bool) -> Result<Vec<Test>, StoreError>;

    async fn find_by_id(
        &self,
        id: ObjectId,
        public_only: bool,
    ) -> Result<Option<Test>, StoreError>;

    async fn insert(&self, test: &Test) -> Result<(), StoreError>;

    /// Applies the field set to one test by id. A missing document is not
    /// an error; the call succeeds without matching anything.
    async fn update_fields(&self, id: ObjectId, update: TestUpdate) -> Result<(), StoreError>;

    async fn set_public(&self, id: ObjectId, is_public: bool) -> Result<(), StoreError>;
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn insert(&self, question: &Question) -> Result<(), StoreError>;

    /// Plain documents for the given ids, in store order.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Question>, StoreError>;

    /// Answer-key projection for the given ids.
    async fn find_answer_keys(&self, ids: &[ObjectId]) -> Result<Vec<AnswerKey>, StoreError>;

    /// Documents for the given ids with their word references joined in.
    async fn find_resolved(&self, ids: &[ObjectId]) -> Result<Vec<ResolvedQuestion>, StoreError>;

    /// How many distinct documents exist among the given ids.
    async fn count_existing(&self, ids: &[ObjectId]) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn find_for_user(
        &self,
        user: ObjectId,
        tests: &[ObjectId],
    ) -> Result<Vec<TestResult>, StoreError>;

    async fn find_by_user_and_test(
        &self,
        user: ObjectId,
        test: ObjectId,
    ) -> Result<Option<TestResult>, StoreError>;

    async fn insert(&self, result: &TestResult) -> Result<(), StoreError>;
}
