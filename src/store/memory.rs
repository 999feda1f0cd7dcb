use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::StoreError;
use crate::models::question::{AnswerKey, Question, ResolvedQuestion};
use crate::models::result::TestResult;
use crate::models::test::Test;
use crate::models::word::Word;
use crate::store::{QuestionStore, ResultStore, TestStore, TestUpdate};

// In-memory stand-ins for the Mongo stores. Iteration runs in id order,
// which usually differs from insertion order, like an unindexed collection
// scan would.

#[derive(Default)]
pub struct MemoryTestStore {
    tests: Mutex<BTreeMap<ObjectId, Test>>,
    fail: AtomicBool,
}

impl MemoryTestStore {
    /// Makes the next store call fail with `StoreError::Unavailable`.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("tests"));
        }
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<Test> {
        self.tests.lock().unwrap().get(&id).cloned()
    }

    pub fn put(&self, test: Test) {
        self.tests.lock().unwrap().insert(test.id, test);
    }

    pub fn count(&self) -> usize {
        self.tests.lock().unwrap().len()
    }
}

#[async_trait]
impl TestStore for MemoryTestStore {
    async fn find(&self, public_only: bool) -> Result<Vec<Test>, StoreError> {
        self.check()?;
        let tests = self.tests.lock().unwrap();
        Ok(tests
            .values()
            .filter(|test| !public_only || test.is_public)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: ObjectId,
        public_only: bool,
    ) -> Result<Option<Test>, StoreError> {
        self.check()?;
        let tests = self.tests.lock().unwrap();
        Ok(tests
            .get(&id)
            .filter(|test| !public_only || test.is_public)
            .cloned())
    }

    async fn insert(&self, test: &Test) -> Result<(), StoreError> {
        self.check()?;
        self.tests.lock().unwrap().insert(test.id, test.clone());
        Ok(())
    }

    async fn update_fields(&self, id: ObjectId, update: TestUpdate) -> Result<(), StoreError> {
        self.check()?;
        let mut tests = self.tests.lock().unwrap();
        if let Some(test) = tests.get_mut(&id) {
            test.title = update.title;
            test.description = update.description;
            if let Some(image) = update.image {
                test.image = Some(image);
            }
            test.questions = update.questions;
        }
        Ok(())
    }

    async fn set_public(&self, id: ObjectId, is_public: bool) -> Result<(), StoreError> {
        self.check()?;
        if let Some(test) = self.tests.lock().unwrap().get_mut(&id) {
            test.is_public = is_public;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryQuestionStore {
    questions: Mutex<BTreeMap<ObjectId, Question>>,
    words: Mutex<BTreeMap<ObjectId, Word>>,
    fail: AtomicBool,
}

impl MemoryQuestionStore {
    /// Makes the next store call fail with `StoreError::Unavailable`.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("questions"));
        }
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<Question> {
        self.questions.lock().unwrap().get(&id).cloned()
    }

    pub fn put(&self, question: Question) {
        self.questions.lock().unwrap().insert(question.id, question);
    }

    pub fn put_word(&self, word: Word) {
        self.words.lock().unwrap().insert(word.id, word);
    }

    pub fn count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn insert(&self, question: &Question) -> Result<(), StoreError> {
        self.check()?;
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Question>, StoreError> {
        self.check()?;
        let questions = self.questions.lock().unwrap();
        Ok(questions
            .values()
            .filter(|question| ids.contains(&question.id))
            .cloned()
            .collect())
    }

    async fn find_answer_keys(&self, ids: &[ObjectId]) -> Result<Vec<AnswerKey>, StoreError> {
        self.check()?;
        let questions = self.questions.lock().unwrap();
        Ok(questions
            .values()
            .filter(|question| ids.contains(&question.id))
            .map(|question| AnswerKey {
                id: question.id,
                correct_answer: question.correct_answer,
            })
            .collect())
    }

    async fn find_resolved(&self, ids: &[ObjectId]) -> Result<Vec<ResolvedQuestion>, StoreError> {
        self.check()?;
        let questions = self.questions.lock().unwrap();
        let words = self.words.lock().unwrap();
        Ok(questions
            .values()
            .filter(|question| ids.contains(&question.id))
            .map(|question| ResolvedQuestion {
                id: question.id,
                text: question.text.clone(),
                word: question.word.and_then(|id| words.get(&id).cloned()),
                answers: question.answers.clone(),
                correct_answer: question.correct_answer,
            })
            .collect())
    }

    async fn count_existing(&self, ids: &[ObjectId]) -> Result<u64, StoreError> {
        self.check()?;
        let questions = self.questions.lock().unwrap();
        Ok(questions.keys().filter(|id| ids.contains(id)).count() as u64)
    }
}

#[derive(Default)]
pub struct MemoryResultStore {
    results: Mutex<BTreeMap<ObjectId, TestResult>>,
    fail: AtomicBool,
}

impl MemoryResultStore {
    /// Makes the next store call fail with `StoreError::Unavailable`.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("results"));
        }
        Ok(())
    }

    pub fn put(&self, result: TestResult) {
        self.results.lock().unwrap().insert(result.id, result);
    }

    pub fn count(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    pub fn get_for(&self, user: ObjectId, test: ObjectId) -> Option<TestResult> {
        self.results
            .lock()
            .unwrap()
            .values()
            .find(|result| result.user == user && result.test == test)
            .cloned()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn find_for_user(
        &self,
        user: ObjectId,
        tests: &[ObjectId],
    ) -> Result<Vec<TestResult>, StoreError> {
        self.check()?;
        let results = self.results.lock().unwrap();
        Ok(results
            .values()
            .filter(|result| result.user == user && tests.contains(&result.test))
            .cloned()
            .collect())
    }

    async fn find_by_user_and_test(
        &self,
        user: ObjectId,
        test: ObjectId,
    ) -> Result<Option<TestResult>, StoreError> {
        self.check()?;
        let results = self.results.lock().unwrap();
        Ok(results
            .values()
            .find(|result| result.user == user && result.test == test)
            .cloned())
    }

    async fn insert(&self, result: &TestResult) -> Result<(), StoreError> {
        self.check()?;
        self.results
            .lock()
            .unwrap()
            .insert(result.id, result.clone());
        Ok(())
    }
}
