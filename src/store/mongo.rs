use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};

use crate::error::StoreError;
use crate::models::question::{AnswerKey, Question, ResolvedQuestion};
use crate::models::result::TestResult;
use crate::models::test::Test;
use crate::store::{QuestionStore, ResultStore, TestStore, TestUpdate};

pub struct MongoTestStore {
    collection: Collection<Test>,
}

impl MongoTestStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            collection: db.collection("tests"),
        }
    }
}

#[async_trait]
impl TestStore for MongoTestStore {
    async fn find(&self, public_only: bool) -> Result<Vec<Test>, StoreError> {
        let filter = if public_only {
            doc! { "isPublic": true }
        } else {
            doc! {}
        };

        let mut cursor = self.collection.find(filter).await?;
        let mut tests = Vec::new();
        while let Some(test) = cursor.try_next().await? {
            tests.push(test);
        }
        Ok(tests)
    }

    async fn find_by_id(
        &self,
        id: ObjectId,
        public_only: bool,
    ) -> Result<Option<Test>, StoreError> {
        let filter = if public_only {
            doc! { "_id": id, "isPublic": true }
        } else {
            doc! { "_id": id }
        };

        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert(&self, test: &Test) -> Result<(), StoreError> {
        self.collection.insert_one(test).await?;
        Ok(())
    }

    async fn update_fields(&self, id: ObjectId, update: TestUpdate) -> Result<(), StoreError> {
        let mut fields = doc! {
            "title": update.title,
            "description": update.description,
            "questions": update.questions,
        };
        if let Some(image) = update.image {
            fields.insert("image", image);
        }

        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(())
    }

    async fn set_public(&self, id: ObjectId, is_public: bool) -> Result<(), StoreError> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "isPublic": is_public } })
            .await?;
        Ok(())
    }
}

pub struct MongoQuestionStore {
    collection: Collection<Question>,
}

impl MongoQuestionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            collection: db.collection("questions"),
        }
    }
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
    async fn insert(&self, question: &Question) -> Result<(), StoreError> {
        self.collection.insert_one(question).await?;
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Question>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?;
        let mut questions = Vec::new();
        while let Some(question) = cursor.try_next().await? {
            questions.push(question);
        }
        Ok(questions)
    }

    async fn find_answer_keys(&self, ids: &[ObjectId]) -> Result<Vec<AnswerKey>, StoreError> {
        let mut cursor = self
            .collection
            .clone_with_type::<AnswerKey>()
            .find(doc! { "_id": { "$in": ids } })
            .projection(doc! { "correctAnswer": 1 })
            .await?;
        let mut keys = Vec::new();
        while let Some(key) = cursor.try_next().await? {
            keys.push(key);
        }
        Ok(keys)
    }

    async fn find_resolved(&self, ids: &[ObjectId]) -> Result<Vec<ResolvedQuestion>, StoreError> {
        let pipeline = vec![
            doc! { "$match": { "_id": { "$in": ids } } },
            doc! { "$lookup": {
                "from": "words",
                "localField": "word",
                "foreignField": "_id",
                "as": "word",
            } },
            doc! { "$set": { "word": { "$arrayElemAt": ["$word", 0] } } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut questions = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            questions.push(bson::from_document(document)?);
        }
        Ok(questions)
    }

    async fn count_existing(&self, ids: &[ObjectId]) -> Result<u64, StoreError> {
        Ok(self
            .collection
            .count_documents(doc! { "_id": { "$in": ids } })
            .await?)
    }
}

pub struct MongoResultStore {
    collection: Collection<TestResult>,
}

impl MongoResultStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            collection: db.collection("results"),
        }
    }
}

#[async_trait]
impl ResultStore for MongoResultStore {
    async fn find_for_user(
        &self,
        user: ObjectId,
        tests: &[ObjectId],
    ) -> Result<Vec<TestResult>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! { "user": user, "test": { "$in": tests } })
            .await?;
        let mut results = Vec::new();
        while let Some(result) = cursor.try_next().await? {
            results.push(result);
        }
        Ok(results)
    }

    async fn find_by_user_and_test(
        &self,
        user: ObjectId,
        test: ObjectId,
    ) -> Result<Option<TestResult>, StoreError> {
        Ok(self
            .collection
            .find_one(doc! { "user": user, "test": test })
            .await?)
    }

    async fn insert(&self, result: &TestResult) -> Result<(), StoreError> {
        self.collection.insert_one(result).await?;
        Ok(())
    }
}
