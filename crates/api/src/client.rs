//! `reqwest` implementation of the gateway traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use prep_core::model::{
    AttemptEntry, AttemptId, AttemptRecord, Difficulty, Exam, ExamId, NewUser, Question,
    RetrySeed, ScoreSummary, Section, SectionId, SyllabusId, SyllabusTopic, UserId, UserProfile,
};

use crate::config::ApiConfig;
use crate::dto::{
    self, AnswerUpdateRequest, AttemptEntryDto, AttemptRecordDto, ExamDto, FinishRequest,
    FinishResponse, LoginRequest, QuestionDto, RegisterRequest, SectionDto, StartAttemptRequest,
    StartAttemptResponse, SyllabusDto, UserDto,
};
use crate::envelope::{decode_item, decode_list};
use crate::error::ApiError;
use crate::gateway::{AttemptGateway, AuthGateway, CatalogGateway};

/// The real remote service, spoken to over JSON/HTTPS.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_value(&self, url: String) -> Result<Value, ApiError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn post_value<B: Serialize>(&self, url: String, body: &B) -> Result<Value, ApiError> {
        let response = self.client.post(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn put_value<B: Serialize>(&self, url: String, body: &B) -> Result<Value, ApiError> {
        let response = self.client.put(url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    fn questions_from(value: Value) -> Result<Vec<Question>, ApiError> {
        let dtos: Vec<QuestionDto> = decode_list(value, "questions")?;
        dtos.into_iter()
            .map(|dto| dto.into_question().map_err(ApiError::from))
            .collect()
    }
}

#[async_trait]
impl CatalogGateway for HttpApi {
    async fn list_exams(&self) -> Result<Vec<Exam>, ApiError> {
        let value = self.get_value(self.config.exams_url()).await?;
        let dtos: Vec<ExamDto> = decode_list(value, "exams")?;
        dtos.into_iter()
            .map(|dto| dto.into_exam().map_err(ApiError::from))
            .collect()
    }

    async fn list_sections(&self, exam: ExamId) -> Result<Vec<Section>, ApiError> {
        let value = self.get_value(self.config.exam_sections_url(exam)).await?;
        let dtos: Vec<SectionDto> = decode_list(value, "sections")?;
        dtos.into_iter()
            .map(|dto| dto.into_section().map_err(ApiError::from))
            .collect()
    }

    async fn list_topics(&self, section: SectionId) -> Result<Vec<SyllabusTopic>, ApiError> {
        let value = self
            .get_value(self.config.section_syllabus_url(section))
            .await?;
        let dtos: Vec<SyllabusDto> = decode_list(value, "syllabus")?;
        dtos.into_iter()
            .map(|dto| dto.into_topic().map_err(ApiError::from))
            .collect()
    }

    async fn syllabus_questions(
        &self,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ApiError> {
        let url = format!(
            "{}?difficulty={}",
            self.config.syllabus_questions_url(syllabus),
            difficulty.as_str()
        );
        let questions = Self::questions_from(self.get_value(url).await?)?;
        // The difficulty filter is also applied server-side; filtering again
        // keeps the set honest when the server ignores the query parameter.
        Ok(questions
            .into_iter()
            .filter(|question| question.difficulty() == difficulty)
            .collect())
    }

    async fn section_questions(&self, section: SectionId) -> Result<Vec<Question>, ApiError> {
        let value = self
            .get_value(self.config.section_questions_url(section))
            .await?;
        Self::questions_from(value)
    }
}

#[async_trait]
impl AttemptGateway for HttpApi {
    async fn start_attempt(&self, seed: &RetrySeed) -> Result<AttemptId, ApiError> {
        let body = StartAttemptRequest::from(seed);
        let value = self
            .post_value(self.config.start_attempt_url(), &body)
            .await?;
        let response: StartAttemptResponse = decode_item(value)?;
        Ok(response.attempt_id()?)
    }

    async fn push_entry(
        &self,
        attempt: AttemptId,
        entry: &AttemptEntry,
    ) -> Result<Vec<AttemptEntry>, ApiError> {
        let body = AnswerUpdateRequest::from(entry);
        let value = self
            .put_value(self.config.attempt_detail_url(attempt), &body)
            .await?;
        let dtos: Vec<AttemptEntryDto> = decode_list(value, "attempt_details")?;
        Ok(dto::into_entries(dtos)?)
    }

    async fn finish_attempt(
        &self,
        attempt: AttemptId,
        summary: &ScoreSummary,
        end_time: DateTime<Utc>,
    ) -> Result<Option<RetrySeed>, ApiError> {
        let body = FinishRequest {
            score: summary.score(),
            total_time: summary.elapsed_seconds(),
            end_time,
        };
        let value = self
            .put_value(self.config.attempt_finish_url(attempt), &body)
            .await?;
        let response: FinishResponse = decode_item(value)?;
        Ok(response.retry_seed()?)
    }

    async fn list_attempts(
        &self,
        user: UserId,
        page: u32,
    ) -> Result<Vec<AttemptRecord>, ApiError> {
        let value = self
            .get_value(self.config.attempt_history_url(user, page))
            .await?;
        let dtos: Vec<AttemptRecordDto> = decode_list(value, "attempts")?;
        dtos.into_iter()
            .map(|dto| dto.into_record().map_err(ApiError::from))
            .collect()
    }
}

#[async_trait]
impl AuthGateway for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let value = self.post_value(self.config.login_url(), &body).await?;
        let dto: UserDto = decode_item(value)?;
        Ok(dto.into_profile()?)
    }

    async fn register(&self, new_user: &NewUser) -> Result<UserProfile, ApiError> {
        let body = RegisterRequest::from(new_user);
        let value = self.post_value(self.config.register_url(), &body).await?;
        let dto: UserDto = decode_item(value)?;
        Ok(dto.into_profile()?)
    }
}
