use crate::{
    api::TaskRepository,
    config::ClientConfig,
    domain::{Task, TaskDraft, TaskId, TaskRecord},
    error::{BoardError, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

/// Task repository backed by a JSON collection endpoint
#[derive(Debug, Clone)]
pub struct HttpTaskRepository {
    client: Client,
    collection_url: String,
}

impl HttpTaskRepository {
    /// Creates a repository for the collection named in the configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BoardError::Config(format!("could not build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config.collection_url()))
    }

    /// Creates a repository from an existing client and collection URL
    pub fn with_client(client: Client, collection_url: impl Into<String>) -> Self {
        Self {
            client,
            collection_url: collection_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// Turns a non-success status into a remote error carrying the body
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BoardError::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    #[instrument(skip(self), fields(url = %self.collection_url))]
    async fn list(&self) -> Result<Vec<TaskRecord>> {
        let response = self.client.get(&self.collection_url).send().await?;
        let records: Vec<TaskRecord> = Self::check_response(response).await?.json().await?;
        debug!(count = records.len(), "fetched tasks");
        Ok(records)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        let response = self
            .client
            .post(&self.collection_url)
            .json(&draft.create_payload())
            .send()
            .await?;
        let record: TaskRecord = Self::check_response(response).await?.json().await?;
        debug!(id = %record.id, "created task");
        Ok(record.into_created(draft))
    }

    #[instrument(skip(self, task), fields(id = %task.id))]
    async fn update(&self, task: &Task) -> Result<Task> {
        let response = self
            .client
            .put(self.item_url(task.id))
            .json(task)
            .send()
            .await?;
        let record: TaskRecord = Self::check_response(response).await?.json().await?;
        Ok(record.merge_onto(task))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TaskId) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
