use crate::db::models::Poll;
use crate::db::repositories::PollStore;
use crate::error::{PollError, StorageError};
use askama::Template;

/// The front page: a form to create a poll and links to the existing ones.
#[derive(Template)]
#[template(path = "poll_add.html")]
pub struct PollAddView {
    polls: Vec<Poll>,
    error: Option<String>,
    name: String,
}

impl PollAddView {
    pub async fn load(store: &PollStore) -> Result<Self, StorageError> {
        Ok(PollAddView {
            polls: store.fetch_all().await?,
            error: None,
            name: String::new(),
        })
    }

    /// Returns the new poll on success. Validation failures are kept on the
    /// view for the next render and yield `Ok(None)`.
    pub async fn add_poll(
        &mut self,
        store: &PollStore,
        raw_name: &str,
    ) -> Result<Option<Poll>, PollError> {
        let name = raw_name.trim();
        match store.create(name).await {
            Ok(poll) => {
                self.error = None;
                self.name.clear();
                self.polls.push(poll.clone());
                Ok(Some(poll))
            }
            Err(PollError::Validation(e)) => {
                debug!("poll rejected: {e}");
                self.error = Some(e.to_string());
                self.name = name.to_string();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
