use crate::db::models::Poll;
use crate::db::repositories::RecordStore;
use crate::error::{PollError, StorageError, ValidationError};
use tokio::sync::RwLock;

/// Owns every poll record plus the in-memory list the router searches.
pub struct PollStore {
    records: RecordStore,
    polls: RwLock<Vec<Poll>>,
}

impl PollStore {
    pub fn new(records: RecordStore) -> Self {
        PollStore {
            records,
            polls: RwLock::new(Vec::new()),
        }
    }

    pub async fn create(&self, name: &str) -> Result<Poll, PollError> {
        let poll = Poll::new(name);
        if poll.name().is_empty() {
            return Err(ValidationError::BlankPollName.into());
        }

        // Save and push under one guard so a concurrent reload never sees
        // the record without the list entry or the other way round.
        let mut polls = self.polls.write().await;
        self.records.save(&poll).await?;
        info!(id = %poll.id, slug = poll.slug(), "poll created");

        polls.push(poll.clone());
        Ok(poll)
    }

    /// Reloads the in-memory list from storage.
    pub async fn fetch_all(&self) -> Result<Vec<Poll>, StorageError> {
        let mut loaded = self.polls.write().await;
        let polls = self.records.all::<Poll>().await?;
        *loaded = polls.clone();
        Ok(polls)
    }

    /// First poll in the in-memory list whose slug matches.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Poll, PollError> {
        self.polls
            .read()
            .await
            .iter()
            .find(|poll| poll.slug() == slug)
            .cloned()
            .ok_or(PollError::PollNotFound)
    }
}
