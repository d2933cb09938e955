use crate::db::models::{Choice, NewChoice};
use crate::db::repositories::RecordStore;
use crate::error::{PollError, StorageError, ValidationError};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChoiceStore {
    records: RecordStore,
}

impl ChoiceStore {
    pub fn new(records: RecordStore) -> Self {
        ChoiceStore { records }
    }

    /// Validates and persists a candidate. Name uniqueness within a poll is
    /// the caller's concern.
    pub async fn create(&self, candidate: NewChoice) -> Result<Choice, PollError> {
        if candidate.name.is_empty() {
            return Err(ValidationError::BlankChoiceName.into());
        }
        let poll_id = candidate.poll_id.ok_or(ValidationError::MissingPollId)?;

        let choice = Choice {
            id: Uuid::new_v4(),
            poll_id,
            name: candidate.name,
            votes: 0,
        };
        self.records.save(&choice).await?;
        info!(id = %choice.id, poll_id = %poll_id, "choice created");

        Ok(choice)
    }

    pub async fn fetch_for_poll(&self, poll_id: Uuid) -> Result<Vec<Choice>, StorageError> {
        let choices = self.records.all::<Choice>().await?;
        Ok(choices
            .into_iter()
            .filter(|choice| choice.poll_id == poll_id)
            .collect())
    }

    /// Adds one vote to the stored count. `None` if the choice is gone.
    pub async fn vote(&self, choice_id: Uuid) -> Result<Option<Choice>, StorageError> {
        let Some(mut choice) = self.records.get::<Choice>(choice_id).await? else {
            return Ok(None);
        };
        choice.votes += 1;
        self.records.save(&choice).await?;
        debug!(id = %choice.id, votes = choice.votes, "vote recorded");

        Ok(Some(choice))
    }

    pub async fn remove(&self, choice_id: Uuid) -> Result<bool, StorageError> {
        let removed = self.records.remove::<Choice>(choice_id).await?;
        if removed {
            info!(id = %choice_id, "choice removed");
        }
        Ok(removed)
    }
}
