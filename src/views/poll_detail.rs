use super::choice_add::ChoiceAddView;
use super::choice_item::ChoiceItemView;
use super::top_choices::TopChoicesView;
use crate::db::models::{Choice, NewChoice, Poll};
use crate::db::repositories::ChoiceStore;
use crate::error::{PollError, StorageError, ValidationError};
use crate::projection::{ChoiceCollection, RankedChoices};
use askama::Template;
use uuid::Uuid;

#[derive(Template)]
#[template(path = "poll_detail.html")]
struct PollDetailTemplate<'a> {
    poll: &'a Poll,
    no_choices: bool,
    choice_items: Vec<String>,
    choice_add: String,
    top_choices: String,
}

/// A poll's page: its choices, the add-choice form and the ranked list.
pub struct PollDetailView {
    poll: Poll,
    choices: ChoiceCollection,
    choice_add: ChoiceAddView,
    top_choices: TopChoicesView,
}

impl PollDetailView {
    pub async fn load(poll: Poll, store: &ChoiceStore) -> Result<Self, StorageError> {
        let choices = ChoiceCollection::load(poll.id, store.fetch_for_poll(poll.id).await?);
        let top_choices = TopChoicesView::new(&choices);
        let choice_add = ChoiceAddView::new(format!("{}/choices", poll.url()));

        Ok(PollDetailView {
            poll,
            choices,
            choice_add,
            top_choices,
        })
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn choices(&self) -> &ChoiceCollection {
        &self.choices
    }

    pub fn ranked(&mut self) -> &RankedChoices {
        self.top_choices.refresh(&self.choices);
        self.top_choices.ranked()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.choice_add.error()
    }

    /// Handles a submission of the add-choice form.
    pub async fn add_choice(
        &mut self,
        store: &ChoiceStore,
        raw_name: &str,
    ) -> Result<Option<Choice>, PollError> {
        let candidate = self.choice_add.submit(raw_name);
        self.add_choice_model(store, candidate).await
    }

    /// Saves a candidate unless its name is taken in this poll. Validation
    /// failures land on the form and yield `Ok(None)`.
    pub async fn add_choice_model(
        &mut self,
        store: &ChoiceStore,
        mut candidate: NewChoice,
    ) -> Result<Option<Choice>, PollError> {
        if self.choices.find_by_name(&candidate.name).is_some() {
            debug!(poll = self.poll.slug(), name = %candidate.name, "duplicate choice");
            self.choice_add
                .set_error(ValidationError::DuplicateChoiceName.to_string());
            return Ok(None);
        }

        candidate.poll_id = Some(self.poll.id);
        match store.create(candidate).await {
            Ok(choice) => {
                self.choices.add(choice.clone());
                Ok(Some(choice))
            }
            Err(PollError::Validation(e)) => {
                self.choice_add.set_error(e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn vote(&mut self, store: &ChoiceStore, choice_id: Uuid) -> Result<Choice, PollError> {
        if self.choices.get(choice_id).is_none() {
            return Err(PollError::ChoiceNotFound);
        }
        let updated = store
            .vote(choice_id)
            .await?
            .ok_or(PollError::ChoiceNotFound)?;
        self.choices.update(updated.clone());
        Ok(updated)
    }

    pub async fn remove_choice(
        &mut self,
        store: &ChoiceStore,
        choice_id: Uuid,
    ) -> Result<Choice, PollError> {
        if self.choices.get(choice_id).is_none() {
            return Err(PollError::ChoiceNotFound);
        }
        store.remove(choice_id).await?;
        self.choices
            .remove(choice_id)
            .ok_or(PollError::ChoiceNotFound)
    }

    pub fn render(&mut self) -> askama::Result<String> {
        let poll_url = self.poll.url();
        let choice_items = self
            .choices
            .iter()
            .map(|choice| ChoiceItemView::new(&poll_url, choice).render())
            .collect::<askama::Result<Vec<_>>>()?;

        PollDetailTemplate {
            poll: &self.poll,
            no_choices: self.choices.is_empty(),
            choice_items,
            choice_add: self.choice_add.render()?,
            top_choices: self.top_choices.render(&self.choices)?,
        }
        .render()
    }
}
