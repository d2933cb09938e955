use crate::db::models::Choice;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceEvent {
    Added(Choice),
    Removed(Uuid),
    Changed(Choice),
}

pub type ChoiceEvents = broadcast::Receiver<ChoiceEvent>;

/// The choices of one poll, in insertion order.
pub struct ChoiceCollection {
    poll_id: Uuid,
    choices: Vec<Choice>,
    events: broadcast::Sender<ChoiceEvent>,
}

impl ChoiceCollection {
    pub fn new(poll_id: Uuid) -> Self {
        ChoiceCollection {
            poll_id,
            choices: Vec::new(),
            events: broadcast::channel(EVENT_CAPACITY).0,
        }
    }

    /// Builds the collection from loaded records, keeping only this poll's.
    pub fn load(poll_id: Uuid, records: Vec<Choice>) -> Self {
        let mut collection = Self::new(poll_id);
        collection.choices = records
            .into_iter()
            .filter(|choice| choice.poll_id == poll_id)
            .collect();
        collection
    }

    pub fn subscribe(&self) -> ChoiceEvents {
        self.events.subscribe()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.name == name)
    }

    /// Returns false if the choice belongs to another poll or its id is
    /// already present.
    pub fn add(&mut self, choice: Choice) -> bool {
        if choice.poll_id != self.poll_id || self.get(choice.id).is_some() {
            return false;
        }
        self.choices.push(choice.clone());
        self.publish(ChoiceEvent::Added(choice));
        true
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Choice> {
        let index = self.choices.iter().position(|choice| choice.id == id)?;
        let removed = self.choices.remove(index);
        self.publish(ChoiceEvent::Removed(id));
        Some(removed)
    }

    /// Replaces the stored copy of `choice`. Unknown ids are ignored.
    pub fn update(&mut self, choice: Choice) -> bool {
        let Some(slot) = self.choices.iter_mut().find(|c| c.id == choice.id) else {
            return false;
        };
        if *slot == choice {
            return false;
        }
        *slot = choice.clone();
        self.publish(ChoiceEvent::Changed(choice));
        true
    }

    fn publish(&self, event: ChoiceEvent) {
        // No subscribers is fine; nothing is rendering this collection yet.
        let _ = self.events.send(event);
    }
}
