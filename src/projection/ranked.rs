use super::collection::{ChoiceCollection, ChoiceEvent, ChoiceEvents};
use crate::db::models::Choice;
use std::cmp::Reverse;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

struct Ranked {
    seq: u64,
    choice: Choice,
}

impl Ranked {
    fn key(&self) -> (Reverse<i64>, u64) {
        (Reverse(self.choice.votes), self.seq)
    }
}

/// A copy of a [`ChoiceCollection`] ordered by descending votes. Equal
/// counts keep the order in which choices entered the collection.
pub struct RankedChoices {
    entries: Vec<Ranked>,
    next_seq: u64,
    events: ChoiceEvents,
}

impl RankedChoices {
    pub fn new(source: &ChoiceCollection) -> Self {
        let mut ranked = RankedChoices {
            entries: Vec::with_capacity(source.len()),
            next_seq: 0,
            events: source.subscribe(),
        };
        ranked.rebuild(source);
        ranked
    }

    /// Applies every pending collection event. Returns true when the order
    /// or contents changed and the view needs re-rendering.
    pub fn sync(&mut self, source: &ChoiceCollection) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(ChoiceEvent::Added(choice)) => {
                    let seq = self.next_seq();
                    self.insert(Ranked { seq, choice });
                    changed = true;
                }
                Ok(ChoiceEvent::Removed(id)) => {
                    changed |= self.take(id).is_some();
                }
                Ok(ChoiceEvent::Changed(choice)) => {
                    changed |= self.reposition(choice);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "ranked choices fell behind, rebuilding");
                    // Resubscribe first so nothing published after the
                    // rebuild is missed.
                    self.events = source.subscribe();
                    self.rebuild(source);
                    return true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return changed,
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.entries.iter().map(|entry| &entry.choice)
    }

    fn rebuild(&mut self, source: &ChoiceCollection) {
        self.entries.clear();
        self.next_seq = 0;
        for choice in source.iter() {
            let seq = self.next_seq();
            self.insert(Ranked {
                seq,
                choice: choice.clone(),
            });
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, entry: Ranked) {
        let key = entry.key();
        let at = self.entries.partition_point(|e| e.key() < key);
        self.entries.insert(at, entry);
    }

    fn take(&mut self, id: Uuid) -> Option<Ranked> {
        let index = self.entries.iter().position(|e| e.choice.id == id)?;
        Some(self.entries.remove(index))
    }

    fn reposition(&mut self, choice: Choice) -> bool {
        let Some(old) = self.take(choice.id) else {
            return false;
        };
        self.insert(Ranked {
            seq: old.seq,
            choice,
        });
        true
    }
}
