use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A type persisted through the record store under a fixed collection name.
pub trait Record: Serialize + for<'de> Deserialize<'de> {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Lowercases `name` and replaces every character outside `a-z` with `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { '-' })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: Uuid,
    name: String,
    slug: String,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(name: &str) -> Self {
        let mut poll = Poll {
            id: Uuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            created_at: Utc::now(),
        };
        poll.set_name(name);
        poll
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The slug is recomputed on every assignment so it never lags the name.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.slug = slugify(name);
    }

    pub fn url(&self) -> String {
        format!("/poll/{}", self.slug)
    }
}

impl Record for Poll {
    const COLLECTION: &'static str = "Polls";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub votes: i64,
}

impl Record for Choice {
    const COLLECTION: &'static str = "Choices";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A choice that has not been validated or persisted yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewChoice {
    pub poll_id: Option<Uuid>,
    pub name: String,
}
