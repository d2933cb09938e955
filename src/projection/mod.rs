pub mod collection;
pub mod ranked;

pub use collection::ChoiceCollection;
pub use ranked::RankedChoices;
