pub mod choice_add;
pub mod choice_item;
pub mod pages;
pub mod poll_add;
pub mod poll_detail;
pub mod top_choices;

pub use pages::{AlertView, NotFoundView};
pub use poll_add::PollAddView;
pub use poll_detail::PollDetailView;
