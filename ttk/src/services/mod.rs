//! Resource services sitting between handlers and repositories.
//!
//! Services apply the rules that span more than one repository call: ownership checks before
//! writes, the optional history hook after article mutations, assignee existence for tasks.

pub mod articles;
pub mod history;
pub mod tasks;
pub mod users;

pub use articles::ArticleService;
pub use history::HistoryService;
pub use tasks::TaskService;
pub use users::UserService;
