//! Task commands

mod add;
mod archive;
mod list;
mod mv;

pub use add::AddTask;
pub use archive::{ArchiveStageTasks, ArchiveTasks};
pub use list::ListTasks;
pub use mv::MoveTask;
