//! Stage commands

mod add;
mod delete;
mod list;
mod update;

pub use add::AddStage;
pub use delete::DeleteStage;
pub use list::ListStages;
pub use update::UpdateStage;
