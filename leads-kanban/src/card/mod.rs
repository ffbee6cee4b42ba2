//! Card commands

mod add;
mod delete;
mod mv;
mod update;

pub use add::AddCard;
pub use delete::DeleteCard;
pub use mv::MoveCard;
pub use update::UpdateCard;
