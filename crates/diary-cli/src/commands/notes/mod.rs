pub mod add;
pub mod export;
pub mod list;
pub mod read;
pub mod search;

pub use add::handle_add;
pub use export::handle_export;
pub use list::handle_list;
pub use read::handle_read;
pub use search::handle_search;
