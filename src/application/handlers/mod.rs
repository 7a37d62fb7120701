//! Use-case handlers. One handler per operation, each depending only on the
//! ports it needs.

mod finish_order;
mod list_categories;
mod reconnect;
mod refresh_board;
mod sound_settings;

pub use finish_order::FinishOrderHandler;
pub use list_categories::{CategoryListing, ListCategoriesHandler};
pub use reconnect::ReconnectHandler;
pub use refresh_board::{BoardOrder, BoardSnapshot, RefreshBoardHandler};
pub use sound_settings::SoundSettingsHandler;
