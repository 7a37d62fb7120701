//! Local persistence adapters: countdown records, display settings, and
//! uploaded sound files.

mod file_settings_store;
mod file_timer_store;
mod in_memory_timer_store;
mod local_sound_storage;

pub use file_settings_store::FileSettingsStore;
pub use file_timer_store::FileTimerStore;
pub use in_memory_timer_store::InMemoryTimerStore;
pub use local_sound_storage::LocalSoundStorage;
