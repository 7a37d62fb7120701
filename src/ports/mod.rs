//! Port definitions for the hexagonal architecture.
//!
//! These traits define the boundaries between the application core and the
//! outside world. Adapters implement them; handlers depend on them through
//! `Arc<dyn Trait>` so every external concern can be swapped or mocked.

pub mod audio_output;
pub mod category_source;
pub mod clock;
pub mod connection;
pub mod order_commands;
pub mod order_source;
pub mod settings_store;
pub mod sound_storage;
pub mod timer_store;

pub use audio_output::{AudioOutput, AudioOutputError, PlaybackRequest, SoundSource};
pub use category_source::{Category, CategorySource, CategorySourceError};
pub use clock::Clock;
pub use connection::{ConnectionDescriptor, ConnectionError, ConnectionManager};
pub use order_commands::{OrderCommandError, OrderCommands};
pub use order_source::{OrderSource, OrderSourceError, QueryDiagnostics};
pub use settings_store::{SettingsStore, SettingsStoreError};
pub use sound_storage::{SoundStorage, SoundStorageError};
pub use timer_store::{TimerStore, TimerStoreError};
