//! Audible alerting: sound settings, the mute window, and the dispatcher
//! that turns board events into playback commands.

mod dispatcher;
mod mute;
mod settings;

pub use dispatcher::{AlertDispatcher, MuteSnapshot};
pub use mute::MuteState;
pub use settings::{SoundKind, SoundSettings};
