//! Audio output adapter.

mod broadcast_output;

pub use broadcast_output::{BroadcastAudioOutput, PlaybackCommand};
