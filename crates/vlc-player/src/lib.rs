//! Playback facade over a native media engine.
//!
//! [`DiskPlayer`] drives a single engine media player (tracks, titles, chapters,
//! DVD menus). [`MediaListPlayer`] drives an engine list player over a
//! [`MediaList`], with an owned inner [`DiskPlayer`] for per-item transport.

pub mod config;
pub mod description;
pub mod disk_player;
pub mod error;
mod handle;
#[cfg(feature = "libvlc")]
pub mod libvlc;
pub mod list_player;
pub mod media;
pub mod native;
pub mod player;

#[cfg(test)]
mod fake;

pub use config::{InnerRelease, PlayerConfig};
pub use description::TrackDescriptions;
pub use disk_player::DiskPlayer;
pub use error::{PlayerError, Result};
pub use list_player::MediaListPlayer;
pub use media::{Media, MediaList};
pub use native::{Engine, HandleKind, NativeEngine, NativeHandle};
pub use player::{EventManager, Player, same_player};
pub use vlc_player_types;
