//! Transport capabilities shared by every player wrapper.

use std::cell::Cell;

use vlc_player_types::{MediaState, PlayerStatus};

use crate::error::{PlayerError, Result};
use crate::handle::OwnedHandle;
use crate::media::Media;
use crate::native::{HandleKind, NativeHandle};

/// Event manager of a player or list player.
///
/// Owned by its source object: it stays valid only while the source is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventManager {
    pub handle: NativeHandle,
    pub source: HandleKind,
}

/// Generic transport surface implemented by [`DiskPlayer`](crate::DiskPlayer) and
/// [`MediaListPlayer`](crate::MediaListPlayer).
///
/// Every method returns [`PlayerError::Disposed`] once the wrapper is disposed.
pub trait Player {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    /// Load `media` as the current item; the player takes its own reference.
    fn open(&self, media: &Media) -> Result<()>;

    /// Elapsed time in milliseconds (`-1` when nothing is loaded).
    fn time(&self) -> Result<i64>;
    fn set_time(&self, ms: i64) -> Result<()>;
    /// Relative position in `0.0..=1.0` (`-1.0` when nothing is loaded).
    fn position(&self) -> Result<f32>;
    fn set_position(&self, position: f32) -> Result<()>;
    /// Media length in milliseconds (`-1` when unknown).
    fn length(&self) -> Result<i64>;

    fn events(&self) -> Result<EventManager>;
    fn is_playing(&self) -> Result<bool>;
    fn current_media(&self) -> Result<Option<Media>>;
    fn state(&self) -> Result<MediaState>;

    /// Identity of this player.
    fn native_handle(&self) -> NativeHandle;

    /// Snapshot of the transport state suitable for status reporting.
    fn status(&self) -> Result<PlayerStatus> {
        let now_playing = match self.current_media()? {
            Some(media) => media.mrl()?,
            None => None,
        };
        Ok(PlayerStatus {
            state: self.state()?,
            is_playing: self.is_playing()?,
            time_ms: PlayerStatus::millis(self.time()?),
            length_ms: PlayerStatus::millis(self.length()?),
            position: PlayerStatus::position(self.position()?),
            now_playing,
        })
    }
}

/// `true` when both players wrap the same native handle.
pub fn same_player(a: &dyn Player, b: &dyn Player) -> bool {
    a.native_handle() == b.native_handle()
}

/// Fetch `handle`'s event manager once and reuse it afterwards.
pub(crate) fn cached_event_manager(
    handle: &OwnedHandle,
    cache: &Cell<Option<NativeHandle>>,
) -> Result<EventManager> {
    let raw = handle.live()?;
    let kind = handle.kind();
    let events = match cache.get() {
        Some(events) => events,
        None => {
            let events = handle
                .engine()
                .event_manager(kind, raw)
                .ok_or(PlayerError::CreateFailed(kind))?;
            cache.set(Some(events));
            events
        }
    };
    Ok(EventManager {
        handle: events,
        source: kind,
    })
}
