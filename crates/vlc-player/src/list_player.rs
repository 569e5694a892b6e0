//! Sequential playback over a media list.
//!
//! A [`MediaListPlayer`] owns the native list player and an inner [`DiskPlayer`]
//! the engine renders through. List operations (next, previous, play-at,
//! playback mode, list state) go to the list player handle; generic transport is
//! forwarded to the inner player.
//!
//! Teardown order is fixed: the inner player is released first, then the list
//! player. A second dispose is a no-op.

use std::cell::Cell;
use std::hash::{Hash, Hasher};

use vlc_player_types::{MediaState, PlaybackMode};

use crate::config::{InnerRelease, PlayerConfig};
use crate::disk_player::DiskPlayer;
use crate::error::{PlayerError, Result};
use crate::handle::OwnedHandle;
use crate::media::{Media, MediaList};
use crate::native::{Engine, HandleKind, ListPlayerCommand, NativeHandle};
use crate::player::{EventManager, Player, cached_event_manager};

/// List player composed of a native list player and an inner [`DiskPlayer`].
pub struct MediaListPlayer {
    handle: OwnedHandle,
    inner: Option<DiskPlayer>,
    playback_mode: PlaybackMode,
    events: Cell<Option<NativeHandle>>,
}

impl MediaListPlayer {
    /// Build a list player over `media_list`.
    ///
    /// `media_list` is consumed: its reference is released once the list player
    /// holds the list. A fresh inner player is created and bound; whether its own
    /// reference is dropped now or at dispose time follows `config.inner_release`.
    pub fn new(engine: &Engine, mut media_list: MediaList, config: &PlayerConfig) -> Result<Self> {
        let raw = engine
            .media_list_player_new()
            .ok_or(PlayerError::CreateFailed(HandleKind::MediaListPlayer))?;
        let handle = OwnedHandle::new(engine.clone(), HandleKind::MediaListPlayer, raw);

        engine.list_player_set_media_list(raw, media_list.live()?);
        tracing::debug!(list_player = %raw, list = %media_list.native_handle(), "media list bound");
        media_list.dispose();

        let mut inner = DiskPlayer::new(engine)?;
        engine.list_player_set_media_player(raw, inner.native_handle());
        tracing::debug!(list_player = %raw, player = %inner.native_handle(), "inner player bound");
        if config.inner_release == InnerRelease::AfterBind {
            inner.relinquish();
        }

        let mut player = Self {
            handle,
            inner: Some(inner),
            playback_mode: PlaybackMode::Default,
            events: Cell::new(None),
        };
        if config.playback_mode != PlaybackMode::Default {
            player.set_playback_mode(config.playback_mode)?;
        }
        Ok(player)
    }

    fn list_command(&self, op: &'static str, command: ListPlayerCommand) -> Result<()> {
        let raw = self.handle.live()?;
        tracing::info!(list_player = %raw, ?command, "list player command");
        PlayerError::check(op, self.handle.engine().list_player_command(raw, command))
    }

    /// Live inner player, or `Disposed` for the whole composite.
    fn inner(&self) -> Result<&DiskPlayer> {
        self.handle.live()?;
        self.inner
            .as_ref()
            .ok_or(PlayerError::Disposed(HandleKind::MediaListPlayer))
    }

    pub fn play_next(&self) -> Result<()> {
        self.list_command("play_next", ListPlayerCommand::Next)
    }

    pub fn play_previous(&self) -> Result<()> {
        self.list_command("play_previous", ListPlayerCommand::Previous)
    }

    /// Start the item at `index`; out-of-range indexes are left to the engine.
    pub fn play_item_at(&self, index: i32) -> Result<()> {
        self.list_command("play_item_at", ListPlayerCommand::PlayItemAt(index))
    }

    /// Last mode set through [`MediaListPlayer::set_playback_mode`].
    ///
    /// The engine cannot report this value, so it is tracked here.
    pub fn playback_mode(&self) -> Result<PlaybackMode> {
        self.handle.live()?;
        Ok(self.playback_mode)
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) -> Result<()> {
        let raw = self.handle.live()?;
        self.handle.engine().list_player_set_playback_mode(raw, mode);
        self.playback_mode = mode;
        Ok(())
    }

    /// State of the list player as reported by the engine.
    pub fn player_state(&self) -> Result<MediaState> {
        let raw = self.handle.live()?;
        Ok(MediaState::from_raw(self.handle.engine().list_player_state(raw)))
    }

    /// Whether the list player itself reports playback in progress.
    pub fn is_list_playing(&self) -> Result<bool> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().list_player_is_playing(raw))
    }

    /// Event manager of the list player (item changes, list end).
    pub fn list_events(&self) -> Result<EventManager> {
        cached_event_manager(&self.handle, &self.events)
    }

    /// Player that renders the current list item.
    pub fn inner_player(&self) -> Result<&DiskPlayer> {
        self.inner()
    }

    /// Release the inner player, then the list player.
    pub fn dispose(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.dispose();
        }
        self.events.set(None);
        self.handle.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_released()
    }
}

impl Player for MediaListPlayer {
    fn play(&self) -> Result<()> {
        self.inner()?.play()
    }

    fn pause(&self) -> Result<()> {
        self.inner()?.pause()
    }

    fn stop(&self) -> Result<()> {
        self.inner()?.stop()
    }

    fn open(&self, media: &Media) -> Result<()> {
        self.inner()?.open(media)
    }

    fn time(&self) -> Result<i64> {
        self.inner()?.time()
    }

    fn set_time(&self, ms: i64) -> Result<()> {
        self.inner()?.set_time(ms)
    }

    fn position(&self) -> Result<f32> {
        self.inner()?.position()
    }

    fn set_position(&self, position: f32) -> Result<()> {
        self.inner()?.set_position(position)
    }

    fn length(&self) -> Result<i64> {
        self.inner()?.length()
    }

    fn events(&self) -> Result<EventManager> {
        self.inner()?.events()
    }

    fn is_playing(&self) -> Result<bool> {
        self.inner()?.is_playing()
    }

    fn current_media(&self) -> Result<Option<Media>> {
        self.inner()?.current_media()
    }

    fn state(&self) -> Result<MediaState> {
        self.inner()?.state()
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle.raw()
    }
}

impl Drop for MediaListPlayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl PartialEq for MediaListPlayer {
    fn eq(&self, other: &Self) -> bool {
        self.native_handle() == other.native_handle()
    }
}

impl Eq for MediaListPlayer {}

impl Hash for MediaListPlayer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native_handle().hash(state);
    }
}

impl std::fmt::Debug for MediaListPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaListPlayer")
            .field("handle", &self.handle.raw())
            .field("inner", &self.inner)
            .field("playback_mode", &self.playback_mode)
            .finish()
    }
}
