//! Single-media player with track, subtitle, title and chapter control.
//!
//! Every accessor forwards straight to the engine: values are neither validated
//! nor cached, so a read after a write reports whatever the engine settled on.

use std::cell::Cell;
use std::hash::{Hash, Hasher};

use vlc_player_types::{MediaState, NavigationMode};

use crate::description::TrackDescriptions;
use crate::error::{PlayerError, Result};
use crate::handle::OwnedHandle;
use crate::media::Media;
use crate::native::{
    Count, Descriptions, Engine, HandleKind, IntProperty, NativeHandle, PlayerCommand,
};
use crate::player::{EventManager, Player, cached_event_manager};

/// Wrapper around one native media player.
pub struct DiskPlayer {
    handle: OwnedHandle,
    events: Cell<Option<NativeHandle>>,
}

impl DiskPlayer {
    pub fn new(engine: &Engine) -> Result<Self> {
        let raw = engine
            .media_player_new()
            .ok_or(PlayerError::CreateFailed(HandleKind::MediaPlayer))?;
        // SAFETY: a freshly created player comes with exactly one reference.
        Ok(unsafe { Self::from_raw(engine, raw) })
    }

    /// Wrap an existing native player.
    ///
    /// # Safety
    /// `raw` must be a live media player of `engine`, and the caller must transfer
    /// exactly one reference to the returned wrapper.
    pub unsafe fn from_raw(engine: &Engine, raw: NativeHandle) -> Self {
        Self {
            handle: OwnedHandle::new(engine.clone(), HandleKind::MediaPlayer, raw),
            events: Cell::new(None),
        }
    }

    fn get(&self, property: IntProperty) -> Result<i32> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_get(raw, property))
    }

    fn set(&self, property: IntProperty, value: i32) -> Result<()> {
        let raw = self.handle.live()?;
        let status = self.handle.engine().player_set(raw, property, value);
        if status != 0 {
            tracing::debug!(?property, value, status, "engine did not accept property value");
        }
        Ok(())
    }

    fn count(&self, count: Count) -> Result<i32> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_count(raw, count))
    }

    fn descriptions(&self, which: Descriptions) -> Result<TrackDescriptions> {
        let raw = self.handle.live()?;
        let engine = self.handle.engine();
        let head = engine.player_descriptions(raw, which);
        // SAFETY: the engine hands over a fresh list (or null) that nobody else owns.
        Ok(unsafe { TrackDescriptions::from_raw(engine.clone(), head) })
    }

    fn command(&self, command: PlayerCommand) -> Result<i32> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_command(raw, command))
    }

    pub fn audio_track(&self) -> Result<i32> {
        self.get(IntProperty::AudioTrack)
    }

    pub fn set_audio_track(&self, track: i32) -> Result<()> {
        self.set(IntProperty::AudioTrack, track)
    }

    pub fn audio_track_count(&self) -> Result<i32> {
        self.count(Count::AudioTracks)
    }

    pub fn audio_tracks_info(&self) -> Result<TrackDescriptions> {
        self.descriptions(Descriptions::AudioTracks)
    }

    pub fn video_track(&self) -> Result<i32> {
        self.get(IntProperty::VideoTrack)
    }

    pub fn set_video_track(&self, track: i32) -> Result<()> {
        self.set(IntProperty::VideoTrack, track)
    }

    pub fn video_track_count(&self) -> Result<i32> {
        self.count(Count::VideoTracks)
    }

    pub fn video_tracks_info(&self) -> Result<TrackDescriptions> {
        self.descriptions(Descriptions::VideoTracks)
    }

    pub fn subtitle(&self) -> Result<i32> {
        self.get(IntProperty::Subtitle)
    }

    pub fn set_subtitle(&self, subtitle: i32) -> Result<()> {
        self.set(IntProperty::Subtitle, subtitle)
    }

    pub fn subtitle_count(&self) -> Result<i32> {
        self.count(Count::Subtitles)
    }

    pub fn subtitle_tracks_info(&self) -> Result<TrackDescriptions> {
        self.descriptions(Descriptions::Subtitles)
    }

    pub fn title(&self) -> Result<i32> {
        self.get(IntProperty::Title)
    }

    pub fn set_title(&self, title: i32) -> Result<()> {
        self.set(IntProperty::Title, title)
    }

    pub fn title_count(&self) -> Result<i32> {
        self.count(Count::Titles)
    }

    pub fn title_info(&self) -> Result<TrackDescriptions> {
        self.descriptions(Descriptions::Titles)
    }

    pub fn chapter(&self) -> Result<i32> {
        self.get(IntProperty::Chapter)
    }

    pub fn set_chapter(&self, chapter: i32) -> Result<()> {
        self.set(IntProperty::Chapter, chapter)
    }

    pub fn chapter_count(&self) -> Result<i32> {
        self.count(Count::Chapters)
    }

    /// Chapter count of the title that is currently active.
    ///
    /// `_title` is accepted for API compatibility but not consulted: the count is
    /// always taken for the active title as reported by [`DiskPlayer::title`].
    pub fn chapter_count_for_title(&self, _title: i32) -> Result<i32> {
        let active = self.title()?;
        self.count(Count::ChaptersForTitle(active))
    }

    pub fn chapter_description(&self, title: i32) -> Result<TrackDescriptions> {
        self.descriptions(Descriptions::Chapters { title })
    }

    pub fn next_chapter(&self) -> Result<()> {
        self.command(PlayerCommand::NextChapter).map(drop)
    }

    pub fn previous_chapter(&self) -> Result<()> {
        self.command(PlayerCommand::PreviousChapter).map(drop)
    }

    /// Send a menu navigation key.
    pub fn navigate(&self, mode: NavigationMode) -> Result<()> {
        self.command(PlayerCommand::Navigate(mode)).map(drop)
    }

    /// Release the native player. Later calls return [`PlayerError::Disposed`].
    pub fn dispose(&mut self) {
        self.events.set(None);
        self.handle.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_released()
    }

    /// Give up our reference once a list player holds its own.
    pub(crate) fn relinquish(&mut self) {
        self.handle.relinquish();
    }
}

impl Player for DiskPlayer {
    fn play(&self) -> Result<()> {
        PlayerError::check("play", self.command(PlayerCommand::Play)?)
    }

    fn pause(&self) -> Result<()> {
        self.command(PlayerCommand::Pause).map(drop)
    }

    fn stop(&self) -> Result<()> {
        self.command(PlayerCommand::Stop).map(drop)
    }

    fn open(&self, media: &Media) -> Result<()> {
        let raw = self.handle.live()?;
        let media = media.live()?;
        self.handle.engine().player_set_media(raw, Some(media));
        Ok(())
    }

    fn time(&self) -> Result<i64> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_time(raw))
    }

    fn set_time(&self, ms: i64) -> Result<()> {
        let raw = self.handle.live()?;
        self.handle.engine().player_set_time(raw, ms);
        Ok(())
    }

    fn position(&self) -> Result<f32> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_position(raw))
    }

    fn set_position(&self, position: f32) -> Result<()> {
        let raw = self.handle.live()?;
        self.handle.engine().player_set_position(raw, position);
        Ok(())
    }

    fn length(&self) -> Result<i64> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_length(raw))
    }

    fn events(&self) -> Result<EventManager> {
        cached_event_manager(&self.handle, &self.events)
    }

    fn is_playing(&self) -> Result<bool> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().player_is_playing(raw))
    }

    fn current_media(&self) -> Result<Option<Media>> {
        let raw = self.handle.live()?;
        let engine = self.handle.engine();
        Ok(engine.player_media(raw).map(|media| Media::adopt(engine, media)))
    }

    fn state(&self) -> Result<MediaState> {
        let raw = self.handle.live()?;
        Ok(MediaState::from_raw(self.handle.engine().player_state(raw)))
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle.raw()
    }
}

impl PartialEq for DiskPlayer {
    fn eq(&self, other: &Self) -> bool {
        self.native_handle() == other.native_handle()
    }
}

impl Eq for DiskPlayer {}

impl Hash for DiskPlayer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native_handle().hash(state);
    }
}

impl std::fmt::Debug for DiskPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskPlayer")
            .field("handle", &self.handle.raw())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
