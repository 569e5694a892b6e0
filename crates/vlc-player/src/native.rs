//! Boundary to the native playback engine.
//!
//! Everything the facade needs from the engine goes through [`NativeEngine`]:
//! - object lifecycle (create / retain / release) keyed by [`NativeHandle`]
//! - integer properties, counts and commands on a media player
//! - description lists returned as raw [`RawTrackDescription`] chains
//! - media list and list player plumbing
//!
//! The engine owns all behavior (decode, demux, render, list advancement); this
//! trait only names the calls. `crate::libvlc` implements it against libvlc and
//! tests use an in-memory fake.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use vlc_player_types::{NavigationMode, PlaybackMode};

/// Shared engine reference held by every wrapper.
pub type Engine = Arc<dyn NativeEngine>;

/// Opaque, non-null pointer to an engine object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(NonNull<c_void>);

impl NativeHandle {
    /// Wrap a raw pointer; `None` for the engine's null "failed" sentinel.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

// The pointer is an opaque key; it is only dereferenced by the engine itself.
unsafe impl Send for NativeHandle {}
unsafe impl Sync for NativeHandle {}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:#x})", self.addr())
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.addr())
    }
}

/// Kind of engine object a handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Media,
    MediaList,
    MediaPlayer,
    MediaListPlayer,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandleKind::Media => "media",
            HandleKind::MediaList => "media list",
            HandleKind::MediaPlayer => "media player",
            HandleKind::MediaListPlayer => "media list player",
        };
        f.write_str(name)
    }
}

/// C layout of one node in an engine track description list.
#[repr(C)]
#[derive(Debug)]
pub struct RawTrackDescription {
    pub i_id: c_int,
    pub psz_name: *mut c_char,
    pub p_next: *mut RawTrackDescription,
}

/// Read/write integer properties of a media player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntProperty {
    AudioTrack,
    VideoTrack,
    Subtitle,
    Title,
    Chapter,
}

/// Read-only counts of a media player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Count {
    AudioTracks,
    VideoTracks,
    Subtitles,
    Titles,
    Chapters,
    ChaptersForTitle(i32),
}

/// Description lists a media player can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Descriptions {
    AudioTracks,
    VideoTracks,
    Subtitles,
    Titles,
    Chapters { title: i32 },
}

/// Commands sent to a media player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Stop,
    NextChapter,
    PreviousChapter,
    Navigate(NavigationMode),
}

/// Commands sent to a media list player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPlayerCommand {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    PlayItemAt(i32),
}

/// The native engine function surface.
///
/// Status returns follow the engine convention: `0` means accepted, anything else
/// is passed back to callers unchanged. Handles passed in are always live; the
/// wrappers guarantee a released handle never reaches the engine.
pub trait NativeEngine: Send + Sync {
    fn media_player_new(&self) -> Option<NativeHandle>;
    fn media_list_player_new(&self) -> Option<NativeHandle>;
    fn media_list_new(&self) -> Option<NativeHandle>;
    fn media_new_location(&self, mrl: &CStr) -> Option<NativeHandle>;
    fn media_new_path(&self, path: &CStr) -> Option<NativeHandle>;

    /// Add one reference to `handle`.
    fn retain(&self, kind: HandleKind, handle: NativeHandle);
    /// Drop one reference to `handle`.
    fn release(&self, kind: HandleKind, handle: NativeHandle);
    /// Event manager owned by `handle`; valid as long as `handle` is.
    fn event_manager(&self, kind: HandleKind, handle: NativeHandle) -> Option<NativeHandle>;

    fn player_get(&self, player: NativeHandle, property: IntProperty) -> i32;
    fn player_set(&self, player: NativeHandle, property: IntProperty, value: i32) -> i32;
    fn player_count(&self, player: NativeHandle, count: Count) -> i32;
    /// Head of a freshly allocated description list, or null when there is none.
    ///
    /// A non-null head must be handed back to [`NativeEngine::track_description_release`]
    /// exactly once.
    fn player_descriptions(
        &self,
        player: NativeHandle,
        which: Descriptions,
    ) -> *mut RawTrackDescription;
    fn player_command(&self, player: NativeHandle, command: PlayerCommand) -> i32;
    fn player_set_media(&self, player: NativeHandle, media: Option<NativeHandle>);
    /// Media currently loaded, with a reference owned by the caller.
    fn player_media(&self, player: NativeHandle) -> Option<NativeHandle>;
    fn player_time(&self, player: NativeHandle) -> i64;
    fn player_set_time(&self, player: NativeHandle, ms: i64);
    fn player_position(&self, player: NativeHandle) -> f32;
    fn player_set_position(&self, player: NativeHandle, position: f32);
    fn player_length(&self, player: NativeHandle) -> i64;
    fn player_is_playing(&self, player: NativeHandle) -> bool;
    fn player_state(&self, player: NativeHandle) -> i32;

    /// Free a whole description list given its original head.
    fn track_description_release(&self, head: *mut RawTrackDescription);

    fn media_mrl(&self, media: NativeHandle) -> Option<String>;

    fn media_list_add(&self, list: NativeHandle, media: NativeHandle) -> i32;
    fn media_list_count(&self, list: NativeHandle) -> i32;
    /// Item at `index`, with a reference owned by the caller.
    fn media_list_item_at(&self, list: NativeHandle, index: i32) -> Option<NativeHandle>;

    fn list_player_set_media_list(&self, list_player: NativeHandle, list: NativeHandle);
    fn list_player_set_media_player(&self, list_player: NativeHandle, player: NativeHandle);
    fn list_player_command(&self, list_player: NativeHandle, command: ListPlayerCommand) -> i32;
    fn list_player_set_playback_mode(&self, list_player: NativeHandle, mode: PlaybackMode);
    fn list_player_state(&self, list_player: NativeHandle) -> i32;
    fn list_player_is_playing(&self, list_player: NativeHandle) -> bool;
}
