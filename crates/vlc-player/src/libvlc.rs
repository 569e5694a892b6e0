//! libvlc 3.x backend for [`NativeEngine`].
//!
//! Thin `extern "C"` bindings plus one [`LibVlc`] instance type. Each trait
//! method maps to exactly one libvlc call (media list mutation also takes the
//! list lock, as libvlc requires).

use std::ffi::{CStr, CString, c_char, c_float, c_int, c_uint, c_void};

use vlc_player_types::PlaybackMode;

use crate::error::{PlayerError, Result};
use crate::native::{
    Count, Descriptions, HandleKind, IntProperty, ListPlayerCommand, NativeEngine, NativeHandle,
    PlayerCommand, RawTrackDescription,
};

mod ffi {
    use super::*;

    pub type Ptr = *mut c_void;

    #[link(name = "vlc")]
    unsafe extern "C" {
        pub fn libvlc_new(argc: c_int, argv: *const *const c_char) -> Ptr;
        pub fn libvlc_release(instance: Ptr);
        pub fn libvlc_free(ptr: *mut c_void);

        pub fn libvlc_media_new_location(instance: Ptr, mrl: *const c_char) -> Ptr;
        pub fn libvlc_media_new_path(instance: Ptr, path: *const c_char) -> Ptr;
        pub fn libvlc_media_retain(media: Ptr);
        pub fn libvlc_media_release(media: Ptr);
        pub fn libvlc_media_get_mrl(media: Ptr) -> *mut c_char;
        pub fn libvlc_media_event_manager(media: Ptr) -> Ptr;

        pub fn libvlc_media_list_new(instance: Ptr) -> Ptr;
        pub fn libvlc_media_list_retain(list: Ptr);
        pub fn libvlc_media_list_release(list: Ptr);
        pub fn libvlc_media_list_lock(list: Ptr);
        pub fn libvlc_media_list_unlock(list: Ptr);
        pub fn libvlc_media_list_add_media(list: Ptr, media: Ptr) -> c_int;
        pub fn libvlc_media_list_count(list: Ptr) -> c_int;
        pub fn libvlc_media_list_item_at_index(list: Ptr, index: c_int) -> Ptr;
        pub fn libvlc_media_list_event_manager(list: Ptr) -> Ptr;

        pub fn libvlc_media_player_new(instance: Ptr) -> Ptr;
        pub fn libvlc_media_player_retain(player: Ptr);
        pub fn libvlc_media_player_release(player: Ptr);
        pub fn libvlc_media_player_event_manager(player: Ptr) -> Ptr;
        pub fn libvlc_media_player_set_media(player: Ptr, media: Ptr);
        pub fn libvlc_media_player_get_media(player: Ptr) -> Ptr;
        pub fn libvlc_media_player_play(player: Ptr) -> c_int;
        pub fn libvlc_media_player_pause(player: Ptr);
        pub fn libvlc_media_player_stop(player: Ptr);
        pub fn libvlc_media_player_is_playing(player: Ptr) -> c_int;
        pub fn libvlc_media_player_get_state(player: Ptr) -> c_int;
        pub fn libvlc_media_player_get_time(player: Ptr) -> i64;
        pub fn libvlc_media_player_set_time(player: Ptr, time: i64);
        pub fn libvlc_media_player_get_position(player: Ptr) -> c_float;
        pub fn libvlc_media_player_set_position(player: Ptr, position: c_float);
        pub fn libvlc_media_player_get_length(player: Ptr) -> i64;
        pub fn libvlc_media_player_next_chapter(player: Ptr);
        pub fn libvlc_media_player_previous_chapter(player: Ptr);
        pub fn libvlc_media_player_navigate(player: Ptr, navigate: c_uint);
        pub fn libvlc_media_player_get_title(player: Ptr) -> c_int;
        pub fn libvlc_media_player_set_title(player: Ptr, title: c_int);
        pub fn libvlc_media_player_get_title_count(player: Ptr) -> c_int;
        pub fn libvlc_media_player_get_chapter(player: Ptr) -> c_int;
        pub fn libvlc_media_player_set_chapter(player: Ptr, chapter: c_int);
        pub fn libvlc_media_player_get_chapter_count(player: Ptr) -> c_int;
        pub fn libvlc_media_player_get_chapter_count_for_title(player: Ptr, title: c_int)
        -> c_int;

        pub fn libvlc_audio_get_track(player: Ptr) -> c_int;
        pub fn libvlc_audio_set_track(player: Ptr, track: c_int) -> c_int;
        pub fn libvlc_audio_get_track_count(player: Ptr) -> c_int;
        pub fn libvlc_audio_get_track_description(player: Ptr) -> *mut RawTrackDescription;
        pub fn libvlc_video_get_track(player: Ptr) -> c_int;
        pub fn libvlc_video_set_track(player: Ptr, track: c_int) -> c_int;
        pub fn libvlc_video_get_track_count(player: Ptr) -> c_int;
        pub fn libvlc_video_get_track_description(player: Ptr) -> *mut RawTrackDescription;
        pub fn libvlc_video_get_spu(player: Ptr) -> c_int;
        pub fn libvlc_video_set_spu(player: Ptr, spu: c_int) -> c_int;
        pub fn libvlc_video_get_spu_count(player: Ptr) -> c_int;
        pub fn libvlc_video_get_spu_description(player: Ptr) -> *mut RawTrackDescription;
        pub fn libvlc_video_get_title_description(player: Ptr) -> *mut RawTrackDescription;
        pub fn libvlc_video_get_chapter_description(
            player: Ptr,
            title: c_int,
        ) -> *mut RawTrackDescription;
        pub fn libvlc_track_description_list_release(head: *mut RawTrackDescription);

        pub fn libvlc_media_list_player_new(instance: Ptr) -> Ptr;
        pub fn libvlc_media_list_player_retain(list_player: Ptr);
        pub fn libvlc_media_list_player_release(list_player: Ptr);
        pub fn libvlc_media_list_player_event_manager(list_player: Ptr) -> Ptr;
        pub fn libvlc_media_list_player_set_media_player(list_player: Ptr, player: Ptr);
        pub fn libvlc_media_list_player_set_media_list(list_player: Ptr, list: Ptr);
        pub fn libvlc_media_list_player_play(list_player: Ptr);
        pub fn libvlc_media_list_player_pause(list_player: Ptr);
        pub fn libvlc_media_list_player_stop(list_player: Ptr);
        pub fn libvlc_media_list_player_is_playing(list_player: Ptr) -> c_int;
        pub fn libvlc_media_list_player_get_state(list_player: Ptr) -> c_int;
        pub fn libvlc_media_list_player_play_item_at_index(list_player: Ptr, index: c_int)
        -> c_int;
        pub fn libvlc_media_list_player_next(list_player: Ptr) -> c_int;
        pub fn libvlc_media_list_player_previous(list_player: Ptr) -> c_int;
        pub fn libvlc_media_list_player_set_playback_mode(list_player: Ptr, mode: c_int);
    }
}

/// One libvlc instance.
///
/// Wrappers keep it alive through the shared [`Engine`](crate::Engine) `Arc`, so it is
/// released only after the last player or media created from it.
pub struct LibVlc {
    instance: NativeHandle,
}

impl LibVlc {
    /// Create an instance with libvlc command-line style `args` (e.g. `--no-video`).
    pub fn new<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let args = args
            .iter()
            .map(|a| {
                CString::new(a.as_ref()).map_err(|_| PlayerError::InteriorNul(a.as_ref().into()))
            })
            .collect::<Result<Vec<CString>>>()?;
        let argv: Vec<*const c_char> = args.iter().map(|a| a.as_ptr()).collect();

        let raw = unsafe { ffi::libvlc_new(argv.len() as c_int, argv.as_ptr()) };
        let instance = NativeHandle::from_ptr(raw).ok_or(PlayerError::EngineInit)?;
        tracing::info!(args = args.len(), "libvlc instance created");
        Ok(Self { instance })
    }
}

impl Drop for LibVlc {
    fn drop(&mut self) {
        unsafe { ffi::libvlc_release(self.instance.as_ptr()) };
    }
}

fn handle(ptr: *mut c_void) -> Option<NativeHandle> {
    NativeHandle::from_ptr(ptr)
}

impl NativeEngine for LibVlc {
    fn media_player_new(&self) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_player_new(self.instance.as_ptr()) })
    }

    fn media_list_player_new(&self) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_list_player_new(self.instance.as_ptr()) })
    }

    fn media_list_new(&self) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_list_new(self.instance.as_ptr()) })
    }

    fn media_new_location(&self, mrl: &CStr) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_new_location(self.instance.as_ptr(), mrl.as_ptr()) })
    }

    fn media_new_path(&self, path: &CStr) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_new_path(self.instance.as_ptr(), path.as_ptr()) })
    }

    fn retain(&self, kind: HandleKind, h: NativeHandle) {
        let p = h.as_ptr();
        unsafe {
            match kind {
                HandleKind::Media => ffi::libvlc_media_retain(p),
                HandleKind::MediaList => ffi::libvlc_media_list_retain(p),
                HandleKind::MediaPlayer => ffi::libvlc_media_player_retain(p),
                HandleKind::MediaListPlayer => ffi::libvlc_media_list_player_retain(p),
            }
        }
    }

    fn release(&self, kind: HandleKind, h: NativeHandle) {
        let p = h.as_ptr();
        unsafe {
            match kind {
                HandleKind::Media => ffi::libvlc_media_release(p),
                HandleKind::MediaList => ffi::libvlc_media_list_release(p),
                HandleKind::MediaPlayer => ffi::libvlc_media_player_release(p),
                HandleKind::MediaListPlayer => ffi::libvlc_media_list_player_release(p),
            }
        }
    }

    fn event_manager(&self, kind: HandleKind, h: NativeHandle) -> Option<NativeHandle> {
        let p = h.as_ptr();
        handle(unsafe {
            match kind {
                HandleKind::Media => ffi::libvlc_media_event_manager(p),
                HandleKind::MediaList => ffi::libvlc_media_list_event_manager(p),
                HandleKind::MediaPlayer => ffi::libvlc_media_player_event_manager(p),
                HandleKind::MediaListPlayer => ffi::libvlc_media_list_player_event_manager(p),
            }
        })
    }

    fn player_get(&self, player: NativeHandle, property: IntProperty) -> i32 {
        let p = player.as_ptr();
        unsafe {
            match property {
                IntProperty::AudioTrack => ffi::libvlc_audio_get_track(p),
                IntProperty::VideoTrack => ffi::libvlc_video_get_track(p),
                IntProperty::Subtitle => ffi::libvlc_video_get_spu(p),
                IntProperty::Title => ffi::libvlc_media_player_get_title(p),
                IntProperty::Chapter => ffi::libvlc_media_player_get_chapter(p),
            }
        }
    }

    fn player_set(&self, player: NativeHandle, property: IntProperty, value: i32) -> i32 {
        let p = player.as_ptr();
        unsafe {
            match property {
                IntProperty::AudioTrack => ffi::libvlc_audio_set_track(p, value),
                IntProperty::VideoTrack => ffi::libvlc_video_set_track(p, value),
                IntProperty::Subtitle => ffi::libvlc_video_set_spu(p, value),
                IntProperty::Title => {
                    ffi::libvlc_media_player_set_title(p, value);
                    0
                }
                IntProperty::Chapter => {
                    ffi::libvlc_media_player_set_chapter(p, value);
                    0
                }
            }
        }
    }

    fn player_count(&self, player: NativeHandle, count: Count) -> i32 {
        let p = player.as_ptr();
        unsafe {
            match count {
                Count::AudioTracks => ffi::libvlc_audio_get_track_count(p),
                Count::VideoTracks => ffi::libvlc_video_get_track_count(p),
                Count::Subtitles => ffi::libvlc_video_get_spu_count(p),
                Count::Titles => ffi::libvlc_media_player_get_title_count(p),
                Count::Chapters => ffi::libvlc_media_player_get_chapter_count(p),
                Count::ChaptersForTitle(title) => {
                    ffi::libvlc_media_player_get_chapter_count_for_title(p, title)
                }
            }
        }
    }

    fn player_descriptions(
        &self,
        player: NativeHandle,
        which: Descriptions,
    ) -> *mut RawTrackDescription {
        let p = player.as_ptr();
        unsafe {
            match which {
                Descriptions::AudioTracks => ffi::libvlc_audio_get_track_description(p),
                Descriptions::VideoTracks => ffi::libvlc_video_get_track_description(p),
                Descriptions::Subtitles => ffi::libvlc_video_get_spu_description(p),
                Descriptions::Titles => ffi::libvlc_video_get_title_description(p),
                Descriptions::Chapters { title } => {
                    ffi::libvlc_video_get_chapter_description(p, title)
                }
            }
        }
    }

    fn player_command(&self, player: NativeHandle, command: PlayerCommand) -> i32 {
        let p = player.as_ptr();
        unsafe {
            match command {
                PlayerCommand::Play => return ffi::libvlc_media_player_play(p),
                PlayerCommand::Pause => ffi::libvlc_media_player_pause(p),
                PlayerCommand::Stop => ffi::libvlc_media_player_stop(p),
                PlayerCommand::NextChapter => ffi::libvlc_media_player_next_chapter(p),
                PlayerCommand::PreviousChapter => ffi::libvlc_media_player_previous_chapter(p),
                PlayerCommand::Navigate(mode) => {
                    ffi::libvlc_media_player_navigate(p, mode.as_raw())
                }
            }
        }
        0
    }

    fn player_set_media(&self, player: NativeHandle, media: Option<NativeHandle>) {
        let media = media.map_or(std::ptr::null_mut(), NativeHandle::as_ptr);
        unsafe { ffi::libvlc_media_player_set_media(player.as_ptr(), media) }
    }

    fn player_media(&self, player: NativeHandle) -> Option<NativeHandle> {
        handle(unsafe { ffi::libvlc_media_player_get_media(player.as_ptr()) })
    }

    fn player_time(&self, player: NativeHandle) -> i64 {
        unsafe { ffi::libvlc_media_player_get_time(player.as_ptr()) }
    }

    fn player_set_time(&self, player: NativeHandle, ms: i64) {
        unsafe { ffi::libvlc_media_player_set_time(player.as_ptr(), ms) }
    }

    fn player_position(&self, player: NativeHandle) -> f32 {
        unsafe { ffi::libvlc_media_player_get_position(player.as_ptr()) }
    }

    fn player_set_position(&self, player: NativeHandle, position: f32) {
        unsafe { ffi::libvlc_media_player_set_position(player.as_ptr(), position) }
    }

    fn player_length(&self, player: NativeHandle) -> i64 {
        unsafe { ffi::libvlc_media_player_get_length(player.as_ptr()) }
    }

    fn player_is_playing(&self, player: NativeHandle) -> bool {
        unsafe { ffi::libvlc_media_player_is_playing(player.as_ptr()) != 0 }
    }

    fn player_state(&self, player: NativeHandle) -> i32 {
        unsafe { ffi::libvlc_media_player_get_state(player.as_ptr()) }
    }

    fn track_description_release(&self, head: *mut RawTrackDescription) {
        unsafe { ffi::libvlc_track_description_list_release(head) }
    }

    fn media_mrl(&self, media: NativeHandle) -> Option<String> {
        let raw = unsafe { ffi::libvlc_media_get_mrl(media.as_ptr()) };
        if raw.is_null() {
            return None;
        }
        let mrl = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { ffi::libvlc_free(raw.cast()) };
        Some(mrl)
    }

    fn media_list_add(&self, list: NativeHandle, media: NativeHandle) -> i32 {
        let l = list.as_ptr();
        unsafe {
            ffi::libvlc_media_list_lock(l);
            let status = ffi::libvlc_media_list_add_media(l, media.as_ptr());
            ffi::libvlc_media_list_unlock(l);
            status
        }
    }

    fn media_list_count(&self, list: NativeHandle) -> i32 {
        let l = list.as_ptr();
        unsafe {
            ffi::libvlc_media_list_lock(l);
            let count = ffi::libvlc_media_list_count(l);
            ffi::libvlc_media_list_unlock(l);
            count
        }
    }

    fn media_list_item_at(&self, list: NativeHandle, index: i32) -> Option<NativeHandle> {
        let l = list.as_ptr();
        handle(unsafe {
            ffi::libvlc_media_list_lock(l);
            let item = ffi::libvlc_media_list_item_at_index(l, index);
            ffi::libvlc_media_list_unlock(l);
            item
        })
    }

    fn list_player_set_media_list(&self, list_player: NativeHandle, list: NativeHandle) {
        unsafe { ffi::libvlc_media_list_player_set_media_list(list_player.as_ptr(), list.as_ptr()) }
    }

    fn list_player_set_media_player(&self, list_player: NativeHandle, player: NativeHandle) {
        unsafe {
            ffi::libvlc_media_list_player_set_media_player(list_player.as_ptr(), player.as_ptr())
        }
    }

    fn list_player_command(&self, list_player: NativeHandle, command: ListPlayerCommand) -> i32 {
        let p = list_player.as_ptr();
        unsafe {
            match command {
                ListPlayerCommand::Play => ffi::libvlc_media_list_player_play(p),
                ListPlayerCommand::Pause => ffi::libvlc_media_list_player_pause(p),
                ListPlayerCommand::Stop => ffi::libvlc_media_list_player_stop(p),
                ListPlayerCommand::Next => return ffi::libvlc_media_list_player_next(p),
                ListPlayerCommand::Previous => return ffi::libvlc_media_list_player_previous(p),
                ListPlayerCommand::PlayItemAt(index) => {
                    return ffi::libvlc_media_list_player_play_item_at_index(p, index);
                }
            }
        }
        0
    }

    fn list_player_set_playback_mode(&self, list_player: NativeHandle, mode: PlaybackMode) {
        unsafe {
            ffi::libvlc_media_list_player_set_playback_mode(list_player.as_ptr(), mode.as_raw())
        }
    }

    fn list_player_state(&self, list_player: NativeHandle) -> i32 {
        unsafe { ffi::libvlc_media_list_player_get_state(list_player.as_ptr()) }
    }

    fn list_player_is_playing(&self, list_player: NativeHandle) -> bool {
        unsafe { ffi::libvlc_media_list_player_is_playing(list_player.as_ptr()) != 0 }
    }
}
