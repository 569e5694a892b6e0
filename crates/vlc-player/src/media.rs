//! Media and media list wrappers.

use std::ffi::CString;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::error::{PlayerError, Result};
use crate::handle::OwnedHandle;
use crate::native::{Engine, HandleKind, NativeHandle};

fn to_cstring(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| PlayerError::InteriorNul(value.to_string()))
}

/// One media resource (file, URL, disc) known to the engine.
pub struct Media {
    handle: OwnedHandle,
}

impl Media {
    /// Create media from an MRL such as `file:///music/a.flac` or `dvd:///dev/sr0`.
    pub fn from_location(engine: &Engine, mrl: &str) -> Result<Self> {
        let location = to_cstring(mrl)?;
        let raw = engine
            .media_new_location(&location)
            .ok_or(PlayerError::CreateFailed(HandleKind::Media))?;
        Ok(Self::adopt(engine, raw))
    }

    /// Create media from a local filesystem path.
    pub fn from_path(engine: &Engine, path: &Path) -> Result<Self> {
        let path = path.to_string_lossy();
        let path = to_cstring(&path)?;
        let raw = engine
            .media_new_path(&path)
            .ok_or(PlayerError::CreateFailed(HandleKind::Media))?;
        Ok(Self::adopt(engine, raw))
    }

    /// Wrap a media reference already owned by the caller (e.g. from
    /// [`NativeEngine::player_media`](crate::native::NativeEngine::player_media)).
    pub(crate) fn adopt(engine: &Engine, raw: NativeHandle) -> Self {
        Self {
            handle: OwnedHandle::new(engine.clone(), HandleKind::Media, raw),
        }
    }

    /// MRL the engine resolved for this media.
    pub fn mrl(&self) -> Result<Option<String>> {
        let raw = self.handle.live()?;
        Ok(self.handle.engine().media_mrl(raw))
    }

    pub(crate) fn live(&self) -> Result<NativeHandle> {
        self.handle.live()
    }

    pub fn native_handle(&self) -> NativeHandle {
        self.handle.raw()
    }

    pub fn dispose(&mut self) {
        self.handle.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_released()
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.native_handle() == other.native_handle()
    }
}

impl Eq for Media {}

impl Hash for Media {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native_handle().hash(state);
    }
}

impl std::fmt::Debug for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Media")
            .field("handle", &self.handle.raw())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Ordered collection of media handed to a list player.
pub struct MediaList {
    handle: OwnedHandle,
}

impl MediaList {
    pub fn new(engine: &Engine) -> Result<Self> {
        let raw = engine
            .media_list_new()
            .ok_or(PlayerError::CreateFailed(HandleKind::MediaList))?;
        Ok(Self {
            handle: OwnedHandle::new(engine.clone(), HandleKind::MediaList, raw),
        })
    }

    /// Append `media`; the list takes its own reference, `media` stays usable.
    pub fn add_media(&self, media: &Media) -> Result<()> {
        let list = self.handle.live()?;
        let media = media.live()?;
        PlayerError::check("media_list_add", self.handle.engine().media_list_add(list, media))
    }

    /// Number of items, as reported by the engine.
    pub fn count(&self) -> Result<i32> {
        let list = self.handle.live()?;
        Ok(self.handle.engine().media_list_count(list))
    }

    /// Item at `index`, or `None` when the engine has no such item.
    pub fn item_at(&self, index: i32) -> Result<Option<Media>> {
        let list = self.handle.live()?;
        let engine = self.handle.engine();
        Ok(engine
            .media_list_item_at(list, index)
            .map(|raw| Media::adopt(engine, raw)))
    }

    pub(crate) fn live(&self) -> Result<NativeHandle> {
        self.handle.live()
    }

    pub fn native_handle(&self) -> NativeHandle {
        self.handle.raw()
    }

    pub fn dispose(&mut self) {
        self.handle.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_released()
    }
}

impl std::fmt::Debug for MediaList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaList")
            .field("handle", &self.handle.raw())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
