//! Lazy iteration over engine-allocated track description lists.
//!
//! The engine returns descriptions as a singly-linked C list that must be freed
//! with one call on its head. [`TrackDescriptions`] copies one node per `next()`
//! into an owned [`TrackDescription`] and frees the list exactly once:
//! - when iteration reports exhaustion, or
//! - on drop, if the caller stops early.

use std::ffi::CStr;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use vlc_player_types::TrackDescription;

use crate::native::{Engine, RawTrackDescription};

/// One-shot iterator over a native description list.
pub struct TrackDescriptions {
    engine: Engine,
    head: *mut RawTrackDescription,
    cursor: *mut RawTrackDescription,
}

impl TrackDescriptions {
    /// Take ownership of a list returned by `engine`.
    ///
    /// A null `head` yields nothing and is never handed back to the engine.
    ///
    /// # Safety
    /// `head` must be null or the head of a list allocated by `engine` that has not
    /// been released and is owned by nobody else. The chain must be null-terminated
    /// and acyclic; a cyclic list makes iteration loop forever.
    pub unsafe fn from_raw(engine: Engine, head: *mut RawTrackDescription) -> Self {
        Self {
            engine,
            head,
            cursor: head,
        }
    }

    /// Free the list if we still own it.
    fn release(&mut self) {
        if self.head.is_null() {
            return;
        }
        let head = std::mem::replace(&mut self.head, ptr::null_mut());
        self.cursor = ptr::null_mut();
        tracing::trace!(head = ?head, "track description list released");
        self.engine.track_description_release(head);
    }
}

impl Iterator for TrackDescriptions {
    type Item = TrackDescription;

    fn next(&mut self) -> Option<TrackDescription> {
        if self.cursor.is_null() {
            self.release();
            return None;
        }

        // SAFETY: `cursor` is a node of the list we own (see `from_raw`), and the
        // list is only freed through `release`, which nulls `cursor` first.
        let node = unsafe { &*self.cursor };
        let name = if node.psz_name.is_null() {
            String::new()
        } else {
            // SAFETY: non-null names are NUL-terminated strings owned by the node.
            unsafe { CStr::from_ptr(node.psz_name) }
                .to_string_lossy()
                .into_owned()
        };
        self.cursor = node.p_next;

        Some(TrackDescription { id: node.i_id, name })
    }
}

impl FusedIterator for TrackDescriptions {}

impl Drop for TrackDescriptions {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TrackDescriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackDescriptions")
            .field("head", &self.head)
            .field("cursor", &self.cursor)
            .finish()
    }
}
