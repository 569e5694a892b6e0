//! In-memory engine used by unit tests.
//!
//! Objects are reference counted like the real engine, description lists are
//! real heap-allocated `RawTrackDescription` chains, and every trait call bumps
//! a counter so tests can assert that disposed wrappers never reach the engine.

use std::collections::{HashMap, HashSet};
use std::ffi::{CStr, CString, c_void};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard};

use vlc_player_types::{MediaState, PlaybackMode};

use crate::native::{
    Count, Descriptions, Engine, HandleKind, IntProperty, ListPlayerCommand, NativeEngine,
    NativeHandle, PlayerCommand, RawTrackDescription,
};

const FAKE_LENGTH_MS: i64 = 90_000;

#[derive(Clone, Debug)]
pub(crate) struct FakeTrack {
    id: i32,
    name: String,
}

impl FakeTrack {
    pub(crate) fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Default)]
struct PlayerObject {
    media: Option<NativeHandle>,
    state: MediaState,
    time: i64,
    position: f32,
    ints: HashMap<IntProperty, i32>,
    commands: Vec<PlayerCommand>,
}

#[derive(Default)]
struct ListPlayerObject {
    list: Option<NativeHandle>,
    player: Option<NativeHandle>,
    index: Option<usize>,
    mode: PlaybackMode,
}

enum Body {
    Media { mrl: String },
    MediaList { items: Vec<NativeHandle> },
    Player(PlayerObject),
    ListPlayer(ListPlayerObject),
}

struct Object {
    kind: HandleKind,
    refs: u32,
    body: Body,
}

#[derive(Default)]
struct FakeState {
    next_addr: usize,
    calls: usize,
    objects: HashMap<NativeHandle, Object>,
    releases: Vec<NativeHandle>,
    counts: HashMap<Count, i32>,
    descriptions: HashMap<Descriptions, Vec<FakeTrack>>,
    live_lists: HashSet<usize>,
    description_releases: Vec<usize>,
    fail_player_creation: bool,
}

impl FakeState {
    fn alloc(&mut self, kind: HandleKind, body: Body) -> NativeHandle {
        self.next_addr += 0x10;
        let raw = NativeHandle::from_ptr((0x1000 + self.next_addr) as *mut c_void)
            .expect("fake addresses are non-null");
        self.objects.insert(
            raw,
            Object {
                kind,
                refs: 1,
                body,
            },
        );
        raw
    }

    fn object(&mut self, handle: NativeHandle) -> &mut Object {
        self.objects
            .get_mut(&handle)
            .unwrap_or_else(|| panic!("fake engine: use of dead handle {handle:?}"))
    }

    fn retain(&mut self, handle: NativeHandle) {
        self.object(handle).refs += 1;
    }

    fn unref(&mut self, handle: NativeHandle) {
        let obj = self.object(handle);
        assert!(obj.refs > 0, "fake engine: refcount underflow for {handle:?}");
        obj.refs -= 1;
        if obj.refs > 0 {
            return;
        }
        let Some(obj) = self.objects.remove(&handle) else {
            return;
        };
        match obj.body {
            Body::Media { .. } => {}
            Body::MediaList { items } => {
                for item in items {
                    self.unref(item);
                }
            }
            Body::Player(player) => {
                if let Some(media) = player.media {
                    self.unref(media);
                }
            }
            Body::ListPlayer(lp) => {
                if let Some(player) = lp.player {
                    self.unref(player);
                }
                if let Some(list) = lp.list {
                    self.unref(list);
                }
            }
        }
    }

    fn player(&mut self, handle: NativeHandle) -> &mut PlayerObject {
        match &mut self.object(handle).body {
            Body::Player(player) => player,
            _ => panic!("fake engine: {handle:?} is not a media player"),
        }
    }

    fn list_player(&mut self, handle: NativeHandle) -> &mut ListPlayerObject {
        match &mut self.object(handle).body {
            Body::ListPlayer(lp) => lp,
            _ => panic!("fake engine: {handle:?} is not a list player"),
        }
    }

    fn list_items(&mut self, handle: NativeHandle) -> Vec<NativeHandle> {
        match &self.object(handle).body {
            Body::MediaList { items } => items.clone(),
            _ => panic!("fake engine: {handle:?} is not a media list"),
        }
    }

    fn set_player_media(&mut self, player: NativeHandle, media: Option<NativeHandle>) {
        if let Some(media) = media {
            self.retain(media);
        }
        let previous = {
            let p = self.player(player);
            p.time = 0;
            p.position = 0.0;
            p.state = MediaState::NothingSpecial;
            std::mem::replace(&mut p.media, media)
        };
        if let Some(previous) = previous {
            self.unref(previous);
        }
    }

    fn play_player(&mut self, player: NativeHandle) -> i32 {
        let p = self.player(player);
        p.commands.push(PlayerCommand::Play);
        if p.media.is_none() {
            return -1;
        }
        p.state = MediaState::Playing;
        0
    }

    fn play_list_item(&mut self, list_player: NativeHandle, index: i64) -> i32 {
        let (list, player) = {
            let lp = self.list_player(list_player);
            (lp.list, lp.player)
        };
        let (Some(list), Some(player)) = (list, player) else {
            return -1;
        };
        let items = self.list_items(list);
        let Ok(index) = usize::try_from(index) else {
            return -1;
        };
        let Some(media) = items.get(index).copied() else {
            return -1;
        };
        self.list_player(list_player).index = Some(index);
        self.set_player_media(player, Some(media));
        self.play_player(player)
    }

    fn step(&mut self, list_player: NativeHandle, forward: bool) -> i32 {
        let (list, index, mode) = {
            let lp = self.list_player(list_player);
            (lp.list, lp.index, lp.mode)
        };
        let Some(list) = list else {
            return -1;
        };
        let len = self.list_items(list).len() as i64;
        if len == 0 {
            return -1;
        }
        let next = match (index, forward) {
            (None, _) => 0,
            (Some(i), true) => i as i64 + 1,
            (Some(i), false) => i as i64 - 1,
        };
        let next = if mode == PlaybackMode::Loop {
            next.rem_euclid(len)
        } else {
            next
        };
        self.play_list_item(list_player, next)
    }
}

fn alloc_chain(entries: &[(i32, Option<&str>)]) -> *mut RawTrackDescription {
    let mut head: *mut RawTrackDescription = ptr::null_mut();
    for (id, name) in entries.iter().rev() {
        let psz_name = match name {
            Some(name) => CString::new(*name).unwrap().into_raw(),
            None => ptr::null_mut(),
        };
        head = Box::into_raw(Box::new(RawTrackDescription {
            i_id: *id,
            psz_name,
            p_next: head,
        }));
    }
    head
}

/// In-memory [`NativeEngine`].
pub(crate) struct Fake {
    state: Mutex<FakeState>,
}

impl Fake {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Lock and count one engine call.
    fn call(&self) -> MutexGuard<'_, FakeState> {
        let mut state = self.lock();
        state.calls += 1;
        state
    }
}

/// Test handle to a shared [`Fake`] engine plus inspection helpers.
pub(crate) struct FakeEngine {
    fake: Arc<Fake>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            fake: Arc::new(Fake {
                state: Mutex::new(FakeState::default()),
            }),
        }
    }

    pub(crate) fn engine(&self) -> Engine {
        self.fake.clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.fake.lock().calls
    }

    pub(crate) fn release_count(&self, handle: NativeHandle) -> usize {
        self.fake
            .lock()
            .releases
            .iter()
            .filter(|h| **h == handle)
            .count()
    }

    /// Handles passed to `release`, in call order.
    pub(crate) fn release_log(&self) -> Vec<NativeHandle> {
        self.fake.lock().releases.clone()
    }

    pub(crate) fn is_alive(&self, handle: NativeHandle) -> bool {
        self.fake.lock().objects.contains_key(&handle)
    }

    pub(crate) fn live_count(&self, kind: HandleKind) -> usize {
        self.fake
            .lock()
            .objects
            .values()
            .filter(|o| o.kind == kind)
            .count()
    }

    pub(crate) fn set_count(&self, count: Count, value: i32) {
        self.fake.lock().counts.insert(count, value);
    }

    pub(crate) fn set_descriptions(&self, which: Descriptions, tracks: Vec<FakeTrack>) {
        self.fake.lock().descriptions.insert(which, tracks);
    }

    pub(crate) fn fail_next_player_creation(&self) {
        self.fake.lock().fail_player_creation = true;
    }

    pub(crate) fn alloc_descriptions(&self, entries: &[(i32, String)]) -> *mut RawTrackDescription {
        let entries: Vec<(i32, Option<&str>)> = entries
            .iter()
            .map(|(id, name)| (*id, Some(name.as_str())))
            .collect();
        self.alloc_raw_descriptions(&entries)
    }

    /// Build a native-layout list; `None` names become null pointers.
    pub(crate) fn alloc_raw_descriptions(
        &self,
        entries: &[(i32, Option<&str>)],
    ) -> *mut RawTrackDescription {
        let head = alloc_chain(entries);
        if !head.is_null() {
            self.fake.lock().live_lists.insert(head as usize);
        }
        head
    }

    /// Heads passed to `track_description_release`, in call order.
    pub(crate) fn description_releases(&self) -> Vec<usize> {
        self.fake.lock().description_releases.clone()
    }

    pub(crate) fn outstanding_description_lists(&self) -> usize {
        self.fake.lock().live_lists.len()
    }

    pub(crate) fn player_commands(&self, player: NativeHandle) -> Vec<PlayerCommand> {
        self.fake.lock().player(player).commands.clone()
    }

    pub(crate) fn current_media(&self, player: NativeHandle) -> Option<NativeHandle> {
        self.fake.lock().player(player).media
    }

    pub(crate) fn bound_list(&self, list_player: NativeHandle) -> Option<NativeHandle> {
        self.fake.lock().list_player(list_player).list
    }

    pub(crate) fn bound_player(&self, list_player: NativeHandle) -> Option<NativeHandle> {
        self.fake.lock().list_player(list_player).player
    }

    pub(crate) fn list_playback_mode(&self, list_player: NativeHandle) -> Option<PlaybackMode> {
        let mut state = self.fake.lock();
        if !state.objects.contains_key(&list_player) {
            return None;
        }
        Some(state.list_player(list_player).mode)
    }

    pub(crate) fn default_length(&self) -> i64 {
        FAKE_LENGTH_MS
    }
}

impl NativeEngine for Fake {
    fn media_player_new(&self) -> Option<NativeHandle> {
        let mut state = self.call();
        if std::mem::take(&mut state.fail_player_creation) {
            return None;
        }
        Some(state.alloc(
            HandleKind::MediaPlayer,
            Body::Player(PlayerObject::default()),
        ))
    }

    fn media_list_player_new(&self) -> Option<NativeHandle> {
        Some(self.call().alloc(
            HandleKind::MediaListPlayer,
            Body::ListPlayer(ListPlayerObject::default()),
        ))
    }

    fn media_list_new(&self) -> Option<NativeHandle> {
        Some(
            self.call()
                .alloc(HandleKind::MediaList, Body::MediaList { items: Vec::new() }),
        )
    }

    fn media_new_location(&self, mrl: &CStr) -> Option<NativeHandle> {
        let mrl = mrl.to_string_lossy().into_owned();
        Some(self.call().alloc(HandleKind::Media, Body::Media { mrl }))
    }

    fn media_new_path(&self, path: &CStr) -> Option<NativeHandle> {
        let mrl = format!("file://{}", path.to_string_lossy());
        Some(self.call().alloc(HandleKind::Media, Body::Media { mrl }))
    }

    fn retain(&self, kind: HandleKind, handle: NativeHandle) {
        let mut state = self.call();
        assert_eq!(state.object(handle).kind, kind);
        state.retain(handle);
    }

    fn release(&self, kind: HandleKind, handle: NativeHandle) {
        let mut state = self.call();
        assert_eq!(state.object(handle).kind, kind);
        state.releases.push(handle);
        state.unref(handle);
    }

    fn event_manager(&self, kind: HandleKind, handle: NativeHandle) -> Option<NativeHandle> {
        let mut state = self.call();
        assert_eq!(state.object(handle).kind, kind);
        NativeHandle::from_ptr((handle.addr() + 8) as *mut c_void)
    }

    fn player_get(&self, player: NativeHandle, property: IntProperty) -> i32 {
        let mut state = self.call();
        state
            .player(player)
            .ints
            .get(&property)
            .copied()
            .unwrap_or(0)
    }

    fn player_set(&self, player: NativeHandle, property: IntProperty, value: i32) -> i32 {
        self.call().player(player).ints.insert(property, value);
        0
    }

    fn player_count(&self, player: NativeHandle, count: Count) -> i32 {
        let mut state = self.call();
        state.player(player);
        let fallback = if count == Count::Titles { -1 } else { 0 };
        state.counts.get(&count).copied().unwrap_or(fallback)
    }

    fn player_descriptions(
        &self,
        player: NativeHandle,
        which: Descriptions,
    ) -> *mut RawTrackDescription {
        let tracks = {
            let mut state = self.call();
            state.player(player);
            state.descriptions.get(&which).cloned().unwrap_or_default()
        };
        let entries: Vec<(i32, Option<&str>)> = tracks
            .iter()
            .map(|t| (t.id, Some(t.name.as_str())))
            .collect();
        let head = alloc_chain(&entries);
        if !head.is_null() {
            self.lock().live_lists.insert(head as usize);
        }
        head
    }

    fn player_command(&self, player: NativeHandle, command: PlayerCommand) -> i32 {
        let mut state = self.call();
        if command == PlayerCommand::Play {
            return state.play_player(player);
        }
        let p = state.player(player);
        p.commands.push(command);
        match command {
            PlayerCommand::Pause if p.state == MediaState::Playing => p.state = MediaState::Paused,
            PlayerCommand::Stop if p.media.is_some() => p.state = MediaState::Stopped,
            _ => {}
        }
        0
    }

    fn player_set_media(&self, player: NativeHandle, media: Option<NativeHandle>) {
        self.call().set_player_media(player, media);
    }

    fn player_media(&self, player: NativeHandle) -> Option<NativeHandle> {
        let mut state = self.call();
        let media = state.player(player).media;
        if let Some(media) = media {
            state.retain(media);
        }
        media
    }

    fn player_time(&self, player: NativeHandle) -> i64 {
        let mut state = self.call();
        let p = state.player(player);
        if p.media.is_some() { p.time } else { -1 }
    }

    fn player_set_time(&self, player: NativeHandle, ms: i64) {
        self.call().player(player).time = ms;
    }

    fn player_position(&self, player: NativeHandle) -> f32 {
        let mut state = self.call();
        let p = state.player(player);
        if p.media.is_some() { p.position } else { -1.0 }
    }

    fn player_set_position(&self, player: NativeHandle, position: f32) {
        self.call().player(player).position = position;
    }

    fn player_length(&self, player: NativeHandle) -> i64 {
        let mut state = self.call();
        if state.player(player).media.is_some() {
            FAKE_LENGTH_MS
        } else {
            -1
        }
    }

    fn player_is_playing(&self, player: NativeHandle) -> bool {
        self.call().player(player).state == MediaState::Playing
    }

    fn player_state(&self, player: NativeHandle) -> i32 {
        self.call().player(player).state.as_raw()
    }

    fn track_description_release(&self, head: *mut RawTrackDescription) {
        {
            let mut state = self.call();
            assert!(
                state.live_lists.remove(&(head as usize)),
                "fake engine: description list {head:?} released twice or never allocated"
            );
            state.description_releases.push(head as usize);
        }
        let mut node = head;
        while !node.is_null() {
            // SAFETY: nodes were built by `alloc_raw_descriptions` with Box/CString.
            let boxed = unsafe { Box::from_raw(node) };
            if !boxed.psz_name.is_null() {
                drop(unsafe { CString::from_raw(boxed.psz_name) });
            }
            node = boxed.p_next;
        }
    }

    fn media_mrl(&self, media: NativeHandle) -> Option<String> {
        match &self.call().object(media).body {
            Body::Media { mrl } => Some(mrl.clone()),
            _ => panic!("fake engine: {media:?} is not media"),
        }
    }

    fn media_list_add(&self, list: NativeHandle, media: NativeHandle) -> i32 {
        let mut state = self.call();
        state.retain(media);
        match &mut state.object(list).body {
            Body::MediaList { items } => items.push(media),
            _ => panic!("fake engine: {list:?} is not a media list"),
        }
        0
    }

    fn media_list_count(&self, list: NativeHandle) -> i32 {
        self.call().list_items(list).len() as i32
    }

    fn media_list_item_at(&self, list: NativeHandle, index: i32) -> Option<NativeHandle> {
        let mut state = self.call();
        let items = state.list_items(list);
        let media = usize::try_from(index).ok().and_then(|i| items.get(i).copied())?;
        state.retain(media);
        Some(media)
    }

    fn list_player_set_media_list(&self, list_player: NativeHandle, list: NativeHandle) {
        let mut state = self.call();
        state.retain(list);
        let previous = state.list_player(list_player).list.replace(list);
        if let Some(previous) = previous {
            state.unref(previous);
        }
    }

    fn list_player_set_media_player(&self, list_player: NativeHandle, player: NativeHandle) {
        let mut state = self.call();
        state.retain(player);
        let previous = state.list_player(list_player).player.replace(player);
        if let Some(previous) = previous {
            state.unref(previous);
        }
    }

    fn list_player_command(&self, list_player: NativeHandle, command: ListPlayerCommand) -> i32 {
        let mut state = self.call();
        match command {
            ListPlayerCommand::PlayItemAt(index) => {
                state.play_list_item(list_player, i64::from(index))
            }
            ListPlayerCommand::Next => state.step(list_player, true),
            ListPlayerCommand::Previous => state.step(list_player, false),
            ListPlayerCommand::Play => {
                let lp = state.list_player(list_player);
                match (lp.index, lp.player) {
                    (None, _) => state.play_list_item(list_player, 0),
                    (Some(_), Some(player)) => state.play_player(player),
                    (Some(_), None) => -1,
                }
            }
            ListPlayerCommand::Pause | ListPlayerCommand::Stop => {
                let Some(player) = state.list_player(list_player).player else {
                    return -1;
                };
                let p = state.player(player);
                p.state = if command == ListPlayerCommand::Pause {
                    MediaState::Paused
                } else {
                    MediaState::Stopped
                };
                0
            }
        }
    }

    fn list_player_set_playback_mode(&self, list_player: NativeHandle, mode: PlaybackMode) {
        self.call().list_player(list_player).mode = mode;
    }

    fn list_player_state(&self, list_player: NativeHandle) -> i32 {
        let mut state = self.call();
        match state.list_player(list_player).player {
            Some(player) => state.player(player).state.as_raw(),
            None => MediaState::NothingSpecial.as_raw(),
        }
    }

    fn list_player_is_playing(&self, list_player: NativeHandle) -> bool {
        let mut state = self.call();
        match state.list_player(list_player).player {
            Some(player) => state.player(player).state == MediaState::Playing,
            None => false,
        }
    }
}
