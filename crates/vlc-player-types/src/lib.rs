use serde::{Deserialize, Serialize};

/// One selectable track, subtitle, title or chapter reported by the engine.
///
/// Ids are assigned by the engine per list and are not globally unique.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TrackDescription {
    /// Engine-assigned identifier (the value to pass back to the matching setter).
    pub id: i32,
    /// Human-readable label.
    pub name: String,
}

/// Playback state reported by a player or list player.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaState {
    #[default]
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
    /// Raw value the engine reported that has no known meaning.
    Unknown(i32),
}

impl MediaState {
    /// Map a raw engine state value without reinterpreting unknown values.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => MediaState::NothingSpecial,
            1 => MediaState::Opening,
            2 => MediaState::Buffering,
            3 => MediaState::Playing,
            4 => MediaState::Paused,
            5 => MediaState::Stopped,
            6 => MediaState::Ended,
            7 => MediaState::Error,
            other => MediaState::Unknown(other),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            MediaState::NothingSpecial => 0,
            MediaState::Opening => 1,
            MediaState::Buffering => 2,
            MediaState::Playing => 3,
            MediaState::Paused => 4,
            MediaState::Stopped => 5,
            MediaState::Ended => 6,
            MediaState::Error => 7,
            MediaState::Unknown(raw) => raw,
        }
    }

    /// `true` once playback can no longer progress without a new command.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MediaState::Stopped | MediaState::Ended | MediaState::Error
        )
    }
}

/// How a list player advances once the current item ends.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Play the list once, in order.
    #[default]
    Default,
    /// Wrap around to the first item after the last.
    Loop,
    /// Repeat the current item.
    Repeat,
}

impl PlaybackMode {
    pub fn as_raw(self) -> i32 {
        match self {
            PlaybackMode::Default => 0,
            PlaybackMode::Loop => 1,
            PlaybackMode::Repeat => 2,
        }
    }
}

/// DVD-style menu navigation commands.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    Activate,
    Up,
    Down,
    Left,
    Right,
    Popup,
}

impl NavigationMode {
    pub fn as_raw(self) -> u32 {
        match self {
            NavigationMode::Activate => 0,
            NavigationMode::Up => 1,
            NavigationMode::Down => 2,
            NavigationMode::Left => 3,
            NavigationMode::Right => 4,
            NavigationMode::Popup => 5,
        }
    }
}

/// Point-in-time playback status of a player.
///
/// Engine "none" sentinels (`-1` times, negative positions) are reported as `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatus {
    /// Current engine state.
    pub state: MediaState,
    /// `true` while the engine is actively playing.
    pub is_playing: bool,
    /// Elapsed playback time in milliseconds.
    pub time_ms: Option<u64>,
    /// Total media length in milliseconds.
    pub length_ms: Option<u64>,
    /// Relative position in `0.0..=1.0`.
    pub position: Option<f32>,
    /// Location of the media currently loaded, if any.
    pub now_playing: Option<String>,
}

impl PlayerStatus {
    /// Convert an engine millisecond value, treating negative sentinels as unknown.
    pub fn millis(raw: i64) -> Option<u64> {
        u64::try_from(raw).ok()
    }

    /// Convert an engine position, treating negative sentinels as unknown.
    pub fn position(raw: f32) -> Option<f32> {
        (raw.is_finite() && raw >= 0.0).then_some(raw)
    }
}
