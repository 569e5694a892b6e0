use serde::Deserialize;
use vlc_player_types::PlaybackMode;

/// When the inner player of a list player gives up its own native reference.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InnerRelease {
    /// Keep the inner reference until the list player is disposed.
    #[default]
    OnDispose,
    /// Release it right after binding; the list player's own reference keeps
    /// the inner player alive and callable.
    AfterBind,
}

/// List player construction parameters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Inner player reference policy.
    pub inner_release: InnerRelease,
    /// Playback mode applied right after construction.
    pub playback_mode: PlaybackMode,
}
