use clap::{Parser, ValueEnum};
use vlc_player::vlc_player_types::PlaybackMode;
use vlc_player::{InnerRelease, PlayerConfig};

#[derive(Parser, Debug)]
#[command(name = "list-play", version)]
pub struct Args {
    /// Files or MRLs to play, in order. Anything containing `://` is treated as an MRL.
    #[arg(required = true)]
    pub items: Vec<String>,

    /// How the list advances once an item ends
    #[arg(long, value_enum, default_value_t = Mode::Default)]
    pub mode: Mode,

    /// When the inner player gives up its own reference
    #[arg(long, value_enum, default_value_t = Release::OnDispose)]
    pub inner_release: Release,

    /// Index of the first item to play
    #[arg(long, default_value_t = 0)]
    pub start: i32,

    /// Extra argument passed to the engine (repeatable), e.g. `--vlc-arg=--no-video`
    #[arg(long = "vlc-arg", allow_hyphen_values = true)]
    pub vlc_args: Vec<String>,

    /// Log audio/subtitle/chapter descriptions once the first item is playing
    #[arg(long)]
    pub list_tracks: bool,

    /// Status poll interval in milliseconds
    #[arg(long, default_value_t = 500)]
    pub poll_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Default,
    Loop,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Release {
    OnDispose,
    AfterBind,
}

impl Args {
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            inner_release: match self.inner_release {
                Release::OnDispose => InnerRelease::OnDispose,
                Release::AfterBind => InnerRelease::AfterBind,
            },
            playback_mode: match self.mode {
                Mode::Default => PlaybackMode::Default,
                Mode::Loop => PlaybackMode::Loop,
                Mode::Repeat => PlaybackMode::Repeat,
            },
        }
    }
}

/// True when `item` should be opened as an MRL rather than a filesystem path.
pub fn is_location(item: &str) -> bool {
    item.contains("://")
}
