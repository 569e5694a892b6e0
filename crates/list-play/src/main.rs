//! list-play: play a list of files or MRLs through `MediaListPlayer`.
//!
//! The engine owns decode, output and list advancement. This binary only builds
//! the list, starts playback at `--start` and logs a status line every
//! `--poll-ms` until the list finishes or Ctrl-C is pressed.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vlc_player::vlc_player_types::MediaState;
use vlc_player::{Engine, Media, MediaList, MediaListPlayer, Player};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,list_play=info,vlc_player=info")
        }))
        .init();

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        let _ = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst));
    }

    let engine = open_engine(&args.vlc_args)?;
    let list = build_list(&engine, &args.items)?;
    let mut player = MediaListPlayer::new(&engine, list, &args.player_config())
        .context("create list player")?;
    tracing::info!(
        items = args.items.len(),
        mode = ?args.mode,
        inner_release = ?args.inner_release,
        "list player ready"
    );

    player
        .play_item_at(args.start)
        .with_context(|| format!("start playback at item {}", args.start))?;

    let result = watch(&player, &args, &stop);
    if let Err(e) = player.stop() {
        tracing::warn!("stop failed: {e}");
    }
    player.dispose();
    result
}

#[cfg(feature = "libvlc")]
fn open_engine(vlc_args: &[String]) -> Result<Engine> {
    let vlc = vlc_player::libvlc::LibVlc::new(vlc_args).context("initialize libvlc")?;
    Ok(Arc::new(vlc))
}

#[cfg(not(feature = "libvlc"))]
fn open_engine(_vlc_args: &[String]) -> Result<Engine> {
    anyhow::bail!("list-play was built without the `libvlc` feature")
}

fn build_list(engine: &Engine, items: &[String]) -> Result<MediaList> {
    let list = MediaList::new(engine).context("create media list")?;
    for item in items {
        let media = if cli::is_location(item) {
            Media::from_location(engine, item)
        } else {
            Media::from_path(engine, Path::new(item))
        }
        .with_context(|| format!("open {item}"))?;
        list.add_media(&media)
            .with_context(|| format!("add {item} to list"))?;
        tracing::debug!(item = %item, "queued");
    }
    Ok(list)
}

/// Poll until the list player reaches a terminal state or `stop` is raised.
fn watch(player: &MediaListPlayer, args: &cli::Args, stop: &AtomicBool) -> Result<()> {
    let poll = Duration::from_millis(args.poll_ms.max(10));
    let mut tracks_logged = !args.list_tracks;
    let mut started = false;

    while !stop.load(Ordering::SeqCst) {
        std::thread::sleep(poll);

        let status = player.status()?;
        tracing::info!(
            state = ?status.state,
            time_ms = ?status.time_ms,
            length_ms = ?status.length_ms,
            now_playing = status.now_playing.as_deref().unwrap_or("-"),
            "status"
        );

        if status.is_playing {
            started = true;
            if !tracks_logged {
                log_tracks(player)?;
                tracks_logged = true;
            }
        }

        let list_state = player.player_state()?;
        if list_state == MediaState::Error || (started && list_state.is_terminal()) {
            tracing::info!(state = ?list_state, "list finished");
            return Ok(());
        }
    }

    tracing::info!("interrupted");
    Ok(())
}

fn log_tracks(player: &MediaListPlayer) -> Result<()> {
    let disk = player.inner_player()?;
    for track in disk.audio_tracks_info()? {
        tracing::info!(id = track.id, name = %track.name, "audio track");
    }
    for track in disk.subtitle_tracks_info()? {
        tracing::info!(id = track.id, name = %track.name, "subtitle");
    }
    let title = disk.title()?;
    for chapter in disk.chapter_description(title)? {
        tracing::info!(title, id = chapter.id, name = %chapter.name, "chapter");
    }
    Ok(())
}
