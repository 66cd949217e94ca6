mod host;
mod script;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use freeze_core::{FreezeEngine, FreezeSettings, FrameSize, HotkeyEvent};
use log::{info, warn};

use crate::host::VirtualHost;
use crate::script::{default_script, Cue};

const FRAME_DT: Duration = Duration::from_micros(33_333);
const TOTAL_FRAMES: u64 = 360;
/// Renders per frame period; later ones must not capture again.
const RENDERS_PER_FRAME: usize = 2;

fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "freeze.toml".to_string());
    let settings = FreezeSettings::load_or_default(&path)
        .with_context(|| format!("loading settings from {path}"))?;
    info!(target: "demo", "settings path='{}' frames={} mode={:?}", path, settings.frames, settings.freeze_mode);

    let mut engine: FreezeEngine<host::VirtualFrame> = FreezeEngine::from_settings(&settings);
    let cfg = engine.config();
    info!(
        target: "demo",
        "engine capacity={} fade_ms={} duration_cap_ms={}",
        cfg.capacity,
        cfg.fade_duration.as_millis(),
        cfg.duration_cap.as_millis()
    );
    let mut host = VirtualHost::new(FrameSize::new(1920, 1080));
    let mut script = default_script().into_iter().peekable();

    for frame in 0..TOTAL_FRAMES {
        host.frame_index = frame;

        while let Some((_, cue)) = script.next_if(|(at, _)| *at == frame) {
            info!(target: "demo", "cue frame={} {:?}", frame, cue);
            match cue {
                Cue::Lifecycle(event) => engine.on_lifecycle(event, &mut host),
                Cue::Hotkey(name) => match HotkeyEvent::from_name(name) {
                    Some(event) => {
                        let handled = engine.on_hotkey(event, true, &mut host);
                        engine.on_hotkey(event, false, &mut host);
                        info!(target: "demo", "hotkey name={} handled={}", event.name(), handled);
                    }
                    None => warn!(target: "demo", "hotkey.unknown name={}", name),
                },
                Cue::Resize(size) => host.target = Some(size),
                Cue::DropTarget => host.target = None,
            }
        }

        engine.tick(FRAME_DT, &mut host);
        if host.enabled {
            for _ in 0..RENDERS_PER_FRAME {
                engine.render(&mut host);
            }
        }

        if frame % 30 == 0 {
            let s = engine.snapshot();
            info!(
                target: "demo",
                "frame={} enabled={} loaded={} buffered={} current={} fading={} opacity={:.2}",
                frame,
                host.enabled,
                s.frames_loaded,
                s.buffered,
                s.current_frame,
                s.fading,
                s.opacity
            );
        }
    }

    engine.teardown(&mut host);

    let stats = host.stats;
    info!(
        target: "demo",
        "done allocated={} recycled={} released={} frozen_draws={} pass_through={}",
        stats.allocated,
        stats.recycled,
        stats.released,
        stats.frozen_draws,
        stats.pass_through
    );

    if host.live_frames() != 0 {
        bail!("{} frames leaked after teardown", host.live_frames());
    }
    Ok(())
}
