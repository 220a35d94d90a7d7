//! Gesture commands: preset listing and headless playback

use anyhow::{Context, Result, bail};
use avatar_motion::{AvatarStage, Cursor, GesturePreset, StageConfig, StepOutcome};
use avatar_rig::{Axis, JointRole, RigTarget};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::load_stage_config;
use crate::utils::{add_table_row, create_table, format_angle, format_ms, format_percentage};

/// Output format for playback frames
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum GestureCommands {
    /// List the built-in gesture presets
    Presets,

    /// Play the intro of a model headlessly and print sampled frames
    Play {
        /// Path to the glTF/GLB file
        file: PathBuf,

        /// Gesture preset (overrides the config file)
        #[arg(short, long)]
        preset: Option<GesturePreset>,

        /// Stage configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated display refresh rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print every Nth frame
        #[arg(short, long, default_value = "15")]
        every: usize,

        /// Simulate a click on the avatar at this time (ms, repeatable)
        #[arg(long = "click-at")]
        click_at: Vec<f64>,

        /// Restart the gesture on clicks
        #[arg(long)]
        replay_on_click: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

pub fn execute(cmd: GestureCommands) -> Result<()> {
    match cmd {
        GestureCommands::Presets => {
            handle_presets();
            Ok(())
        }
        GestureCommands::Play {
            file,
            preset,
            config,
            fps,
            every,
            click_at,
            replay_on_click,
            format,
        } => handle_play(&PlayOptions {
            file,
            preset,
            config,
            fps,
            every,
            click_at,
            replay_on_click,
            format,
        }),
    }
}

fn handle_presets() {
    let mut table = create_table(&["Preset", "Duration", "Channels", "Description"]);
    for preset in GesturePreset::ALL {
        let session = preset.session(0.0);
        add_table_row(
            &mut table,
            vec![
                preset.name().to_string(),
                format_ms(session.duration_ms),
                session.channels.len().to_string(),
                preset.description().to_string(),
            ],
        );
    }
    table.printstd();
}

/// Upper bound on simulated time past the last scheduled event
const PLAYBACK_LIMIT_MS: f64 = 60_000.0;

struct PlayOptions {
    file: PathBuf,
    preset: Option<GesturePreset>,
    config: Option<PathBuf>,
    fps: u32,
    every: usize,
    click_at: Vec<f64>,
    replay_on_click: bool,
    format: OutputFormat,
}

/// One sampled frame of playback
#[derive(Debug, Serialize)]
struct FrameSample {
    t_ms: f64,
    state: &'static str,
    progress: Option<f64>,
    intensity: Option<f64>,
    joints: BTreeMap<&'static str, [f32; 3]>,
    root_y: f32,
    yaw: f32,
    bubble: Option<String>,
    opacity: f32,
    cursor: Cursor,
}

fn handle_play(options: &PlayOptions) -> Result<()> {
    if options.fps == 0 {
        bail!("--fps must be at least 1");
    }

    let mut config = load_stage_config(options.config.as_deref())?;
    if let Some(preset) = options.preset {
        config.gesture = preset;
    }
    config.click_replays_gesture |= options.replay_on_click;

    let mut stage = load_stage(&options.file, config)?;
    let frame_ms = 1000.0 / f64::from(options.fps);
    let every = options.every.max(1);

    let mut clicks = options.click_at.clone();
    clicks.sort_by(f64::total_cmp);
    let last_click = clicks.last().copied().unwrap_or(0.0);
    let mut clicks = clicks.into_iter().peekable();

    stage.arm_intro(0.0);
    let limit_ms = last_click.max(stage.config().intro_delay_ms) + PLAYBACK_LIMIT_MS;

    let mut samples = Vec::new();
    let mut frame = 0usize;
    loop {
        let now = frame as f64 * frame_ms;
        while clicks.next_if(|at| *at <= now).is_some() {
            if !stage.click(now, true) {
                log::warn!("Click at {} ignored: intro has not played yet", format_ms(now));
            }
        }

        let report = stage.frame(now, false);
        let finished = stage.has_played()
            && !stage.driver().is_running()
            && stage.overlay().pending() == 0
            && now >= last_click;

        if frame.is_multiple_of(every) || report.gesture == StepOutcome::Completed || finished {
            samples.push(sample(&stage, now, report.gesture, report.cursor));
        }
        if finished {
            break;
        }
        if now > limit_ms {
            bail!("Playback did not settle within {}", format_ms(limit_ms));
        }
        frame += 1;
    }

    match options.format {
        OutputFormat::Table => print_table(&stage, &samples),
        OutputFormat::Json => {
            for sample in &samples {
                println!("{}", serde_json::to_string(sample)?);
            }
        }
    }

    Ok(())
}

fn load_stage(file: &Path, config: StageConfig) -> Result<AvatarStage> {
    let stage = AvatarStage::load(file, config)
        .with_context(|| format!("Failed to load model '{}'", file.display()))?;

    let missing = stage.joints().missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|role| role.label()).collect();
        log::warn!("Joints not found, gesture will be partial: {}", names.join(", "));
    }
    Ok(stage)
}

fn sample(stage: &AvatarStage, now: f64, outcome: StepOutcome, cursor: Cursor) -> FrameSample {
    let (state, progress, intensity) = match outcome {
        StepOutcome::Idle => ("idle", None, None),
        StepOutcome::Animating {
            progress,
            intensity,
        } => ("running", Some(progress), Some(intensity)),
        StepOutcome::Completed => ("completed", None, None),
        StepOutcome::Finished => ("finished", None, None),
    };

    let skeleton = stage.skeleton();
    let joints = stage
        .joints()
        .iter()
        .map(|(role, joint)| {
            let mut rotation = [0.0; 3];
            for (slot, axis) in rotation.iter_mut().zip(Axis::ALL) {
                *slot = skeleton.rotation(joint, axis).unwrap_or(0.0);
            }
            (role.id(), rotation)
        })
        .collect();

    let root = skeleton.root();
    let bubble = stage.overlay().state();

    FrameSample {
        t_ms: now,
        state,
        progress,
        intensity,
        joints,
        root_y: root.position().y,
        yaw: root.yaw(),
        bubble: bubble.displayed.then(|| bubble.text.clone()),
        opacity: bubble.opacity,
        cursor,
    }
}

fn print_table(stage: &AvatarStage, samples: &[FrameSample]) {
    let mut table = create_table(&[
        "Time",
        "State",
        "Progress",
        "Intensity",
        "R arm z",
        "L arm z",
        "R forearm z",
        "L forearm z",
        "Root y",
        "Bubble",
    ]);

    let angle = |sample: &FrameSample, role: JointRole| {
        format_angle(sample.joints.get(role.id()).map(|rotation| rotation[2]))
    };

    for sample in samples {
        add_table_row(
            &mut table,
            vec![
                format_ms(sample.t_ms),
                sample.state.to_string(),
                sample.progress.map_or_else(|| "-".to_string(), format_percentage),
                sample
                    .intensity
                    .map_or_else(|| "-".to_string(), |value| format!("{value:.3}")),
                angle(sample, JointRole::RightArm),
                angle(sample, JointRole::LeftArm),
                angle(sample, JointRole::RightForearm),
                angle(sample, JointRole::LeftForearm),
                format!("{:+.4}", sample.root_y),
                match &sample.bubble {
                    Some(text) if sample.opacity > 0.0 => text.clone(),
                    Some(text) => format!("({text})"),
                    None => String::new(),
                },
            ],
        );
    }

    println!("Gesture: {}", stage.config().gesture);
    println!("Joints: {}/{}", stage.joints().len(), JointRole::ALL.len());
    println!();
    table.printstd();
}
