//! tracker-voice - audition tool for tracker instruments
//!
//! Run with: cargo run -- play --demo synth

mod app;
mod demo;
mod render;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result as EyreResult;

#[derive(Parser, Debug)]
#[command(name = "tracker-voice", version, about = "Play and render tracker instruments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play an instrument live from the computer keyboard
    Play {
        /// Instrument blob to load; a built-in demo is used when omitted
        instrument: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = DemoKind::Synth)]
        demo: DemoKind,

        /// Octave of the lower keyboard row
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(0..=9))]
        octave: u8,

        #[arg(long, default_value_t = 127, value_parser = clap::value_parser!(u8).range(1..=127))]
        velocity: u8,
    },

    /// Render a single note to a WAV file
    Render {
        instrument: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = DemoKind::Synth)]
        demo: DemoKind,

        #[arg(long, default_value_t = 48, value_parser = clap::value_parser!(u8).range(0..=127))]
        note: u8,

        #[arg(long, default_value_t = 127, value_parser = clap::value_parser!(u8).range(1..=127))]
        velocity: u8,

        /// Seconds between note-on and note-off
        #[arg(long, default_value_t = 1.0)]
        hold: f32,

        /// Seconds rendered after note-off
        #[arg(long, default_value_t = 1.0)]
        tail: f32,

        #[arg(long, default_value_t = 44_100)]
        sample_rate: u32,

        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Built-in instruments available without a blob on disk.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoKind {
    Synth,
    Pcm,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            instrument,
            demo,
            octave,
            velocity,
        } => {
            let blob = demo::load_blob(instrument.as_deref(), demo)?;
            app::run(app::PlayOptions {
                blob,
                octave,
                velocity,
            })
        }
        Command::Render {
            instrument,
            demo,
            note,
            velocity,
            hold,
            tail,
            sample_rate,
            output,
        } => {
            let blob = demo::load_blob(instrument.as_deref(), demo)?;
            render::render_to_wav(
                &blob,
                &render::RenderOptions {
                    note,
                    velocity,
                    hold,
                    tail,
                    sample_rate,
                },
                &output,
            )
        }
    }
}
