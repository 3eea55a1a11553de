//! carillon - play music notation from the command line.
//!
//! ```text
//! carillon "c4 d e f g a b c'2"
//! carillon --score tune.txt --tempo 90 --key "Eb major" --temperament werckmeister3
//! ```

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, eyre};

use carillon_dsp::dsp::SineTable;
use carillon_dsp::engine::{compile, song_length_samples, CompileSettings, Sequencer};
use carillon_dsp::io::{AudioDriver, CpalDriver};
use carillon_dsp::notation::parse_music;
use carillon_dsp::theory::key::find_key;
use carillon_dsp::theory::Temperament;

#[derive(Parser)]
#[command(name = "carillon", about = "Real-time music notation player")]
struct Args {
    /// Notation text, e.g. "c4 d e f <g b d'>2".
    music: Option<String>,

    /// Read notation from a file instead.
    #[arg(long, conflicts_with = "music")]
    score: Option<PathBuf>,

    /// Tempo in beats per minute.
    #[arg(long, default_value_t = 120)]
    tempo: u32,

    /// Key signature, e.g. "C major", "f# minor".
    #[arg(long, default_value = "C major")]
    key: String,

    /// Tuning system: "equal" or "werckmeister3".
    #[arg(long, default_value = "equal")]
    temperament: String,

    /// Chromatic transposition in semitones.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    transpose: i32,

    /// Base volume in [0, 1].
    #[arg(long, default_value_t = 0.5)]
    volume: f32,

    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let args = Args::parse();

    let text = match (&args.music, &args.score) {
        (Some(music), None) => music.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        _ => bail!("provide notation text or --score <file>"),
    };

    let key = find_key(&args.key).ok_or_else(|| eyre!("unknown key: {:?}", args.key))?;
    let temperament = match args.temperament.to_ascii_lowercase().as_str() {
        "equal" => Temperament::Equal,
        "werckmeister3" | "werckmeister" => Temperament::Werckmeister3,
        other => bail!("unknown temperament: {other:?} (try \"equal\" or \"werckmeister3\")"),
    };
    if args.tempo == 0 {
        bail!("tempo must be positive");
    }

    let notes = parse_music(&text);
    if notes.is_empty() {
        bail!("no playable notes in the input");
    }

    let settings = CompileSettings {
        sample_rate: args.sample_rate,
        tempo_bpm: args.tempo,
        key,
        temperament,
        transposition: args.transpose,
        volume: args.volume.clamp(0.0, 1.0),
    };
    let events = compile(&notes, &settings);
    if events.is_empty() {
        bail!("input contained only rests");
    }

    println!(
        "Playing {} notes ({} events, {:.1}s) in {}, {}. Ctrl+C to stop.",
        notes.len(),
        events.len(),
        song_length_samples(&events) as f64 / settings.sample_rate as f64,
        key.name,
        temperament.name(),
    );

    let mut sequencer = Sequencer::new(events, settings.sample_rate, SineTable::new());
    let mut driver = CpalDriver::new(settings.sample_rate)?;
    driver.play(move |buffer| sequencer.render(buffer))?;
    driver.wait_until_complete();

    Ok(())
}
