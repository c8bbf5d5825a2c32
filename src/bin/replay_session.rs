//! Replay a recorded sample stream through a live reading session.
//!
//! Prints one line per mapped fixation, then the per-word statistics table.

use reading_mapper::config::replay::{self as replay_cfg, ReplayConfig};
use reading_mapper::io::{load_layout, load_samples, write_json_file, write_text_file};
use reading_mapper::{MappedWord, ReadingSession, WordStatistics};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = load_config_from_args()?;
    let samples = load_samples(&config.samples)?;
    let layout = load_layout(&config.layout)?;

    let mut session = ReadingSession::new(config.options.clone());
    let mut statistics = WordStatistics::new();
    let mut trace: Vec<MappedWord> = Vec::new();
    let mut last_ts = 0.0;

    for sample in samples {
        last_ts = sample.timestamp;
        if let Some(mapped) = session.feed(sample, &layout) {
            print_mapped(&mapped);
            trace.push(mapped);
        }
        statistics.set_focused_word(session.current_word(), sample.timestamp);
    }
    if let Some(mapped) = session.flush() {
        print_mapped(&mapped);
        trace.push(mapped);
        statistics.set_focused_word(session.current_word(), last_ts);
    }
    statistics.finish(last_ts);

    println!(
        "\n{} fixations, {} mapped, final mode {:?}",
        session.chain().len(),
        trace.len(),
        session.mode()
    );

    if let Some(path) = &config.output.trace_out {
        write_json_file(path, &trace)?;
        println!("Mapped trace written to {}", path.display());
    }
    let table = statistics.to_tsv();
    match &config.output.statistics_out {
        Some(path) => {
            write_text_file(path, &table)?;
            println!("Word statistics written to {}", path.display());
        }
        None => print!("\n{table}"),
    }
    Ok(())
}

fn print_mapped(mapped: &MappedWord) {
    let fix = &mapped.fixation;
    println!(
        "{:>8.0} ms  line {:>2} word {:>2}  {:<16} {}{}",
        fix.timestamp,
        mapped.line,
        mapped.index_in_line,
        mapped.text,
        fix,
        if fix.saccade.new_line { "  [new line]" } else { "" }
    );
}

fn usage() -> String {
    "Usage: replay_session <config.json>".to_string()
}

fn load_config_from_args() -> Result<ReplayConfig, String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    replay_cfg::load_config(Path::new(&config_path))
}
