//! Annotate a recorded reading session offline.
//!
//! Reads the recording named in the config, maps its fixations onto lines and
//! words, then writes the annotated recording and the fit report.

use reading_mapper::config::static_fit::{self as fit_cfg, StaticFitConfig};
use reading_mapper::diagnostics::StaticFitReport;
use reading_mapper::io::{load_recording, write_json_file};
use reading_mapper::StaticFitter;
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
    let mut recording = load_recording(&config.input_path)?;

    let fitter = StaticFitter::new(config.options.clone());
    let report = fitter.map(&mut recording);
    // stdout carries the recording itself when no output file is configured
    let summary = summary_lines(&report);
    if config.output.json_out.is_some() {
        println!("{summary}");
    } else {
        eprintln!("{summary}");
    }

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &recording)?;
            println!("Annotated recording written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&recording)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    if let Some(path) = &config.output.report_out {
        write_json_file(path, &report)?;
        println!("Fit report written to {}", path.display());
    }
    Ok(())
}

fn summary_lines(report: &StaticFitReport) -> String {
    let mut lines = vec![
        "Static fit summary".to_string(),
        format!("  text lines: {}", report.text_lines),
        format!(
            "  fixations: {} in, {} kept, {} short merged",
            report.input_fixations, report.kept_fixations, report.merged_short
        ),
        format!(
            "  progressions: {} -> {} line sets ({} singles dropped, {} below text)",
            report.progressions, report.line_sets, report.dropped_singletons, report.unmapped_sets
        ),
    ];
    for pass in &report.merge_passes {
        lines.push(format!(
            "    {:<18} {:>3} -> {:<3} merges={} steep={}",
            pass.label, pass.sets_before, pass.sets_after, pass.merges, pass.rejected_by_gradient
        ));
    }
    lines.push(format!("  rescaled lines: {}", report.rescaled_lines.len()));
    lines.push(format!(
        "  mapped: {}  regressions: {}  stripped: {}",
        report.mapped_fixations, report.regressions, report.noise_stripped
    ));
    lines.push(format!("  total_ms: {:.3}", report.timings.total_ms));
    lines.join("\n")
}

fn usage() -> String {
    "Usage: static_fit <config.json>".to_string()
}

fn load_config_from_args() -> Result<StaticFitConfig, String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    fit_cfg::load_config(Path::new(&config_path))
}
