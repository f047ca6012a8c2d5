//! marble-world entry point: run one configured trial and report its outcome.

use std::process::ExitCode;

use glam::Vec2;
use serde::Serialize;

use marble_world::rng::TrialRng;
use marble_world::sink::ResultSink;
use marble_world::trial::{RunOptions, run_trial};
use marble_world::{SimError, SimResult, load_trials};

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// One exported path line, consumed by the external animation tooling.
#[derive(Serialize)]
struct PathLine<'a> {
    name: &'a str,
    positions: &'a [Vec2],
    velocities: &'a [Vec2],
}

fn run() -> SimResult<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: marble-world <trials.json> <index> [--paths <out.jsonl>]");
        return Err(SimError::config("missing arguments"));
    }

    let trials = load_trials(&args[1])?;
    let index: usize = args[2]
        .parse()
        .map_err(|_| SimError::config(format!("invalid trial index {:?}", args[2])))?;
    let spec = trials.get(index).ok_or_else(|| {
        SimError::config(format!(
            "trial index {index} out of range (the file has {} records)",
            trials.len()
        ))
    })?;

    let mut paths_out: Option<String> = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--paths" => {
                i += 1;
                paths_out = Some(
                    args.get(i)
                        .cloned()
                        .ok_or_else(|| SimError::config("--paths requires a file argument"))?,
                );
            }
            other => {
                return Err(SimError::config(format!("unknown argument {other:?}")));
            }
        }
        i += 1;
    }

    let opts = RunOptions {
        noise: None,
        record_paths: if paths_out.is_some() {
            spec.marbles.iter().map(|m| m.name.clone()).collect()
        } else {
            vec![]
        },
    };
    let mut rng = TrialRng::from_entropy();
    let outcome = run_trial(spec, &opts, &mut rng)?;

    log::info!("trial {index} finished after {} ticks", outcome.ticks);
    println!("passed: {}", outcome.passed);
    println!(
        "min exit distance: {:.2}",
        outcome.min_exit_dist_sq.sqrt()
    );
    if outcome.diverged {
        println!("diverged: true");
    }
    for contact in &outcome.collisions {
        println!("contact {} x {} @ tick {}", contact.a, contact.b, contact.tick);
    }

    if let Some(path) = paths_out {
        let mut sink = ResultSink::create(&path)?;
        for (name, body_path) in &outcome.paths {
            sink.append(&PathLine {
                name,
                positions: &body_path.positions,
                velocities: &body_path.velocities,
            })?;
        }
        sink.finish()?;
        log::info!("paths written to {path}");
    }
    Ok(())
}
