//! Replay a recorded session through the session actor.

use std::path::{Path, PathBuf};

use focusguard_common::clock::SessionClock;
use focusguard_common::error::{FocusError, FocusResult};
use focusguard_engine::{ActorError, ChannelSink, ReplayOptions, SessionActor, Tee, TracingSink};
use focusguard_session_model::input::parse_inputs;
use focusguard_session_model::summary::SessionSummary;

use crate::writer::{EventLogHeader, JsonlEventWriter};

pub async fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
    no_synthetic_ticks: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;
    println!("Replaying session from: {}", input.display());

    let content = std::fs::read_to_string(&input)
        .map_err(|_| anyhow::anyhow!("Inputs file not found: {}", input.display()))?;
    let inputs =
        parse_inputs(&content).map_err(|e| FocusError::input(e.line, e.source.to_string()))?;
    println!("  Loaded {} inputs", inputs.len());

    let mut options = ReplayOptions::auto(&inputs);
    if no_synthetic_ticks {
        options.synthesize_ticks = false;
    }
    if options.synthesize_ticks {
        println!("  No tick records found, deriving 1 Hz ticks from timestamps");
    }

    let clock = SessionClock::start();
    let output = output.unwrap_or_else(|| default_output(&input));
    let header = EventLogHeader::new(clock.epoch_wall(), &input, &config.engine);
    let mut writer = JsonlEventWriter::create(output, &header)?;

    // File writes happen off the session task; the sink only enqueues.
    let (sink, mut events) = ChannelSink::channel();
    let drain = tokio::task::spawn_blocking(move || -> FocusResult<(u64, PathBuf)> {
        while let Some(event) = events.blocking_recv() {
            writer.write_event(&event)?;
        }
        writer.flush()?;
        Ok((writer.events_written(), writer.path().to_path_buf()))
    });

    let handle = SessionActor::spawn_default(config.engine.clone(), Tee(sink, TracingSink))?;

    let stats = handle.replay(inputs, options).await.map_err(session_error)?;

    let summary = handle.stop().await.map_err(session_error)?;
    let (events_written, written_to) = drain.await??;

    tracing::info!(
        events = events_written,
        synthesized_ticks = stats.synthesized_ticks,
        out_of_order = stats.out_of_order,
        elapsed_secs = clock.elapsed_secs(),
        "Replay complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report_card(&summary));
    }
    if stats.out_of_order > 0 {
        println!(
            "\n  Warning: {} inputs arrived with a timestamp earlier than the one before",
            stats.out_of_order
        );
    }
    println!("\n  {events_written} events written to: {}", written_to.display());

    Ok(())
}

fn session_error(err: ActorError) -> FocusError {
    FocusError::session(err.to_string())
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("events.jsonl")
}

fn report_card(summary: &SessionSummary) -> String {
    let average = summary
        .average_recovery_secs
        .map(|s| format!("{s:.1}s"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut out = String::new();
    out.push_str("\nReport card\n");
    out.push_str(&format!("  Duration: {:.1}s\n", summary.duration_secs));
    out.push_str(&format!(
        "  Distractions: {} ({} triggered)\n",
        summary.distraction_count, summary.trigger_count
    ));
    out.push_str(&format!(
        "  Recoveries: {} (average {average})\n",
        summary.recovery_count
    ));
    out.push_str(&format!(
        "  Longest streak: {}s\n",
        summary.longest_streak_secs
    ));
    if summary.dropped_frames > 0 {
        out.push_str(&format!("  Dropped frames: {}\n", summary.dropped_frames));
    }
    out.push_str(&format!("\n{}\n", summary.verdict_line()));
    out
}
