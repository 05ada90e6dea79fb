//! Generate a scripted session from synthetic faces.
//!
//! The script walks through every distraction kind once, including one that
//! lands inside the cooldown of the previous trigger, so a replay of the
//! output exercises the whole engine.

use std::path::PathBuf;

use focusguard_common::clock::NANOS_PER_SEC;
use focusguard_engine::TickSynthesizer;
use focusguard_session_model::input::{serialize_inputs, SessionInput};
use focusguard_session_model::synthetic::SyntheticFace;

#[derive(Debug, Clone, Copy)]
enum Scene {
    Face(SyntheticFace),
    NoFace,
    /// Focus leaves the window, then the user carries on attentively.
    SwitchedAway,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    scene: Scene,
    seconds: u64,
}

fn script() -> Vec<Segment> {
    use Scene::*;
    let attentive = SyntheticFace::attentive();
    [
        (Face(attentive), 35),
        (Face(SyntheticFace::eyes_closed()), 6),
        (Face(attentive), 4),
        (Face(SyntheticFace::turned_away()), 5),
        (Face(attentive), 12),
        (NoFace, 8),
        (Face(attentive), 10),
        (SwitchedAway, 5),
        (Face(attentive), 40),
    ]
    .into_iter()
    .map(|(scene, seconds)| Segment { scene, seconds })
    .collect()
}

fn build_inputs(segments: &[Segment], fps: u32, ticks: bool, iris: bool) -> Vec<SessionInput> {
    let interval = NANOS_PER_SEC / fps as u64;
    let mut frames = Vec::new();
    let mut t = 0u64;

    for segment in segments {
        if let Scene::SwitchedAway = segment.scene {
            frames.push(SessionInput::visibility_lost(t));
        }
        for _ in 0..segment.seconds * fps as u64 {
            let input = match segment.scene {
                Scene::Face(face) => SessionInput::frame(t, face_frame(face, iris)),
                Scene::NoFace => SessionInput::no_face(t),
                Scene::SwitchedAway => {
                    SessionInput::frame(t, face_frame(SyntheticFace::attentive(), iris))
                }
            };
            frames.push(input);
            t += interval;
        }
    }

    if !ticks {
        return frames;
    }

    let mut synthesizer = TickSynthesizer::new();
    let mut inputs = Vec::with_capacity(frames.len() + frames.len() / fps as usize + 1);
    for input in frames {
        inputs.extend(synthesizer.ticks_due(input.timestamp_ns));
        inputs.push(input);
    }
    inputs
}

fn face_frame(face: SyntheticFace, iris: bool) -> focusguard_session_model::landmark::LandmarkFrame {
    if iris {
        face.build()
    } else {
        face.with_iris(None).build()
    }
}

pub fn run(output: PathBuf, fps: u32, ticks: bool, iris: bool) -> anyhow::Result<()> {
    if fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let segments = script();
    let inputs = build_inputs(&segments, fps, ticks, iris);
    let jsonl = serialize_inputs(&inputs)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let header = format!(
        "# focusguard simulate: fps={fps} ticks={ticks} iris={iris} generated={}\n",
        chrono::Utc::now().to_rfc3339()
    );
    std::fs::write(&output, header + &jsonl)?;

    let seconds: u64 = segments.iter().map(|s| s.seconds).sum();
    println!("Wrote {} inputs ({seconds}s) to: {}", inputs.len(), output.display());
    println!("Replay with: focusguard replay {}", output.display());
    Ok(())
}
