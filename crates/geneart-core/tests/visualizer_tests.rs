use geneart_core::cache::SequenceRecord;
use geneart_core::config::{ArtConfig, MovementMode};
use geneart_core::render::ParticleStyle;
use geneart_core::render::{CommandBuffer, DrawCommand};
use geneart_core::schedule::{AnimationLoop, FrameClock, LoopState};
use geneart_core::shapes::ShapeKind;
use geneart_core::visualizer::{FrameOutcome, Visualizer, STATUS_FETCH_ERROR, STATUS_LOADING};
use geneart_core::GeneArtError;

const GENE: &str = "ENSG00000012048";

fn record(seq: &str) -> SequenceRecord {
    SequenceRecord { seq: seq.to_string(), desc: "BRCA1 DNA repair".to_string() }
}

fn small_config() -> ArtConfig {
    ArtConfig { particle_count: 20, ..ArtConfig::default() }
}

#[test]
fn test_frame_clock_throttles() {
    let mut clock = FrameClock::new(33.0);
    assert!(clock.should_tick(1000.0));
    assert!(!clock.should_tick(1016.0));
    assert!(!clock.should_tick(1032.9));
    assert!(clock.should_tick(1033.0));
    clock.reset();
    assert!(clock.should_tick(1034.0));
}

#[test]
fn test_animation_loop_state_machine() {
    let mut anim = AnimationLoop::new();
    assert_eq!(anim.state(), LoopState::Idle);
    assert_eq!(anim.cancel(), None);

    let first = anim.start();
    assert_eq!(anim.state(), LoopState::Running { generation: first });
    let second = anim.start();
    assert_ne!(first, second);
    assert!(!anim.is_current(first));
    assert!(anim.is_current(second));

    assert_eq!(anim.cancel(), Some(second));
    assert_eq!(anim.state(), LoopState::Cancelled { generation: second });
    assert!(!anim.is_running());
}

#[test]
fn test_load_sequence_generates_and_caches() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();

    viz.begin_fetch(GENE);
    assert_eq!(viz.status(), STATUS_LOADING);

    let generation = viz.load_sequence(GENE, record("AATTGGCC"), 1, &mut surface).unwrap();
    assert!(viz.animation().is_current(generation));
    assert!(viz.cache().contains(GENE));
    assert_eq!(viz.current_gene(), Some(GENE));
    assert_eq!(viz.status(), format!("Gene {}", GENE));
    assert_eq!(viz.profile(GENE).unwrap().frequency.unwrap().a, 0.25);
    assert_eq!(surface.commands, vec![DrawCommand::Clear]);
    assert_eq!(viz.simulation().unwrap().particles.count, 20);
}

#[test]
fn test_second_generate_supersedes_first_loop() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let first = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    assert_eq!(viz.frame(first, 0.0, &mut surface), FrameOutcome::Ticked);

    let second = viz.generate(GENE, 2, &mut surface).unwrap();
    assert_ne!(first, second);

    // The stale callback observes cancellation and stops; only the new
    // generation advances the simulation.
    assert_eq!(viz.frame(first, 100.0, &mut surface), FrameOutcome::Stopped);
    assert_eq!(viz.simulation().unwrap().tick(), 0);
    assert_eq!(viz.frame(second, 100.0, &mut surface), FrameOutcome::Ticked);
    assert_eq!(viz.simulation().unwrap().tick(), 1);
    assert_eq!(viz.frame(first, 1000.0, &mut surface), FrameOutcome::Stopped);
    assert_eq!(viz.simulation().unwrap().tick(), 1);
}

#[test]
fn test_frames_are_paced() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();

    assert_eq!(viz.frame(generation, 0.0, &mut surface), FrameOutcome::Ticked);
    let drawn = surface.commands.len();
    assert_eq!(viz.frame(generation, 16.0, &mut surface), FrameOutcome::Skipped);
    assert_eq!(surface.commands.len(), drawn, "skipped frame must not draw");
    assert_eq!(viz.simulation().unwrap().tick(), 1);
    assert_eq!(viz.frame(generation, 34.0, &mut surface), FrameOutcome::Ticked);
    assert_eq!(viz.simulation().unwrap().tick(), 2);
}

#[test]
fn test_stop_halts_loop() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    assert_eq!(viz.stop(), Some(generation));
    assert_eq!(viz.frame(generation, 0.0, &mut surface), FrameOutcome::Stopped);
}

#[test]
fn test_fetch_failure_keeps_previous_art() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    viz.frame(generation, 0.0, &mut surface);
    let before = viz.simulation().unwrap().particles.position.clone();
    let drawn = surface.commands.len();

    viz.begin_fetch("ENSG_BROKEN");
    viz.report_fetch_failure("ENSG_BROKEN", "HTTP 400");

    assert_eq!(viz.status(), STATUS_FETCH_ERROR);
    assert!(viz.animation().is_current(generation));
    assert_eq!(viz.current_gene(), Some(GENE));
    assert_eq!(viz.simulation().unwrap().particles.position, before);
    assert_eq!(surface.commands.len(), drawn);
    assert!(!viz.cache().contains("ENSG_BROKEN"));
}

#[test]
fn test_load_cached_hit_and_miss() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    assert_eq!(viz.load_cached(GENE, 1, &mut surface).unwrap(), None);

    let first = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    let again = viz.load_cached(GENE, 1, &mut surface).unwrap().unwrap();
    assert!(again > first);
    assert!(viz.animation().is_current(again));
}

#[test]
fn test_empty_sequence_does_not_replace_running_art() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();

    let err = viz.load_sequence("ENSG_EMPTY", record(""), 1, &mut surface).unwrap_err();
    assert!(matches!(err, GeneArtError::EmptySequence));
    assert!(viz.animation().is_current(generation));
    assert_eq!(viz.current_gene(), Some(GENE));
    assert!(viz.profile("ENSG_EMPTY").unwrap().frequency.is_none());
}

#[test]
fn test_generate_unknown_gene() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let err = viz.generate("nope", 1, &mut CommandBuffer::new()).unwrap_err();
    assert!(matches!(err, GeneArtError::UnknownGene(id) if id == "nope"));
    assert!(!viz.animation().is_running());
}

#[test]
fn test_set_shape_applies_to_running_simulation() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    viz.set_shape(Some(ShapeKind::Helix));
    assert_eq!(viz.config().shape, Some(ShapeKind::Helix));
    assert_eq!(viz.simulation().unwrap().targets().unwrap().len(), 20);
}

#[test]
fn test_set_config_validates() {
    let mut viz = Visualizer::new(ArtConfig::default()).unwrap();
    let bad = ArtConfig { particle_speed: -1.0, ..ArtConfig::default() };
    assert!(viz.set_config(bad).is_err());
    assert_eq!(viz.config().particle_speed, 2.0);
    assert!(viz.set_config(small_config()).is_ok());
    assert_eq!(viz.config().particle_count, 20);
}

fn glows(surface: &CommandBuffer) -> usize {
    surface.count(|c| matches!(c, DrawCommand::Glow { .. }))
}

fn polygons(surface: &CommandBuffer) -> usize {
    surface.count(|c| matches!(c, DrawCommand::Polygon { .. }))
}

#[test]
fn test_set_config_waits_for_next_generation() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();
    viz.frame(generation, 0.0, &mut surface);
    assert_eq!(glows(&surface), 20);

    let polygon = ArtConfig { style: ParticleStyle::Polygon { sides: 5 }, ..small_config() };
    viz.set_config(polygon).unwrap();
    assert_eq!(viz.frame(generation, 100.0, &mut surface), FrameOutcome::Ticked);
    assert_eq!(glows(&surface), 40);
    assert_eq!(polygons(&surface), 0, "running generation switched style");

    let next = viz.generate(GENE, 2, &mut surface).unwrap();
    surface.commands.clear();
    assert_eq!(viz.frame(next, 200.0, &mut surface), FrameOutcome::Ticked);
    assert_eq!(polygons(&surface), 20);
    assert_eq!(glows(&surface), 0);
}

#[test]
fn test_set_movement_applies_to_next_generation() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    viz.load_sequence(GENE, record("GATTACA"), 1, &mut surface).unwrap();

    viz.set_movement("network".parse::<MovementMode>().unwrap());
    assert_eq!(viz.simulation().unwrap().config.movement, MovementMode::Flow);

    viz.generate(GENE, 1, &mut surface).unwrap();
    assert_eq!(viz.simulation().unwrap().config.movement, MovementMode::Network);
}

#[test]
fn test_malformed_sequence_body_reports_failure() {
    let mut viz = Visualizer::new(small_config()).unwrap();
    let mut surface = CommandBuffer::new();
    let generation = viz
        .load_sequence_json(GENE, r#"{"seq": "GATTACA", "desc": "ok"}"#, 1, &mut surface)
        .unwrap();
    assert_eq!(viz.status(), format!("Gene {}", GENE));

    viz.begin_fetch("ENSG_BROKEN");
    let err = viz
        .load_sequence_json("ENSG_BROKEN", "<html>503</html>", 1, &mut surface)
        .unwrap_err();
    assert!(matches!(err, GeneArtError::Parse(_)));
    assert_eq!(viz.status(), STATUS_FETCH_ERROR);
    assert!(viz.animation().is_current(generation));
    assert!(!viz.cache().contains("ENSG_BROKEN"));
}
