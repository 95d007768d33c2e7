// Integration tests for mounting labs and driving them through the host

use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use labbench::config::LabConfig;
use labbench::controls::{ControlSpec, Direction, ParameterStore};
use labbench::errors::{LabError, ModelError};
use labbench::host::{Host, KeyInput};
use labbench::lab::{LabInstance, SimulationModel};
use labbench::labs::{FaradayLab, GravityLab, LabKind, RadiationLab};
use labbench::render::{Clock, Point, RenderMode, Rgb, Scene, SceneBuffer};

const DT: Duration = Duration::from_millis(33);

fn mount(model: Box<dyn SimulationModel>) -> (Host, SceneBuffer, LabInstance) {
    let host = Host::new();
    let buffer = SceneBuffer::new();
    let lab = LabInstance::mount(
        model,
        &host,
        Box::new(buffer.clone()),
        &LabConfig::default(),
    )
    .expect("mount failed");
    (host, buffer, lab)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// A small lab with three plain controls. Frames fail while `beta` is above
/// one half, and carry a NaN point while `gamma` is negative.
struct Bench {
    mode: RenderMode,
}

impl SimulationModel for Bench {
    fn name(&self) -> &'static str {
        "bench"
    }

    fn title(&self) -> &'static str {
        "Bench"
    }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::new("alpha", "Alpha")
                .range(0.0, 10.0)
                .step(1.0)
                .default(5.0),
            ControlSpec::new("beta", "Beta")
                .range(0.0, 1.0)
                .step(0.1)
                .default(0.0),
            ControlSpec::new("gamma", "Gamma")
                .range(-1.0, 1.0)
                .step(0.25)
                .default(0.0),
        ]
    }

    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn frame(&mut self, controls: &ParameterStore, _clock: &Clock) -> Result<Scene, ModelError> {
        if controls.value("beta") > 0.5 {
            return Err(ModelError::new("bench", "beta too high"));
        }
        let mut scene = Scene::new(100.0, 100.0);
        let y = if controls.value("gamma") < 0.0 {
            f64::NAN
        } else {
            50.0
        };
        scene.line(Point::new(0.0, y), Point::new(100.0, 50.0), Rgb::WHITE);
        Ok(scene)
    }
}

fn bench(mode: RenderMode) -> Box<dyn SimulationModel> {
    Box::new(Bench { mode })
}

#[test]
fn test_energy_steps_and_clamps() {
    let (host, _buffer, lab) = mount(Box::new(RadiationLab::new()));
    assert_eq!(lab.active_id().as_deref(), Some("energy"));

    lab.set("energy", 0.5).unwrap();
    host.keyboard.dispatch(&KeyInput::char('d'));
    assert_close(lab.get("energy").unwrap(), 0.52);

    for _ in 0..3 {
        host.keyboard.dispatch(&KeyInput::char('a'));
    }
    assert_close(lab.get("energy").unwrap(), 0.46);

    for _ in 0..15 {
        host.keyboard.dispatch(&KeyInput::char('a'));
    }
    assert_close(lab.get("energy").unwrap(), 0.2);
}

#[test]
fn test_selection_wraps_both_ways() {
    let (host, _buffer, lab) = mount(bench(RenderMode::Continuous));
    assert_eq!(lab.active_id().as_deref(), Some("alpha"));

    host.keyboard.dispatch(&KeyInput::char('q'));
    assert_eq!(lab.active_id().as_deref(), Some("gamma"));

    host.keyboard.dispatch(&KeyInput::char('e'));
    assert_eq!(lab.active_id().as_deref(), Some("alpha"));

    host.keyboard.dispatch(&KeyInput::char('E'));
    assert_eq!(lab.active_id().as_deref(), Some("beta"));
}

#[test]
fn test_two_controls_cycle_back_after_two_presses() {
    let (host, _buffer, lab) = mount(LabKind::Diode.build());
    assert_eq!(lab.active_id().as_deref(), Some("bias"));

    host.keyboard.dispatch(&KeyInput::char('e'));
    assert_eq!(lab.active_id().as_deref(), Some("current"));
    host.keyboard.dispatch(&KeyInput::char('e'));
    assert_eq!(lab.active_id().as_deref(), Some("bias"));
}

#[test]
fn test_text_entry_and_modified_keys_are_ignored() {
    let (host, _buffer, lab) = mount(bench(RenderMode::Continuous));

    host.keyboard
        .dispatch(&KeyInput::char('d').in_text_entry());
    assert_close(lab.get("alpha").unwrap(), 5.0);

    host.keyboard
        .dispatch(&KeyInput::char('e').in_text_entry());
    assert_eq!(lab.active_id().as_deref(), Some("alpha"));

    let chord = KeyInput {
        modifiers: KeyModifiers::CONTROL,
        ..KeyInput::char('d')
    };
    host.keyboard.dispatch(&chord);
    assert_close(lab.get("alpha").unwrap(), 5.0);
}

#[test]
fn test_repeat_steps_and_release_does_not() {
    let (host, _buffer, lab) = mount(bench(RenderMode::Continuous));

    host.keyboard.dispatch(&KeyInput::press(KeyCode::Char('d')));
    host.keyboard.dispatch(&KeyInput::repeat(KeyCode::Char('d')));
    host.keyboard.dispatch(&KeyInput::repeat(KeyCode::Char('d')));
    assert_close(lab.get("alpha").unwrap(), 8.0);

    host.keyboard.dispatch(&KeyInput::release(KeyCode::Char('d')));
    assert_close(lab.get("alpha").unwrap(), 8.0);

    // arrows are bound too
    host.keyboard.dispatch(&KeyInput::press(KeyCode::Left));
    assert_close(lab.get("alpha").unwrap(), 7.0);
}

#[test]
fn test_set_clamps_and_snaps() {
    let (_host, _buffer, lab) = mount(bench(RenderMode::Continuous));

    assert_close(lab.set("alpha", 99.0).unwrap(), 10.0);
    assert_close(lab.set("alpha", -3.0).unwrap(), 0.0);
    assert_close(lab.set("alpha", 3.4).unwrap(), 3.0);
    assert_close(lab.set("gamma", 0.3).unwrap(), 0.25);
    assert_close(lab.set("gamma", f64::NAN).unwrap(), 0.25);
}

#[test]
fn test_unknown_control_is_reported_not_fatal() {
    let (host, _buffer, lab) = mount(bench(RenderMode::Continuous));

    let err = lab.set("delta", 1.0).unwrap_err();
    assert_eq!(err, LabError::unknown("delta"));
    assert!(lab.select_by_id("delta").is_err());
    assert_eq!(lab.active_id().as_deref(), Some("alpha"));

    let snapshot = lab.snapshot();
    assert!(snapshot
        .last_warning
        .as_deref()
        .is_some_and(|w| w.contains("delta")));

    // still running
    host.frames.run_frame(DT);
    assert_eq!(lab.snapshot().stats.skipped, 0);
}

#[test]
fn test_warning_clears_on_next_successful_operation() {
    let (host, _buffer, lab) = mount(bench(RenderMode::Continuous));

    lab.set("delta", 1.0).unwrap_err();
    assert!(lab.snapshot().last_warning.is_some());
    lab.set("alpha", 2.0).unwrap();
    assert_eq!(lab.snapshot().last_warning, None);

    lab.select_by_id("delta").unwrap_err();
    assert!(lab.snapshot().last_warning.is_some());
    host.keyboard.dispatch(&KeyInput::char('e'));
    assert_eq!(lab.snapshot().last_warning, None);

    lab.select_by_id("delta").unwrap_err();
    lab.select_by_id("gamma").unwrap();
    assert_eq!(lab.snapshot().last_warning, None);

    lab.set("delta", 1.0).unwrap_err();
    lab.dismiss_warning();
    assert_eq!(lab.snapshot().last_warning, None);
}

#[test]
fn test_unmount_releases_listener_and_frame_task() {
    let (host, buffer, lab) = mount(bench(RenderMode::Continuous));
    assert_eq!(host.keyboard.listener_count(), 1);
    assert_eq!(host.frames.pending(), 1);
    assert!(lab.is_listening());
    assert!(lab.is_animating());

    for _ in 0..3 {
        host.frames.run_frame(DT);
    }
    assert_eq!(host.frames.invocations(), 3);
    let presented = buffer.presented();

    let handle = lab.handle();
    lab.unmount();
    assert_eq!(host.keyboard.listener_count(), 0);
    assert_eq!(host.frames.pending(), 0);

    for _ in 0..5 {
        assert_eq!(host.frames.run_frame(DT), 0);
    }
    assert_eq!(host.frames.invocations(), 3);
    assert_eq!(buffer.presented(), presented);

    // keys after unmount reach nobody
    assert_eq!(host.keyboard.dispatch(&KeyInput::char('d')), 0);
    assert_close(handle.get("alpha").unwrap(), 5.0);
}

#[test]
fn test_two_instances_share_a_host_independently() {
    let host = Host::new();
    let config = LabConfig::default();
    let first = LabInstance::mount(
        bench(RenderMode::Continuous),
        &host,
        Box::new(SceneBuffer::new()),
        &config,
    )
    .unwrap();
    let second = LabInstance::mount(
        bench(RenderMode::Continuous),
        &host,
        Box::new(SceneBuffer::new()),
        &config,
    )
    .unwrap();
    assert_eq!(host.keyboard.listener_count(), 2);

    drop(first);
    assert_eq!(host.keyboard.listener_count(), 1);
    assert_eq!(host.frames.pending(), 1);

    host.keyboard.dispatch(&KeyInput::char('d'));
    assert_close(second.get("alpha").unwrap(), 6.0);
}

#[test]
fn test_failing_frames_are_skipped_and_loop_continues() {
    let (host, buffer, lab) = mount(bench(RenderMode::Continuous));
    host.frames.run_frame(DT);
    let painted = lab.snapshot().stats.painted;
    let presented = buffer.presented();

    lab.set("beta", 0.8).unwrap();
    for _ in 0..4 {
        host.frames.run_frame(DT);
    }
    let stats = lab.snapshot().stats;
    assert_eq!(stats.skipped, 4);
    assert_eq!(stats.painted, painted);
    assert!(stats.last_failure.is_some());
    assert_eq!(buffer.presented(), presented);
    assert!(buffer.with_latest(|scene| scene.is_some()));

    lab.set("beta", 0.0).unwrap();
    host.frames.run_frame(DT);
    let stats = lab.snapshot().stats;
    assert_eq!(stats.painted, painted + 1);
    assert_eq!(stats.skipped, 4);
    assert_eq!(stats.last_failure, None);
    assert_eq!(buffer.presented(), presented + 1);
}

#[test]
fn test_non_finite_scene_is_rejected() {
    let (host, buffer, lab) = mount(bench(RenderMode::Continuous));
    let presented = buffer.presented();

    lab.set("gamma", -0.5).unwrap();
    host.frames.run_frame(DT);

    let stats = lab.snapshot().stats;
    assert_eq!(stats.skipped, 1);
    assert_eq!(buffer.presented(), presented);
}

#[test]
fn test_on_change_paints_once_per_change() {
    let (host, buffer, lab) = mount(Box::new(GravityLab::new()));
    assert_eq!(host.frames.pending(), 0);
    assert!(!lab.is_animating());
    assert_eq!(buffer.presented(), 1);

    lab.set("m1", 7.0).unwrap();
    assert_eq!(buffer.presented(), 2);

    // same value, no repaint
    lab.set("m1", 7.0).unwrap();
    assert_eq!(buffer.presented(), 2);

    host.keyboard.dispatch(&KeyInput::char('d'));
    assert_close(lab.get("m1").unwrap(), 8.0);
    assert_eq!(buffer.presented(), 3);

    // selection alone changes nothing on screen
    host.keyboard.dispatch(&KeyInput::char('e'));
    assert_eq!(buffer.presented(), 3);
}

#[test]
fn test_momentary_control_holds_and_springs_back() {
    let (host, _buffer, lab) = mount(Box::new(FaradayLab::new()));

    host.keyboard.dispatch(&KeyInput::char('d'));
    assert_eq!(lab.snapshot().held, Some(Direction::Increase));
    assert_close(lab.get("magnet").unwrap(), 0.0);

    for _ in 0..3 {
        host.frames.run_frame(DT);
    }
    assert_close(lab.get("magnet").unwrap(), 0.12);

    host.keyboard.dispatch(&KeyInput::release(KeyCode::Char('d')));
    assert_eq!(lab.snapshot().held, None);

    host.frames.run_frame(DT);
    assert_close(lab.get("magnet").unwrap(), 0.08);

    for _ in 0..5 {
        host.frames.run_frame(DT);
    }
    assert_close(lab.get("magnet").unwrap(), 0.0);
}

#[test]
fn test_every_lab_mounts_and_paints() {
    for kind in LabKind::ALL {
        let (host, buffer, lab) = mount(kind.build());
        for frame in 0..30 {
            if frame == 10 {
                host.keyboard.dispatch(&KeyInput::char('d'));
            }
            if frame == 20 {
                host.keyboard.dispatch(&KeyInput::char('e'));
                host.keyboard.dispatch(&KeyInput::char('a'));
            }
            host.frames.run_frame(DT);
        }

        let snapshot = lab.snapshot();
        assert_eq!(snapshot.stats.skipped, 0, "{:?} skipped frames", kind);
        assert!(buffer.presented() >= 1, "{:?} never painted", kind);
        assert!(
            buffer.with_latest(|scene| scene.is_some_and(|s| s.first_non_finite().is_none())),
            "{:?} has no clean scene",
            kind
        );
        assert!(!snapshot.controls.is_empty());
        assert!(snapshot.controls.iter().all(|c| (0.0..=1.0).contains(&c.normalized)));
    }
}

#[test]
fn test_space_pauses_continuous_labs() {
    let (host, _buffer, lab) = mount(LabKind::Pendulum.build());
    host.frames.run_frame(DT);
    let before = lab.snapshot().seconds;
    assert!(before > 0.0);

    host.keyboard.dispatch(&KeyInput::char(' '));
    assert!(!lab.snapshot().running);
    for _ in 0..5 {
        host.frames.run_frame(DT);
    }
    assert_close(lab.snapshot().seconds, before);
}

#[test]
fn test_stopped_chsh_trials_show_as_not_running() {
    let (host, _buffer, lab) = mount(LabKind::Chsh.build());
    host.frames.run_frame(DT);
    assert!(lab.snapshot().running);

    host.keyboard.dispatch(&KeyInput::char(' '));
    host.frames.run_frame(DT);
    let snapshot = lab.snapshot();
    assert!(!snapshot.running);
    assert!(snapshot.seconds > DT.as_secs_f64());
}

#[test]
fn test_pause_hint_only_where_space_pauses() {
    for kind in LabKind::ALL {
        let (host, _buffer, lab) = mount(kind.build());
        let advertised = lab.snapshot().key_hints.iter().any(|(key, _)| *key == "⎵");
        let before = lab.snapshot().running;
        host.keyboard.dispatch(&KeyInput::char(' '));
        let toggled = lab.snapshot().running != before;
        assert_eq!(advertised, toggled, "{:?}", kind);
    }
}
