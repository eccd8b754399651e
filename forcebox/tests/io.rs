use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use approx::assert_relative_eq;
use image::{Rgba, RgbaImage};

use forcebox::dataset::frames::natural_sort_key;
use forcebox::storage::run_store::{load_coordinates, load_parameters, RenderedRun, GIF_FILE, PARAMETERS_FILE, SNAPSHOTS_DIR};
use forcebox::visualization::renderer::{frame_indices, save_frames, write_gif};
use forcebox::visualization::visualizer::{ENERGY_PLOT_FILE, TRAJECTORY_PLOT_FILE};
use forcebox::{
    simulate, visualize_run, BoundaryPolicy, ForceModel, ForceType, FrameDataset, NVec2, RunStore, Scenario, ScenarioConfig,
    SimError, SimulationParameters, SimulationRenderer, Sprite, Trajectory,
};

/// Fresh directory under the system temp dir, removed on drop
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let path = std::env::temp_dir().join(format!("forcebox-{tag}-{}-{nanos}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Short gravity trajectory that stays inside a 10x10 box
pub fn sample_trajectory() -> Trajectory {
    let params = SimulationParameters::new(
        ForceModel::Gravity {
            g_constant: NVec2::new(0.0, -0.5),
        },
        0.01,
        10.0,
        1.0,
        BoundaryPolicy::Terminate,
    )
    .unwrap();
    simulate(&params, (NVec2::new(4.997, 5.0), NVec2::new(5.0, 5.0)), 50).unwrap()
}

const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ==================================================================================
// Renderer tests
// ==================================================================================

#[test]
fn world_origin_maps_to_bottom_left() {
    let renderer = SimulationRenderer::new(100).unwrap();
    assert_eq!(renderer.world_to_pixel(0.0, 0.0, 10.0), (0.0, 99.0));
    assert_eq!(renderer.world_to_pixel(10.0, 10.0, 10.0), (99.0, 0.0));

    let (px, py) = renderer.world_to_pixel(5.0, 2.5, 10.0);
    assert_relative_eq!(px, 49.5);
    assert_relative_eq!(py, 74.25);
}

#[test]
fn sprite_is_centered_on_position() {
    let renderer = SimulationRenderer::with_sprite(100, Sprite::disc(3, BLUE)).unwrap();

    let frame = renderer.render_frame(0.0, 0.0, 10.0);
    assert_eq!(frame.dimensions(), (100, 100));
    assert_eq!(*frame.get_pixel(0, 99), BLUE);
    assert_eq!(*frame.get_pixel(99, 0), WHITE);

    // center of the box, 3x3 sprite around pixel (50, 49)
    let frame = renderer.render_frame(5.0, 5.0, 10.0);
    assert_eq!(*frame.get_pixel(50, 49), BLUE);
    assert_eq!(*frame.get_pixel(0, 0), WHITE);
}

#[test]
fn frames_are_sampled_evenly() {
    assert_eq!(frame_indices(10, 4), vec![0, 3, 6, 9]);
    assert_eq!(frame_indices(2, 100), vec![0, 1]);
    assert_eq!(frame_indices(5, 1), vec![0]);
    assert!(frame_indices(0, 5).is_empty());

    let traj = sample_trajectory();
    let renderer = SimulationRenderer::new(32).unwrap();
    let frames = renderer.render_frames(&traj.x, &traj.y, 10.0, 8).unwrap();
    assert_eq!(frames.len(), 8);
}

#[test]
fn renderer_rejects_bad_input() {
    let renderer = SimulationRenderer::new(32).unwrap();
    let err = renderer.render_frames(&[1.0, 2.0], &[1.0], 10.0, 5).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgument { .. }));
    assert!(renderer.render_frames(&[1.0], &[1.0], 10.0, 0).is_err());
    assert!(renderer.render_frames(&[1.0], &[1.0], 0.0, 5).is_err());
    assert!(SimulationRenderer::new(1).is_err());
}

#[test]
fn frames_and_gif_are_written() {
    let tmp = TempDir::new("render");
    let traj = sample_trajectory();
    let frames = SimulationRenderer::new(24).unwrap().render_frames(&traj.x, &traj.y, 10.0, 4).unwrap();

    let paths = save_frames(&frames, &tmp.path().join("frames")).unwrap();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.is_file()));

    let gif = tmp.path().join("run.gif");
    write_gif(&frames, &gif, 40).unwrap();
    assert!(fs::metadata(&gif).unwrap().len() > 0);
}

// ==================================================================================
// Storage tests
// ==================================================================================

#[test]
fn saved_run_round_trips() {
    let tmp = TempDir::new("store");
    let store = RunStore::new(tmp.path().join("runs"));
    let traj = sample_trajectory();

    let dir = store.save_run("gravity_test_0", &traj, None).unwrap();
    assert_eq!(dir, tmp.path().join("runs").join("gravity_test_0"));

    let (x, y) = load_coordinates(&dir).unwrap();
    assert_eq!(x.len(), traj.len());
    assert_eq!(y.len(), traj.len());
    for (a, b) in x.iter().zip(&traj.x) {
        assert_relative_eq!(a, b, max_relative = 1e-12);
    }

    let params = load_parameters(&dir).unwrap().unwrap();
    assert_eq!(params.force_type(), traj.parameters.force_type());
    assert_relative_eq!(params.box_size, 10.0);
}

#[test]
fn existing_run_is_never_overwritten() {
    let tmp = TempDir::new("conflict");
    let store = RunStore::new(tmp.path());
    let traj = sample_trajectory();

    store.save_run("run", &traj, None).unwrap();
    let before = fs::read_to_string(tmp.path().join("run").join(PARAMETERS_FILE)).unwrap();

    let err = store.save_run("run", &traj, None).unwrap_err();
    assert!(matches!(err, SimError::ResourceConflict(_)), "{err:?}");
    let after = fs::read_to_string(tmp.path().join("run").join(PARAMETERS_FILE)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn run_name_must_be_single_component() {
    let tmp = TempDir::new("names");
    let store = RunStore::new(tmp.path());
    let traj = sample_trajectory();
    for name in ["", "a/b", "..", "."] {
        let err = store.save_run(name, &traj, None).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument { .. }), "{name}: {err:?}");
    }
}

#[test]
fn rendered_output_is_stored_with_run() {
    let tmp = TempDir::new("rendered");
    let store = RunStore::new(tmp.path());
    let traj = sample_trajectory();
    let frames = SimulationRenderer::new(16).unwrap().render_frames(&traj.x, &traj.y, 10.0, 3).unwrap();

    let rendered = RenderedRun {
        frames: &frames,
        write_frames: true,
        gif_delay_ms: Some(30),
    };
    let dir = store.save_run("with_frames", &traj, Some(rendered)).unwrap();

    assert!(dir.join(GIF_FILE).is_file());
    assert!(dir.join(SNAPSHOTS_DIR).join("frame_0.png").is_file());
    assert!(dir.join(SNAPSHOTS_DIR).join("frame_2.png").is_file());
}

#[test]
fn missing_parameters_record_is_none() {
    let tmp = TempDir::new("noparams");
    fs::write(tmp.path().join("x_coords.json"), "[1.0, 2.0]").unwrap();
    fs::write(tmp.path().join("y_coords.json"), "[3.0, 4.0]").unwrap();

    assert!(load_parameters(tmp.path()).unwrap().is_none());
    assert_eq!(load_coordinates(tmp.path()).unwrap(), (vec![1.0, 2.0], vec![3.0, 4.0]));
}

// ==================================================================================
// Visualizer tests
// ==================================================================================

#[test]
fn visualize_stored_run() {
    let tmp = TempDir::new("visualize");
    let store = RunStore::new(tmp.path());
    let traj = sample_trajectory();
    let dir = store.save_run("run", &traj, None).unwrap();

    let out = tmp.path().join("plots");
    let report = visualize_run(&dir, &out, 10.0).unwrap();

    assert_eq!(report.samples, traj.len());
    assert!(out.join(TRAJECTORY_PLOT_FILE).is_file());
    assert!(out.join(ENERGY_PLOT_FILE).is_file());
    let energy = report.energy.unwrap();
    assert_eq!(energy.len(), traj.len() - 1);
}

#[test]
fn visualize_without_parameters_skips_energy() {
    let tmp = TempDir::new("visualize-bare");
    fs::write(tmp.path().join("x_coords.json"), "[1.0, 2.0, 3.0]").unwrap();
    fs::write(tmp.path().join("y_coords.json"), "[3.0, 4.0, 5.0]").unwrap();

    let out = tmp.path().join("plots");
    let report = visualize_run(tmp.path(), &out, 10.0).unwrap();
    assert!(report.energy.is_none());
    assert!(report.energy_plot.is_none());
    assert!(out.join(TRAJECTORY_PLOT_FILE).is_file());
}

// ==================================================================================
// Dataset tests
// ==================================================================================

#[test]
fn natural_order_compares_numbers() {
    assert!(natural_sort_key("frame_2.png") < natural_sort_key("frame_10.png"));
    assert!(natural_sort_key("Frame_1.png") < natural_sort_key("frame_2.png"));
    assert!(natural_sort_key("frame_9.png") < natural_sort_key("frame_09a.png"));
}

#[test]
fn dataset_yields_three_frame_windows() {
    let tmp = TempDir::new("dataset");
    for i in [10, 2, 1, 3] {
        let shade = (i * 20) as u8;
        RgbaImage::from_pixel(8, 6, Rgba([shade, 0, 0, 255]))
            .save(tmp.path().join(format!("frame_{i}.png")))
            .unwrap();
    }
    fs::write(tmp.path().join("notes.txt"), "not a frame").unwrap();

    let dataset = FrameDataset::open(tmp.path(), None).unwrap();
    assert_eq!(dataset.image_files(), ["frame_1.png", "frame_2.png", "frame_3.png", "frame_10.png"]);
    assert_eq!(dataset.len(), 2);

    let [a, b, c] = dataset.get(1).unwrap();
    assert_eq!(a.get_pixel(0, 0).0, [40, 0, 0]);
    assert_eq!(b.get_pixel(0, 0).0, [60, 0, 0]);
    assert_eq!(c.get_pixel(0, 0).0, [200, 0, 0]);
    assert_eq!(a.dimensions(), (8, 6));

    assert!(matches!(dataset.get(2).unwrap_err(), SimError::InvalidArgument { .. }));
    assert_eq!(dataset.iter().count(), 2);
}

#[test]
fn dataset_resizes_frames() {
    let tmp = TempDir::new("dataset-resize");
    for i in 0..3 {
        RgbaImage::from_pixel(20, 20, WHITE)
            .save(tmp.path().join(format!("frame_{i}.png")))
            .unwrap();
    }
    let dataset = FrameDataset::open(tmp.path(), Some((4, 4))).unwrap();
    let frames = dataset.get(0).unwrap();
    assert!(frames.iter().all(|f| f.dimensions() == (4, 4)));
}

#[test]
fn small_dataset_is_empty() {
    let tmp = TempDir::new("dataset-small");
    RgbaImage::from_pixel(2, 2, WHITE).save(tmp.path().join("frame_0.png")).unwrap();
    let dataset = FrameDataset::open(tmp.path(), None).unwrap();
    assert!(dataset.is_empty());
    assert!(dataset.get(0).is_err());
}

// ==================================================================================
// Scenario tests
// ==================================================================================

pub fn scenario_yaml(directory: &Path, extra: &str) -> String {
    format!(
        r#"
simulation:
  force_type: harmonic_oscillator
  time_step: 0.01
  max_simul_steps: 40
  box_size: 10.0
  seed: 5
render:
  image_pixel_size: 16
  frame_count: 4
output:
  directory: {}
  run_name: scenario
  number_of_trajectories: 2
{extra}
"#,
        directory.display()
    )
}

#[test]
fn scenario_defaults_fill_optional_sections() {
    let cfg = ScenarioConfig::from_yaml_str(
        "simulation:\n  force_type: gravity\n  time_step: 0.01\n  max_simul_steps: 100\n  box_size: 10\n",
    )
    .unwrap();

    assert_eq!(cfg.simulation.body_mass, 1.0);
    assert_eq!(cfg.simulation.boundary, BoundaryPolicy::Terminate);
    assert_eq!(cfg.simulation.seed, None);
    assert_eq!(cfg.sampler.starting_position, vec![0.1, 0.9]);
    assert_eq!(cfg.render.frame_count, 100);
    assert_eq!(cfg.output.number_of_trajectories, 1);
}

#[test]
fn bundled_scenarios_parse() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["gravity.yaml", "magnetic_field.yaml", "harmonic_oscillator.yaml", "box_reflect.yaml", "box_regions.yaml"] {
        let cfg = ScenarioConfig::from_yaml_file(&dir.join(name)).unwrap();
        assert!(Scenario::build_scenario(cfg).is_ok(), "{name}");
    }

    let regions = ScenarioConfig::from_yaml_file(&dir.join("box_regions.yaml")).unwrap();
    assert_eq!(regions.simulation.force_type, ForceType::Regions);
    assert_eq!(regions.simulation.boundary, BoundaryPolicy::Reflect);
}

#[test]
fn scenario_rejects_bad_config() {
    let unknown = "simulation:\n  force_type: friction\n  time_step: 0.01\n  max_simul_steps: 100\n  box_size: 10\n";
    assert!(matches!(ScenarioConfig::from_yaml_str(unknown).unwrap_err(), SimError::Yaml(_)));

    let tmp = TempDir::new("scenario-bad");
    let cfg = ScenarioConfig::from_yaml_str(&scenario_yaml(
        tmp.path(),
        "sampler:\n  starting_position: [0.1, 0.5, 0.9]\n",
    ))
    .unwrap();
    assert!(matches!(Scenario::build_scenario(cfg).unwrap_err(), SimError::Shape { got: 3, .. }));

    let cfg = ScenarioConfig::from_yaml_str(&scenario_yaml(
        tmp.path(),
        "sampler:\n  starting_velocity: [1.0, 1.0]\n",
    ))
    .unwrap();
    assert!(matches!(Scenario::build_scenario(cfg).unwrap_err(), SimError::InvalidArgument { .. }));
}

#[test]
fn scenario_runs_and_stores_every_trajectory() {
    let tmp = TempDir::new("scenario-run");
    let cfg = ScenarioConfig::from_yaml_str(&scenario_yaml(tmp.path(), "")).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.request.seed, 5);

    let dirs = scenario.run().unwrap();
    assert_eq!(dirs.len(), 2);
    for (i, dir) in dirs.iter().enumerate() {
        assert_eq!(*dir, tmp.path().join(format!("scenario_{i}")));
        assert!(dir.join(PARAMETERS_FILE).is_file());
        assert!(dir.join(GIF_FILE).is_file());
        assert!(dir.join(SNAPSHOTS_DIR).join("frame_0.png").is_file());
    }

    // same scenario again would overwrite the first run
    assert!(matches!(scenario.run().unwrap_err(), SimError::ResourceConflict(_)));
}
