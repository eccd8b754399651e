pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod storage;
pub mod dataset;

pub use error::{Result, SimError};

pub use simulation::states::{NVec2, State};
pub use simulation::params::{ForceType, SimulationParameters};
pub use simulation::forces::ForceModel;
pub use simulation::sampler::InitialConditionSampler;
pub use simulation::integrator::{verlet_integrator, verlet_step, BoundaryPolicy, StepOutcome};
pub use simulation::trajectory::{Termination, Trajectory};
pub use simulation::generator::{generate, simulate, TrajectoryGenerator};
pub use simulation::scenario::{RunRequest, Scenario};

pub use configuration::config::{ScenarioConfig, SimulationConfig, SamplerConfig, RenderConfig, OutputConfig};

pub use visualization::renderer::{SimulationRenderer, Sprite};
pub use visualization::energy::{reconstruct_energy, EnergyProfile};
pub use visualization::visualizer::visualize_run;

pub use storage::run_store::RunStore;
pub use dataset::frames::FrameDataset;
