pub mod renderer;
pub mod energy;
pub mod plot;
pub mod visualizer;
