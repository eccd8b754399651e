pub mod states;
pub mod params;
pub mod forces;
pub mod sampler;
pub mod integrator;
pub mod trajectory;
pub mod generator;
pub mod scenario;
