mod cmake;

pub use cmake::{BuildOptions, BuildPlan, BuildStep, build_dependency, run_build};
