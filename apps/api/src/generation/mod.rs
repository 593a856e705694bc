// Document bundle generation: orchestration, companion generators, workspace.
// External generators are reached only through the DocumentGenerators trait.

pub mod batch;
pub mod companion;
pub mod generator;
pub mod handlers;
pub mod workspace;
