pub mod ai;
pub mod generation;
pub mod resolver;
pub mod sources;

pub use generation::GenerationOrchestrator;
pub use resolver::{CacheClass, MetadataResolver, Resolution};
