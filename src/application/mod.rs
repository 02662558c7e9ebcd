// Application layer: use cases orchestrating the domain and the solver adapters

pub mod pipeline;

pub use pipeline::{PipelineOutcome, SolvePipeline};
