pub mod analysis;
pub mod evaluator;
pub mod explain;
pub mod optimizer;
pub mod plan;
pub mod risk;
pub mod tiered;
