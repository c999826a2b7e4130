// PromptGAN - adversarial prompt refinement service
// Library exports

pub mod agents;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod providers;
pub mod refinement;
pub mod server;

pub use errors::RefineError;
pub use refinement::{RefineOutcome, RefineReport, RefinementLoop};
