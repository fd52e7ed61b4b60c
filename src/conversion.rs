/// Builds individual layers from weight dictionaries
pub mod layer_builder;
/// Composes the layers into a model and exports it
pub mod model_assembler;

pub use layer_builder::*;
pub use model_assembler::*;
