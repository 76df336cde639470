//! Public facade: translation and training entry points over the core.

pub mod trainer;
pub mod translator;

pub use trainer::ModelTrainer;
pub use translator::{MemoryTranslationSink, SignTranslator, TranslationSink};
