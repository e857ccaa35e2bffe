pub mod analogy;
mod macros;
pub mod vectors;

pub use analogy::{Analogy, Op, ParseError};
pub use vectors::{QueryError, VectorsError, Word, WordVectors};
