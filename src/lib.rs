// Library exports for gramsplom

pub mod algebra;
pub mod csv_reader;
pub mod error;
pub mod graph;
pub mod palette;
pub mod parser;
pub mod runtime;

// Render pipeline phases
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
