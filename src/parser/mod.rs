// Algebra expression language parser

pub mod aesthetics;
pub mod ast;
pub mod expr;
pub mod geom;
pub mod lexer;

// Public API re-exports
pub use ast::Expr;
pub use expr::parse_expr;
