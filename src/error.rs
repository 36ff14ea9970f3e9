// Typed errors raised by the specification algebra

use thiserror::Error;

/// Errors produced while resolving an algebraic specification into roles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// Three or more positional columns and no explicit x/y assignment
    #[error(
        "Layer {layer} crosses {} columns ({}) without explicit roles; \
         use aes(x: ..., y: ...) to pick the axes",
        .columns.len(),
        .columns.join(", ")
    )]
    AmbiguousRoles { columns: Vec<String>, layer: usize },

    /// Layer carries neither columns nor explicit roles
    #[error("Layer {layer} has no columns to map (cross it with at least one column)")]
    NoColumns { layer: usize },

    /// Explicit roles were given but x is missing
    #[error("Layer {layer} assigns explicit roles but no x aesthetic")]
    MissingX { layer: usize },
}
