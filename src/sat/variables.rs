//! Mapping between board positions and SAT variables
//!
//! Every cell owns exactly one variable, `row * cols + col + 1`, meaning
//! "this cell holds a mine". Variable 0 is reserved as the DIMACS terminator
//! and is never produced.

use crate::board::{Position, Size};

/// A 1-based SAT variable
pub type Variable = i32;

/// A signed variable; positive asserts a mine, negative asserts no mine
pub type Literal = i32;

/// Variable owned by the cell at `pos`.
///
/// Panics if `pos` lies outside `size`; callers only pass positions produced
/// by the board itself.
pub fn to_variable(pos: Position, size: Size) -> Variable {
    assert!(
        size.contains(pos),
        "position {} out of bounds for {}x{} grid",
        pos,
        size.rows,
        size.cols
    );
    let index = pos.row * size.cols + pos.col + 1;
    match Variable::try_from(index) {
        Ok(var) => var,
        Err(_) => panic!("cell {} needs variable {}, beyond the SAT variable range", pos, index),
    }
}

/// Position owning `variable`. Exact inverse of [`to_variable`].
///
/// Panics if `variable` is not in `1..=rows*cols`.
pub fn to_position(variable: Variable, size: Size) -> Position {
    assert!(
        variable >= 1 && variable as usize <= size.cell_count(),
        "variable {} out of range for {}x{} grid",
        variable,
        size.rows,
        size.cols
    );
    let index = (variable - 1) as usize;
    Position::new(index / size.cols, index % size.cols)
}

/// Number of variables a board of `size` needs
pub fn variable_count(size: Size) -> usize {
    size.cell_count()
}
