//! Minesweeper board model and file format

pub mod grid;
pub mod io;

pub use grid::{neighbors_of, Cell, Grid, Position, Size, MAX_CELLS, MAX_HINT};
pub use io::{
    create_example_puzzles, grid_to_string, load_grid_from_file, load_grids_from_directory,
    load_puzzle_files, parse_grid_from_string, save_grid_to_file,
};
