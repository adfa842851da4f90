//! This crate provides utilities for solving sliding-tile puzzles with the
//! A* search algorithm, running the initial board and its twin in lockstep
//! to decide solvability without a separate parity computation.

mod frontier;
mod node;
mod solver;

use crate::frontier::*;
use crate::node::*;

pub use crate::frontier::EmptyFrontier;
pub use crate::solver::{Heuristic, Solver, SolverError};
