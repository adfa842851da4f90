use super::*;

use npuzzle_common::board::Board;

use log::debug;
use thiserror::Error;

use std::time::{Duration, Instant};

/// Expanded-node interval between search progress log lines.
const PROGRESS_LOG_INTERVAL: u64 = 100_000;

/// Errors surfaced by [`Solver`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    #[error(transparent)]
    Frontier(#[from] EmptyFrontier),
}

/// Cost-to-go estimate used to rank search states.
///
/// Both variants never overestimate the true remaining distance, which the
/// search needs for optimality; `Manhattan` is the tighter bound and the
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Number of tiles out of place.
    Hamming,
    /// Sum of tile distances to their goal cells.
    #[default]
    Manhattan,
}

impl Heuristic {
    pub fn evaluate(self, board: &Board) -> u32 {
        match self {
            Heuristic::Hamming => board.hamming(),
            Heuristic::Manhattan => board.manhattan(),
        }
    }
}

/// One side of the lockstep search: a node arena plus its frontier.
struct Search {
    heuristic: Heuristic,
    nodes: Vec<SearchNode>,
    frontier: Frontier,
}

impl Search {
    fn seed(board: Board, heuristic: Heuristic) -> Self {
        let mut search = Search {
            heuristic,
            nodes: Vec::new(),
            frontier: Frontier::new(),
        };
        search.enqueue(SearchNode {
            estimate: heuristic.evaluate(&board),
            board,
            moves: 0,
            parent: None,
        });
        search
    }

    fn enqueue(&mut self, node: SearchNode) {
        let index = self.nodes.len() as u32;
        self.frontier.insert(RankedNode::new(index, &node));
        self.nodes.push(node);
    }

    fn pop(&mut self) -> Result<u32, EmptyFrontier> {
        Ok(self.frontier.extract_min()?.index)
    }

    fn node(&self, index: u32) -> &SearchNode {
        &self.nodes[index as usize]
    }

    /// Queues a child for every neighbor of the node at `index`.
    ///
    /// The search keeps no visited set: a state reached along different
    /// parents is enqueued again each time.
    fn expand(&mut self, index: u32) {
        let neighbors = self.nodes[index as usize].board.neighbors();
        let moves = self.nodes[index as usize].moves + 1;
        for board in neighbors {
            self.enqueue(SearchNode {
                estimate: self.heuristic.evaluate(&board),
                board,
                moves,
                parent: Some(index),
            });
        }
    }

    /// Boards from the root to the node at `index`, in forward order.
    fn path_to(&self, index: u32) -> Vec<Board> {
        let mut path = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            let node = self.node(current);
            path.push(node.board.clone());
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// Optimal sliding-tile solver.
///
/// Runs two priority searches in lockstep, one from the initial board and
/// one from its twin. Swapping a pair of non-blank tiles flips the
/// permutation parity that governs reachability, and every blank move
/// preserves it, so exactly one of the two searches can reach the goal;
/// whichever side gets there first decides solvability.
#[derive(Debug, Clone)]
pub struct Solver {
    heuristic: Heuristic,
    moves: i32,
    solution: Vec<Board>,
    states: usize,
    elapsed: Duration,
}

impl Solver {
    /// Solves `initial` with the default Manhattan heuristic.
    pub fn new(initial: Board) -> Result<Self, SolverError> {
        Self::with_heuristic(initial, Heuristic::default())
    }

    /// Solves `initial`, ranking search states with `heuristic`.
    ///
    /// The search runs to completion here; the accessors on the returned
    /// solver only report the recorded outcome.
    pub fn with_heuristic(initial: Board, heuristic: Heuristic) -> Result<Self, SolverError> {
        let timer = Instant::now();

        let twin = initial.twin();
        let mut main = Search::seed(initial, heuristic);
        let mut twin_search = Search::seed(twin, heuristic);
        let mut expanded: u64 = 0;

        let (moves, solution) = loop {
            let main_top = main.pop()?;
            let twin_top = twin_search.pop()?;

            if main.node(main_top).board.is_goal() {
                let moves = main.node(main_top).moves as i32;
                break (moves, main.path_to(main_top));
            }
            if twin_search.node(twin_top).board.is_goal() {
                break (-1, Vec::new());
            }

            main.expand(main_top);
            twin_search.expand(twin_top);

            expanded += 2;
            if expanded % PROGRESS_LOG_INTERVAL == 0 {
                debug!(
                    "expanded {expanded} nodes, frontier sizes {} / {}",
                    main.frontier.len(),
                    twin_search.frontier.len()
                );
            }
        };

        let states = main.nodes.len() + twin_search.nodes.len();
        let elapsed = timer.elapsed();
        debug!("search finished: moves = {moves}, states = {states}, elapsed = {elapsed:?}");

        Ok(Solver {
            heuristic,
            moves,
            solution,
            states,
            elapsed,
        })
    }

    /// Heuristic this solver ranked states with.
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Whether the initial board can reach the goal at all.
    pub fn is_solvable(&self) -> bool {
        self.moves != -1
    }

    /// Minimum number of blank moves to the goal, or -1 if unreachable.
    pub fn moves(&self) -> i32 {
        self.moves
    }

    /// The boards of one optimal solution, initial first and goal last.
    ///
    /// `None` when the puzzle is unsolvable. The slice can be walked any
    /// number of times.
    pub fn solution(&self) -> Option<&[Board]> {
        if self.is_solvable() {
            Some(&self.solution)
        } else {
            None
        }
    }

    /// Search nodes created across both searches.
    pub fn states(&self) -> usize {
        self.states
    }

    /// Wall-clock time the search took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
