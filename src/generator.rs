use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, trace};

use crate::cell_graph::{CellGraph, Pos, VisitedSet};
use crate::direction::Dir;
use crate::error::{MazeError, MazeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    InProgress,
    Complete,
}

pub struct Generator<R> {
    graph: CellGraph,
    visited: VisitedSet,
    frontier: Vec<Pos>,
    rng: R,
    steps: usize,
}

fn fresh_run(width: usize, height: usize, start: Pos) -> MazeResult<(CellGraph, VisitedSet)> {
    let graph = CellGraph::new(width, height)?;
    let mut visited = VisitedSet::new(width, height)?;
    if !graph.contains(start) {
        return Err(MazeError::InvalidCoordinate {
            x: start.x,
            y: start.y,
            width,
            height,
        });
    }
    visited.mark(start)?;
    Ok((graph, visited))
}

impl<R: Rng> Generator<R> {
    pub fn new(width: usize, height: usize, start: Pos, rng: R) -> MazeResult<Self> {
        let (graph, visited) = fresh_run(width, height, start)?;
        info!(width, height, start_x = start.x, start_y = start.y, "starting maze generation");
        Ok(Self {
            graph,
            visited,
            frontier: vec![start],
            rng,
            steps: 0,
        })
    }

    pub fn restart(&mut self, start: Pos) -> MazeResult<()> {
        let (width, height) = (self.graph.width(), self.graph.height());
        let (graph, visited) = fresh_run(width, height, start)?;
        info!(width, height, start_x = start.x, start_y = start.y, "restarting maze generation");
        self.graph = graph;
        self.visited = visited;
        self.frontier = vec![start];
        self.steps = 0;
        Ok(())
    }

    /// Idempotent once complete.
    pub fn step(&mut self) -> MazeResult<StepResult> {
        let Some(&current) = self.frontier.last() else {
            return Ok(StepResult::Complete);
        };
        self.steps += 1;

        let mut candidates: Vec<(Pos, Dir)> = Vec::with_capacity(4);
        for dir in Dir::ALL {
            if let Some(next) = self.graph.neighbor(current, dir) {
                if !self.visited.is_visited(next)? {
                    candidates.push((next, dir));
                }
            }
        }

        match candidates.choose(&mut self.rng) {
            Some(&(next, dir)) => {
                self.graph.carve(current, dir)?;
                self.visited.mark(next)?;
                self.frontier.push(next);
                trace!(x = next.x, y = next.y, ?dir, "carved");
            }
            None => {
                self.frontier.pop();
                trace!(x = current.x, y = current.y, "backtracked");
            }
        }

        if self.frontier.is_empty() {
            info!(steps = self.steps, "maze generation complete");
            Ok(StepResult::Complete)
        } else {
            Ok(StepResult::InProgress)
        }
    }

    pub fn run_to_completion(&mut self) -> MazeResult<()> {
        while self.step()? == StepResult::InProgress {}
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn current(&self) -> Option<Pos> {
        self.frontier.last().copied()
    }

    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn frontier(&self) -> &[Pos] {
        &self.frontier
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn into_graph(self) -> CellGraph {
        self.graph
    }
}

pub fn generate<R: Rng>(width: usize, height: usize, start: Pos, rng: R) -> MazeResult<CellGraph> {
    let mut generator = Generator::new(width, height, start, rng)?;
    generator.run_to_completion()?;
    Ok(generator.into_graph())
}
