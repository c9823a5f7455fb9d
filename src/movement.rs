use std::collections::VecDeque;

use crate::cell_graph::Pos;
use crate::direction::Dir;
use crate::display_grid::DisplayGrid;

/// Whether a player at `pos` may move one tile in `dir`. Asking past the
/// grid edge is allowed and simply answers `false`.
pub fn can_move(grid: &DisplayGrid, pos: Pos, dir: Dir) -> bool {
    match pos.offset(dir) {
        Some(next) => grid.is_passable(next),
        None => false,
    }
}

/// Target of a legal move, `None` if blocked.
pub fn step(grid: &DisplayGrid, pos: Pos, dir: Dir) -> Option<Pos> {
    pos.offset(dir).filter(|next| grid.is_passable(*next))
}

/// Breadth-first move counts from `start` to every tile, row-major.
pub fn bfs_distance(grid: &DisplayGrid, start: Pos) -> Vec<Option<u32>> {
    let width = grid.width();
    let mut dist = vec![None; width * grid.height()];
    if !grid.is_passable(start) {
        return dist;
    }
    let mut q = VecDeque::new();
    dist[start.y * width + start.x] = Some(0);
    q.push_back(start);

    while let Some(pos) = q.pop_front() {
        let base = dist[pos.y * width + pos.x].unwrap_or(0);
        for dir in Dir::ALL {
            let Some(next) = step(grid, pos, dir) else {
                continue;
            };
            let idx = next.y * width + next.x;
            if dist[idx].is_none() {
                dist[idx] = Some(base + 1);
                q.push_back(next);
            }
        }
    }
    dist
}

pub fn distance(grid: &DisplayGrid, from: Pos, to: Pos) -> Option<u32> {
    if grid.tile(to).is_none() {
        return None;
    }
    bfs_distance(grid, from)[to.y * grid.width() + to.x]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_graph::CellGraph;

    fn corridor() -> DisplayGrid {
        // three cells in a row, joined left to right
        let mut graph = CellGraph::new(3, 1).unwrap();
        graph.carve(Pos::new(0, 0), Dir::East).unwrap();
        graph.carve(Pos::new(1, 0), Dir::East).unwrap();
        DisplayGrid::build_complete(&graph).unwrap()
    }

    #[test]
    fn moves_follow_open_tiles() {
        let grid = corridor();
        let pos = Pos::new(1, 1);
        assert!(can_move(&grid, pos, Dir::East));
        assert!(!can_move(&grid, pos, Dir::West));
        assert!(!can_move(&grid, pos, Dir::North));
        assert_eq!(step(&grid, pos, Dir::East), Some(Pos::new(2, 1)));
        assert_eq!(step(&grid, pos, Dir::South), None);
    }

    #[test]
    fn moving_off_the_edge_is_false() {
        let grid = corridor();
        assert!(!can_move(&grid, Pos::new(0, 0), Dir::North));
        assert!(!can_move(&grid, Pos::new(0, 0), Dir::West));
        assert!(!can_move(&grid, Pos::new(6, 2), Dir::South));
        assert!(!can_move(&grid, Pos::new(6, 2), Dir::East));
    }

    #[test]
    fn distance_counts_tiles() {
        let grid = corridor();
        assert_eq!(distance(&grid, Pos::new(1, 1), Pos::new(5, 1)), Some(4));
        assert_eq!(distance(&grid, Pos::new(1, 1), Pos::new(1, 1)), Some(0));
        assert_eq!(distance(&grid, Pos::new(1, 1), Pos::new(0, 0)), None);
        assert_eq!(distance(&grid, Pos::new(0, 0), Pos::new(1, 1)), None);
        assert_eq!(distance(&grid, Pos::new(1, 1), Pos::new(40, 1)), None);
    }
}
