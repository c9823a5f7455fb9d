use crate::cell_graph::{CellGraph, Pos, VisitedSet};
use crate::direction::Dir;
use crate::error::MazeResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl DisplayGrid {
    // unvisited cells stay walls even when a neighbor opened towards them
    pub fn build(graph: &CellGraph, visited: &VisitedSet) -> MazeResult<DisplayGrid> {
        let width = graph.width() * 2 + 1;
        let height = graph.height() * 2 + 1;
        let mut grid = DisplayGrid {
            width,
            height,
            tiles: vec![Tile::Wall; width * height],
        };

        for cell in graph.positions() {
            if !visited.is_visited(cell)? {
                continue;
            }
            let g = cell.to_grid();
            grid.open(g);
            // North and west openings are the south and east openings of
            // the neighboring cell.
            let open = graph.get(cell)?;
            if open.contains(Dir::South) {
                grid.open(Pos::new(g.x, g.y + 1));
            }
            if open.contains(Dir::East) {
                grid.open(Pos::new(g.x + 1, g.y));
            }
        }
        Ok(grid)
    }

    pub fn build_complete(graph: &CellGraph) -> MazeResult<DisplayGrid> {
        let visited = VisitedSet::full(graph.width(), graph.height())?;
        Self::build(graph, &visited)
    }

    fn open(&mut self, pos: Pos) {
        let idx = pos.y * self.width + pos.x;
        self.tiles[idx] = Tile::Open;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some(self.tiles[pos.y * self.width + pos.x])
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Open)
    }

    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|t| **t == Tile::Open).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }
}
