use crate::direction::{Dir, OpenDirs};
use crate::error::{MazeError, MazeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Display-grid coordinate of the tile that stands for this maze cell.
    pub fn to_grid(self) -> Pos {
        Pos {
            x: self.x * 2 + 1,
            y: self.y * 2 + 1,
        }
    }

    /// Position one unit away in `dir`, or `None` when that would go below zero.
    pub fn offset(self, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }
}

fn check_dims(width: usize, height: usize) -> MazeResult<()> {
    if width == 0 || height == 0 {
        return Err(MazeError::InvalidConfiguration(format!(
            "maze dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// The logical maze: one open-direction set per cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGraph {
    width: usize,
    height: usize,
    cells: Vec<OpenDirs>,
}

impl CellGraph {
    pub fn new(width: usize, height: usize) -> MazeResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![OpenDirs::NONE; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn out_of_range(&self, pos: Pos) -> MazeError {
        MazeError::InvalidCoordinate {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    fn index(&self, pos: Pos) -> MazeResult<usize> {
        if !self.contains(pos) {
            return Err(self.out_of_range(pos));
        }
        Ok(pos.y * self.width + pos.x)
    }

    pub fn get(&self, pos: Pos) -> MazeResult<OpenDirs> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx])
    }

    pub fn is_open(&self, pos: Pos, dir: Dir) -> MazeResult<bool> {
        Ok(self.get(pos)?.contains(dir))
    }

    /// Adds `dirs` to the cell's open set. Walls are only ever removed, so
    /// bits already set stay set.
    pub fn open(&mut self, pos: Pos, dirs: OpenDirs) -> MazeResult<()> {
        let idx = self.index(pos)?;
        self.cells[idx] = self.cells[idx].union(dirs);
        Ok(())
    }

    /// In-bounds neighbor of `pos` in `dir`.
    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        pos.offset(dir).filter(|p| self.contains(*p))
    }

    /// Removes the wall between `pos` and its neighbor in `dir`, on both sides.
    pub fn carve(&mut self, pos: Pos, dir: Dir) -> MazeResult<Pos> {
        self.index(pos)?;
        let next = match self.neighbor(pos, dir) {
            Some(next) => next,
            None => {
                return Err(MazeError::NoNeighbor {
                    x: pos.x,
                    y: pos.y,
                    dir,
                })
            }
        };
        self.open(pos, dir.into())?;
        self.open(next, dir.opposite().into())?;
        Ok(next)
    }

    /// Number of undirected passages. Each one is stored on both of its cells.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(|c| c.len()).sum::<usize>() / 2
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Pos { x, y }))
    }
}

/// Cells the generator has carved into during the current run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitedSet {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    count: usize,
}

impl VisitedSet {
    pub fn new(width: usize, height: usize) -> MazeResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![false; width * height],
            count: 0,
        })
    }

    /// Every cell visited; how a finished maze is rendered.
    pub fn full(width: usize, height: usize) -> MazeResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![true; width * height],
            count: width * height,
        })
    }

    fn index(&self, pos: Pos) -> MazeResult<usize> {
        if pos.x >= self.width || pos.y >= self.height {
            return Err(MazeError::InvalidCoordinate {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y * self.width + pos.x)
    }

    pub fn mark(&mut self, pos: Pos) -> MazeResult<()> {
        let idx = self.index(pos)?;
        if !self.cells[idx] {
            self.cells[idx] = true;
            self.count += 1;
        }
        Ok(())
    }

    pub fn is_visited(&self, pos: Pos) -> MazeResult<bool> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx])
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            CellGraph::new(0, 4),
            Err(MazeError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            VisitedSet::new(3, 0),
            Err(MazeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn carve_opens_both_sides() {
        let mut graph = CellGraph::new(3, 2).unwrap();
        let next = graph.carve(Pos::new(1, 0), Dir::South).unwrap();
        assert_eq!(next, Pos::new(1, 1));
        assert!(graph.is_open(Pos::new(1, 0), Dir::South).unwrap());
        assert!(graph.is_open(Pos::new(1, 1), Dir::North).unwrap());
        assert!(!graph.is_open(Pos::new(1, 1), Dir::East).unwrap());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut graph = CellGraph::new(2, 2).unwrap();
        assert!(matches!(
            graph.get(Pos::new(2, 0)),
            Err(MazeError::InvalidCoordinate { x: 2, y: 0, .. })
        ));
        assert!(matches!(
            graph.carve(Pos::new(2, 1), Dir::West),
            Err(MazeError::InvalidCoordinate { x: 2, y: 1, .. })
        ));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn carving_through_the_outer_wall_names_the_cell_and_direction() {
        let mut graph = CellGraph::new(2, 2).unwrap();
        assert!(matches!(
            graph.carve(Pos::new(0, 0), Dir::North),
            Err(MazeError::NoNeighbor { x: 0, y: 0, dir: Dir::North })
        ));
        assert!(matches!(
            graph.carve(Pos::new(1, 1), Dir::East),
            Err(MazeError::NoNeighbor { x: 1, y: 1, dir: Dir::East })
        ));
        let err = graph.carve(Pos::new(0, 1), Dir::West).unwrap_err();
        assert_eq!(err.to_string(), "cell (0, 1) has no neighbor to the West");
        assert_eq!(graph.get(Pos::new(0, 0)).unwrap(), OpenDirs::NONE);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn visited_count_ignores_repeats() {
        let mut visited = VisitedSet::new(2, 2).unwrap();
        visited.mark(Pos::new(1, 1)).unwrap();
        visited.mark(Pos::new(1, 1)).unwrap();
        assert_eq!(visited.count(), 1);
        assert!(visited.is_visited(Pos::new(1, 1)).unwrap());
        assert!(!visited.is_visited(Pos::new(0, 1)).unwrap());
        assert_eq!(VisitedSet::full(2, 3).unwrap().count(), 6);
    }
}
