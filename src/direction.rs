use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    North,
    South,
    East,
    West,
}

impl Dir {
    /// Order in which the generator lists carving candidates.
    pub const ALL: [Dir; 4] = [Dir::North, Dir::South, Dir::West, Dir::East];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::North => (0, -1),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
            Dir::East => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::South => Dir::North,
            Dir::East => Dir::West,
            Dir::West => Dir::East,
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Dir::North => 1,
            Dir::South => 2,
            Dir::East => 4,
            Dir::West => 8,
        }
    }
}

/// The set of directions a cell has a carved passage towards.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OpenDirs(u8);

impl OpenDirs {
    pub const NONE: OpenDirs = OpenDirs(0);

    pub fn contains(self, dir: Dir) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn insert(&mut self, dir: Dir) {
        self.0 |= dir.bit();
    }

    pub fn union(self, other: OpenDirs) -> OpenDirs {
        OpenDirs(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Dir> {
        Dir::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl From<Dir> for OpenDirs {
    fn from(dir: Dir) -> Self {
        OpenDirs(dir.bit())
    }
}

impl fmt::Debug for OpenDirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in Dir::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn open_dirs_only_grows() {
        let mut open = OpenDirs::NONE;
        assert!(open.is_empty());
        open.insert(Dir::South);
        open.insert(Dir::East);
        open.insert(Dir::South);
        assert_eq!(open.len(), 2);
        assert!(open.contains(Dir::South));
        assert!(!open.contains(Dir::North));
        assert_eq!(open.iter().collect::<Vec<_>>(), vec![Dir::South, Dir::East]);
        assert_eq!(open.union(Dir::West.into()).len(), 3);
    }
}
