use rand::Rng;
use tracing::{debug, info};

use crate::cell_graph::{CellGraph, Pos, VisitedSet};
use crate::config::GameConfig;
use crate::direction::Dir;
use crate::display_grid::DisplayGrid;
use crate::error::MazeResult;
use crate::generator::{Generator, StepResult};
use crate::movement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Generating,
    Playing,
    GoalReached,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub dir: Option<Dir>,
    pub reset: bool,
    pub quit: bool,
}

impl Input {
    pub fn moving(dir: Dir) -> Self {
        Self {
            dir: Some(dir),
            ..Self::default()
        }
    }

    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Directional keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// One direction per tick: vertical before horizontal, then up, down,
    /// left, right.
    pub fn direction(&self) -> Option<Dir> {
        if self.up {
            Some(Dir::North)
        } else if self.down {
            Some(Dir::South)
        } else if self.left {
            Some(Dir::West)
        } else if self.right {
            Some(Dir::East)
        } else {
            None
        }
    }
}

pub struct Game<R> {
    config: GameConfig,
    generator: Generator<R>,
    phase: Phase,
    /// Display-grid coordinate; `None` until the maze is finished.
    player: Option<Pos>,
    moves: u32,
    grid: DisplayGrid,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> MazeResult<Self> {
        config.validate()?;
        let generator = Generator::new(config.width, config.height, config.start, rng)?;
        let grid = DisplayGrid::build(generator.graph(), generator.visited())?;
        Ok(Self {
            config,
            generator,
            phase: Phase::Generating,
            player: None,
            moves: 0,
            grid,
        })
    }

    pub fn tick(&mut self, input: Input) -> MazeResult<TickOutcome> {
        if input.quit {
            return Ok(TickOutcome::Quit);
        }
        if input.reset {
            self.reset()?;
            return Ok(TickOutcome::Continue);
        }

        match self.phase {
            Phase::Generating => self.advance_generation()?,
            Phase::Playing => {
                if let Some(dir) = input.dir {
                    self.try_move(dir);
                }
            }
            Phase::GoalReached => {}
        }
        Ok(TickOutcome::Continue)
    }

    /// Starts a fresh maze. Nothing else happens in the tick that resets.
    pub fn reset(&mut self) -> MazeResult<()> {
        self.generator.restart(self.config.start)?;
        self.grid = DisplayGrid::build(self.generator.graph(), self.generator.visited())?;
        self.phase = Phase::Generating;
        self.player = None;
        self.moves = 0;
        debug!("reset to generating");
        Ok(())
    }

    fn advance_generation(&mut self) -> MazeResult<()> {
        let mut result = StepResult::InProgress;
        if self.config.instant {
            self.generator.run_to_completion()?;
            result = StepResult::Complete;
        } else {
            for _ in 0..self.config.steps_per_tick {
                result = self.generator.step()?;
                if result == StepResult::Complete {
                    break;
                }
            }
        }
        self.grid = DisplayGrid::build(self.generator.graph(), self.generator.visited())?;

        if result == StepResult::Complete {
            let player = self.config.start.to_grid();
            self.player = Some(player);
            self.phase = Phase::Playing;
            debug!(x = player.x, y = player.y, "generation finished, playing");
            if player == self.config.goal.to_grid() {
                self.phase = Phase::GoalReached;
            }
        }
        Ok(())
    }

    fn try_move(&mut self, dir: Dir) {
        let Some(pos) = self.player else {
            return;
        };
        let Some(next) = movement::step(&self.grid, pos, dir) else {
            return;
        };
        self.player = Some(next);
        self.moves += 1;
        if next == self.config.goal.to_grid() {
            self.phase = Phase::GoalReached;
            info!(moves = self.moves, "goal reached");
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &DisplayGrid {
        &self.grid
    }

    pub fn graph(&self) -> &CellGraph {
        self.generator.graph()
    }

    pub fn visited(&self) -> &VisitedSet {
        self.generator.visited()
    }

    /// Cell the generator is carving, while generating.
    pub fn cursor(&self) -> Option<Pos> {
        match self.phase {
            Phase::Generating => self.generator.current(),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<Pos> {
        self.player
    }

    pub fn start(&self) -> Pos {
        self.config.start
    }

    pub fn goal(&self) -> Pos {
        self.config.goal
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// (visited cells, total cells)
    pub fn generation_progress(&self) -> (usize, usize) {
        (
            self.generator.visited().count(),
            self.config.width * self.config.height,
        )
    }

    /// Moves left on the shortest route from the player to the goal.
    pub fn remaining_distance(&self) -> Option<u32> {
        let player = self.player?;
        movement::distance(&self.grid, player, self.config.goal.to_grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn finished_game(config: GameConfig) -> Game<StdRng> {
        let mut game = Game::new(config, StdRng::seed_from_u64(99)).unwrap();
        while game.phase() == Phase::Generating {
            game.tick(Input::default()).unwrap();
        }
        game
    }

    #[test]
    fn held_keys_prefer_vertical() {
        let keys = HeldKeys {
            up: false,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(keys.direction(), Some(Dir::South));
        let keys = HeldKeys {
            left: true,
            right: true,
            ..HeldKeys::default()
        };
        assert_eq!(keys.direction(), Some(Dir::West));
        assert_eq!(HeldKeys::default().direction(), None);
    }

    #[test]
    fn one_step_per_tick_while_generating() {
        let mut game = Game::new(GameConfig::with_size(3, 3), StepRng::new(0, 0)).unwrap();
        assert_eq!(game.cursor(), Some(Pos::new(2, 2)));
        game.tick(Input::default()).unwrap();
        assert_eq!(game.generation_progress(), (2, 9));
        assert_eq!(game.cursor(), Some(Pos::new(2, 1)));
        assert_eq!(game.player(), None);
        // 2·9 - 1 steps in total, one already taken
        for _ in 0..16 {
            game.tick(Input::default()).unwrap();
        }
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.cursor(), None);
        assert_eq!(game.player(), Some(Pos::new(5, 5)));
    }

    #[test]
    fn instant_generation_finishes_on_first_tick() {
        let mut config = GameConfig::with_size(6, 4);
        config.instant = true;
        let mut game = Game::new(config, StdRng::seed_from_u64(1)).unwrap();
        game.tick(Input::default()).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.grid().passable_count(), 24 + 23);
    }

    #[test]
    fn movement_is_ignored_while_generating() {
        let mut game = Game::new(GameConfig::with_size(4, 4), StdRng::seed_from_u64(4)).unwrap();
        game.tick(Input::moving(Dir::North)).unwrap();
        assert_eq!(game.phase(), Phase::Generating);
        assert_eq!(game.player(), None);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn blocked_move_is_a_no_op() {
        let mut game = finished_game(GameConfig::with_size(4, 4));
        let start = game.player();
        // the start cell is the bottom-right corner, nothing lies south or east
        game.tick(Input::moving(Dir::South)).unwrap();
        game.tick(Input::moving(Dir::East)).unwrap();
        assert_eq!(game.player(), start);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn quit_is_passed_through() {
        let mut game = Game::new(GameConfig::with_size(2, 2), StdRng::seed_from_u64(0)).unwrap();
        let outcome = game
            .tick(Input {
                quit: true,
                ..Input::default()
            })
            .unwrap();
        assert_eq!(outcome, TickOutcome::Quit);
        assert_eq!(game.generation_progress(), (1, 4));
    }

    #[test]
    fn reset_does_not_advance_in_the_same_tick() {
        let mut game = finished_game(GameConfig::with_size(5, 5));
        let outcome = game
            .tick(Input {
                dir: Some(Dir::North),
                reset: true,
                quit: false,
            })
            .unwrap();
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(game.phase(), Phase::Generating);
        assert_eq!(game.player(), None);
        assert_eq!(game.generation_progress(), (1, 25));
        assert_eq!(game.grid().passable_count(), 1);
    }

    #[test]
    fn single_cell_maze_is_won_immediately() {
        let mut game = Game::new(GameConfig::with_size(1, 1), StdRng::seed_from_u64(0)).unwrap();
        game.tick(Input::default()).unwrap();
        assert_eq!(game.phase(), Phase::GoalReached);
        assert_eq!(game.remaining_distance(), Some(0));
    }

    #[test]
    fn invalid_config_produces_no_game() {
        let mut config = GameConfig::with_size(3, 3);
        config.start = Pos::new(5, 5);
        assert!(Game::new(config, StdRng::seed_from_u64(0)).is_err());
    }
}
