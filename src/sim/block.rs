//! Block grid and ball/block collision resolution

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{Aabb, ball_block_collision, ghost_block_overlap};
use super::palette::{self, Rgba};
use crate::consts::*;

/// A single destructible block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub rect: Aabb,
    pub lives: i32,
    pub color: Rgba,
    pub active: bool,
}

impl Block {
    pub fn new(rect: Aabb, lives: i32, alternate_palette: bool) -> Self {
        Self {
            rect,
            lives,
            color: palette::block_color(lives, alternate_palette),
            active: lives > 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Remove `damage` lives, deactivating or recolouring as needed
    fn take_damage(&mut self, damage: i32, alternate_palette: bool) {
        self.lives -= damage;
        if self.lives <= 0 {
            self.active = false;
        } else {
            self.color = palette::block_color(self.lives, alternate_palette);
        }
    }

    /// Test the ball against this block and resolve any hit
    ///
    /// A ghost ball only takes one life and never changes course. A solid
    /// ball deals its damage multiplier, reflects off the shallowest face with
    /// a small random perturbation on the other axis, and speeds up. Contact
    /// with a face the ball is already leaving is ignored.
    pub fn check_collision<R: Rng>(&mut self, ball: &mut Ball, alternate_palette: bool, rng: &mut R) -> bool {
        if !self.active {
            return false;
        }

        if ball.is_ghost {
            if !ghost_block_overlap(ball.pos, ball.radius, &self.rect) {
                return false;
            }
            self.take_damage(1, alternate_palette);
            return true;
        }

        let result = ball_block_collision(ball.pos, ball.radius, &self.rect);
        // A ball still inside the contact zone after bouncing off this face
        // is on its way out
        if !result.hit || result.side.is_separating(ball.dir) {
            return false;
        }

        self.take_damage(ball.damage_multiplier, alternate_palette);

        let jitter = rng.random_range(-BLOCK_BOUNCE_JITTER..=BLOCK_BOUNCE_JITTER) as f32 / 100.0;
        if result.side.is_horizontal() {
            ball.dir.x = -ball.dir.x;
            ball.dir.y += jitter;
        } else {
            ball.dir.y = -ball.dir.y;
            ball.dir.x += jitter;
        }
        ball.bounce();

        true
    }
}

/// What happened when the ball was tested against the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHit {
    pub row: usize,
    pub column: usize,
    /// Centre of the struck block, where a power-up would spawn
    pub center: Vec2,
    pub destroyed: bool,
}

/// Fixed-capacity block grid; only `rows x columns` is live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockGrid {
    pub cells: [[Block; MAX_BLOCK_COLUMNS]; MAX_BLOCK_ROWS],
    pub rows: usize,
    pub columns: usize,
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self {
            cells: [[Block::default(); MAX_BLOCK_COLUMNS]; MAX_BLOCK_ROWS],
            rows: 0,
            columns: 0,
        }
    }
}

/// Width and height of one block for the given screen and column count
pub fn block_dimensions(screen_width: f32, screen_height: f32, columns: usize) -> Vec2 {
    let columns = columns.max(1) as f32;
    let playable = screen_width * (1.0 - 2.0 * BLOCK_SIDE_OFFSET);
    let total = playable - (columns - 1.0) * BLOCK_SPACING;
    Vec2::new(total / columns, screen_height * BLOCK_HEIGHT_FRACTION)
}

impl BlockGrid {
    /// Lay out a fresh grid; rows and columns are clamped to capacity
    ///
    /// The top row is the toughest: row `r` starts with `rows - r` lives.
    pub fn build(screen_width: f32, screen_height: f32, rows: usize, columns: usize, alternate_palette: bool) -> Self {
        let rows = rows.min(MAX_BLOCK_ROWS);
        let columns = columns.min(MAX_BLOCK_COLUMNS);
        let size = block_dimensions(screen_width, screen_height, columns);
        let start = Vec2::new(screen_width * BLOCK_SIDE_OFFSET, screen_height * BLOCK_TOP_OFFSET);

        let mut grid = Self {
            rows,
            columns,
            ..Self::default()
        };

        for row in 0..rows {
            let lives = ((rows - row) as i32).clamp(1, BLOCK_MAX_LIVES);
            for col in 0..columns {
                let x = start.x + col as f32 * (size.x + BLOCK_SPACING);
                let y = start.y + row as f32 * (size.y + BLOCK_SPACING);
                grid.cells[row][col] = Block::new(Aabb::new(x, y, size.x, size.y), lives, alternate_palette);
            }
        }

        log::debug!("Built {}x{} block grid ({:.1}x{:.1} px blocks)", rows, columns, size.x, size.y);
        grid
    }

    /// Live blocks in row-major order
    pub fn iter_live(&self) -> impl Iterator<Item = &Block> + '_ {
        self.cells[..self.rows]
            .iter()
            .flat_map(move |row| row[..self.columns].iter())
    }

    /// Test the ball against every live block, stopping at the first hit
    pub fn resolve_ball<R: Rng>(&mut self, ball: &mut Ball, alternate_palette: bool, rng: &mut R) -> Option<GridHit> {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let block = &mut self.cells[row][column];
                if block.check_collision(ball, alternate_palette, rng) {
                    return Some(GridHit {
                        row,
                        column,
                        center: block.center(),
                        destroyed: !block.active,
                    });
                }
            }
        }
        None
    }

    /// Win condition over the grid's own live area
    pub fn all_destroyed(&self) -> bool {
        all_destroyed(self, self.rows, self.columns)
    }

    /// Re-derive every block colour (after a palette switch)
    pub fn recolor(&mut self, alternate_palette: bool) {
        for row in self.cells.iter_mut() {
            for block in row.iter_mut().filter(|b| b.active) {
                block.color = palette::block_color(block.lives, alternate_palette);
            }
        }
    }
}

/// True iff every block inside the clamped `rows x columns` area is inactive
pub fn all_destroyed(grid: &BlockGrid, rows: usize, columns: usize) -> bool {
    let rows = rows.min(MAX_BLOCK_ROWS);
    let columns = columns.min(MAX_BLOCK_COLUMNS);
    grid.cells[..rows]
        .iter()
        .all(|row| row[..columns].iter().all(|b| !b.active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball_at(pos: Vec2, dir: Vec2) -> Ball {
        let mut ball = Ball::new(pos, BALL_SPEED_MIN, BALL_SPEED_MAX);
        ball.dir = dir.normalize();
        ball.active = true;
        ball
    }

    fn block(lives: i32) -> Block {
        Block::new(Aabb::new(100.0, 100.0, 100.0, 40.0), lives, false)
    }

    #[test]
    fn test_single_life_block_breaks() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut b = block(1);
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.3, -1.0));
        assert!(b.check_collision(&mut ball, false, &mut rng));
        assert!(!b.active);
    }

    #[test]
    fn test_three_life_block_recolors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut b = block(3);
        let before = b.color;
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.3, -1.0));
        assert!(b.check_collision(&mut ball, false, &mut rng));
        assert!(b.active);
        assert_eq!(b.lives, 2);
        assert_ne!(b.color, before);
        assert_eq!(b.color, palette::block_color(2, false));
    }

    #[test]
    fn test_bottom_hit_reflects_up_to_down() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut b = block(3);
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.3, -1.0));
        let speed = ball.speed;
        b.check_collision(&mut ball, false, &mut rng);
        assert!(ball.dir.y > 0.0);
        assert!((ball.dir.length() - 1.0).abs() < 1e-5);
        assert!(ball.speed > speed);
        assert!(ball.speed <= ball.current_max_speed);
    }

    #[test]
    fn test_side_hit_reflects_horizontally() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = block(3);
        let mut ball = ball_at(Vec2::new(95.0, 120.0), Vec2::new(1.0, -0.5));
        b.check_collision(&mut ball, false, &mut rng);
        assert!(ball.dir.x < 0.0);
        assert!(ball.dir.y.abs() >= 0.3 - 1e-5);
    }

    #[test]
    fn test_damage_multiplier() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut b = block(3);
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.0, -1.0));
        ball.damage_multiplier = 2;
        b.check_collision(&mut ball, false, &mut rng);
        assert_eq!(b.lives, 1);

        let mut b = block(2);
        ball.pos = Vec2::new(150.0, 145.0);
        ball.dir = Vec2::new(0.0, -1.0);
        b.check_collision(&mut ball, false, &mut rng);
        assert!(!b.active);
    }

    #[test]
    fn test_ghost_passes_through() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut b = block(3);
        let mut ball = ball_at(Vec2::new(150.0, 120.0), Vec2::new(0.3, -1.0));
        ball.is_ghost = true;
        ball.damage_multiplier = 2;
        let dir = ball.dir;
        let speed = ball.speed;

        assert!(b.check_collision(&mut ball, false, &mut rng));
        assert_eq!(b.lives, 2);
        assert_eq!(ball.dir, dir);
        assert_eq!(ball.speed, speed);
    }

    proptest! {
        #[test]
        fn prop_ghost_keeps_course_at_any_depth(
            x in 90.5f32..209.5,
            y in 90.5f32..149.5,
            angle in -std::f32::consts::PI..std::f32::consts::PI,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut b = block(3);
            let mut ball = ball_at(Vec2::new(x, y), Vec2::new(angle.cos(), angle.sin()));
            ball.is_ghost = true;
            let dir = ball.dir;
            let speed = ball.speed;

            prop_assert!(b.check_collision(&mut ball, false, &mut rng));
            prop_assert_eq!(b.lives, 2);
            prop_assert_eq!(ball.dir, dir);
            prop_assert_eq!(ball.speed, speed);
        }
    }

    #[test]
    fn test_leaving_ball_is_not_hit_again() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut b = block(3);
        // Still within reach of the bottom face but already heading down
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.3, 1.0));
        let dir = ball.dir;
        assert!(!b.check_collision(&mut ball, false, &mut rng));
        assert_eq!(b.lives, 3);
        assert_eq!(ball.dir, dir);
    }

    #[test]
    fn test_no_double_hit_on_next_frame() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut b = block(3);
        let mut ball = ball_at(Vec2::new(150.0, 145.0), Vec2::new(0.0, -1.0));
        assert!(b.check_collision(&mut ball, false, &mut rng));
        assert!(ball.dir.y > 0.0);

        // One short frame later the ball is still in the contact zone
        ball.pos += ball.dir * ball.speed * 0.001;
        assert!(!b.check_collision(&mut ball, false, &mut rng));
        assert_eq!(b.lives, 2);
        assert!(ball.dir.y > 0.0);
    }

    #[test]
    fn test_inactive_block_ignored() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut b = block(1);
        b.active = false;
        let mut ball = ball_at(Vec2::new(150.0, 120.0), Vec2::new(0.0, -1.0));
        assert!(!b.check_collision(&mut ball, false, &mut rng));
    }

    #[test]
    fn test_build_layout() {
        let grid = BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 3, 8, false);
        assert_eq!(grid.iter_live().count(), 24);
        assert_eq!(grid.cells[0][0].lives, 3);
        assert_eq!(grid.cells[2][7].lives, 1);
        assert!((grid.cells[0][0].rect.pos.x - SCREEN_WIDTH * BLOCK_SIDE_OFFSET).abs() < 1e-3);
        // Last column ends at the right margin
        let right = grid.cells[0][7].rect.max().x;
        assert!((right - SCREEN_WIDTH * (1.0 - BLOCK_SIDE_OFFSET)).abs() < 1e-2);
        // Cells outside the live area stay inactive
        assert!(!grid.cells[3][0].active);
        assert!(!grid.cells[0][8].active);
    }

    #[test]
    fn test_build_clamps_to_capacity() {
        let grid = BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 100, 100, false);
        assert_eq!(grid.rows, MAX_BLOCK_ROWS);
        assert_eq!(grid.columns, MAX_BLOCK_COLUMNS);
        assert_eq!(grid.cells[0][0].lives, BLOCK_MAX_LIVES);
    }

    #[test]
    fn test_all_destroyed_only_counts_live_area() {
        let mut grid = BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 3, 8, false);
        assert!(!grid.all_destroyed());

        for row in 0..3 {
            for col in 0..8 {
                grid.cells[row][col].active = false;
            }
        }
        // A stray active block outside the live area does not count
        grid.cells[5][11] = block(2);
        assert!(grid.all_destroyed());
        assert!(all_destroyed(&grid, 3, 8));
        assert!(!all_destroyed(&grid, MAX_BLOCK_ROWS, MAX_BLOCK_COLUMNS));
        // Oversized bounds are clamped rather than indexing out of range
        assert!(!all_destroyed(&grid, 99, 99));
    }

    #[test]
    fn test_resolve_ball_credits_one_block() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut grid = BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 3, 8, false);
        // Sit the ball on the seam between two neighbouring blocks
        let a = grid.cells[2][0].rect;
        let seam = Vec2::new(a.max().x + BLOCK_SPACING / 2.0, a.max().y + 2.0);
        let mut ball = ball_at(seam, Vec2::new(0.0, -1.0));

        let hit = grid.resolve_ball(&mut ball, false, &mut rng).unwrap();
        assert_eq!((hit.row, hit.column), (2, 0));
        assert!(hit.destroyed);
        let destroyed = grid.iter_live().filter(|b| !b.active).count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_recolor_switches_palette() {
        let mut grid = BlockGrid::build(SCREEN_WIDTH, SCREEN_HEIGHT, 3, 8, false);
        grid.recolor(true);
        assert_eq!(grid.cells[0][0].color, palette::block_color(3, true));
        grid.recolor(false);
        assert_eq!(grid.cells[0][0].color, palette::block_color(3, false));
    }
}
