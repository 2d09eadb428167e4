use std::f32::consts::PI;

use engine::{FrameInputSnapshot, MovementKeys, Simulation};

pub(crate) const FIELD_WIDTH: usize = 32;
pub(crate) const FIELD_HEIGHT: usize = 24;

const PLAYER_SPEED_CELLS_PER_SECOND: f32 = 6.0;
const HOP_DURATION_MS: f32 = 400.0;
const HOP_HEIGHT_CELLS: f32 = 0.6;
const AIM_CELLS_PER_MOUSE_UNIT: f32 = 0.02;
const AIM_REACH_CELLS: f32 = 4.0;
const WOOD_PILLARS: [(usize, usize); 4] = [(6, 6), (7, 6), (24, 16), (24, 17)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Grass,
    Stone,
    Wood,
    Glass,
}

impl BlockKind {
    pub(crate) const ALL: [BlockKind; 4] = [
        BlockKind::Grass,
        BlockKind::Stone,
        BlockKind::Wood,
        BlockKind::Glass,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) x: usize,
    pub(crate) y: usize,
}

impl Cell {
    fn containing(point: Point) -> Option<Self> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = Cell {
            x: point.x as usize,
            y: point.y as usize,
        };
        (cell.x < FIELD_WIDTH && cell.y < FIELD_HEIGHT).then_some(cell)
    }

    fn index(self) -> usize {
        self.y * FIELD_WIDTH + self.x
    }
}

/// Top-down grid of blocks with a player who walks, hops, aims a reticle and
/// digs or places blocks under it. Units are cells; time is milliseconds.
#[derive(Debug, Clone)]
pub(crate) struct BlockField {
    cells: Vec<Option<BlockKind>>,
    player: Point,
    aim: Point,
    hop_elapsed_ms: Option<f32>,
    selected: usize,
}

impl BlockField {
    pub(crate) fn new() -> Self {
        let mut field = Self {
            cells: vec![None; FIELD_WIDTH * FIELD_HEIGHT],
            player: Point {
                x: FIELD_WIDTH as f32 / 2.0 + 0.5,
                y: FIELD_HEIGHT as f32 / 2.0 + 0.5,
            },
            aim: Point { x: 1.0, y: 0.0 },
            hop_elapsed_ms: None,
            selected: 0,
        };

        for x in 0..FIELD_WIDTH {
            field.set_block(Cell { x, y: 0 }, Some(BlockKind::Stone));
            field.set_block(Cell { x, y: FIELD_HEIGHT - 1 }, Some(BlockKind::Stone));
        }
        for y in 0..FIELD_HEIGHT {
            field.set_block(Cell { x: 0, y }, Some(BlockKind::Stone));
            field.set_block(Cell { x: FIELD_WIDTH - 1, y }, Some(BlockKind::Stone));
        }
        for (x, y) in WOOD_PILLARS {
            field.set_block(Cell { x, y }, Some(BlockKind::Wood));
        }
        field
    }

    pub(crate) fn block_at(&self, cell: Cell) -> Option<BlockKind> {
        self.cells[cell.index()]
    }

    pub(crate) fn set_block(&mut self, cell: Cell, block: Option<BlockKind>) {
        self.cells[cell.index()] = block;
    }

    pub(crate) fn player(&self) -> Point {
        self.player
    }

    pub(crate) fn is_airborne(&self) -> bool {
        self.hop_elapsed_ms.is_some()
    }

    /// Height of the current hop in cells, zero on the ground.
    pub(crate) fn hop_height(&self) -> f32 {
        match self.hop_elapsed_ms {
            Some(elapsed_ms) => HOP_HEIGHT_CELLS * (PI * elapsed_ms / HOP_DURATION_MS).sin(),
            None => 0.0,
        }
    }

    pub(crate) fn target_cell(&self) -> Option<Cell> {
        Cell::containing(Point {
            x: self.player.x + self.aim.x,
            y: self.player.y + self.aim.y,
        })
    }

    pub(crate) fn selected_kind(&self) -> BlockKind {
        BlockKind::ALL[self.selected]
    }

    fn move_player(&mut self, movement: MovementKeys, time_step_ms: f32) {
        let dx = axis(movement.left, movement.right);
        let dy = axis(movement.forward, movement.backward);
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let distance = PLAYER_SPEED_CELLS_PER_SECOND * time_step_ms.max(0.0) / 1000.0;
        let length = (dx * dx + dy * dy).sqrt();
        let step_x = dx / length * distance;
        let step_y = dy / length * distance;

        // Axes resolve separately so the player slides along walls.
        let along_x = Point {
            x: self.player.x + step_x,
            y: self.player.y,
        };
        if self.is_walkable(along_x) {
            self.player = along_x;
        }
        let along_y = Point {
            x: self.player.x,
            y: self.player.y + step_y,
        };
        if self.is_walkable(along_y) {
            self.player = along_y;
        }
    }

    fn is_walkable(&self, point: Point) -> bool {
        Cell::containing(point).is_some_and(|cell| self.block_at(cell).is_none())
    }

    fn advance_hop(&mut self, jump_pressed: bool, time_step_ms: f32) {
        if let Some(elapsed_ms) = self.hop_elapsed_ms {
            let elapsed_ms = elapsed_ms + time_step_ms.max(0.0);
            self.hop_elapsed_ms = (elapsed_ms < HOP_DURATION_MS).then_some(elapsed_ms);
        }
        if jump_pressed && self.hop_elapsed_ms.is_none() {
            self.hop_elapsed_ms = Some(0.0);
        }
    }

    fn move_aim(&mut self, mouse_delta: (i32, i32)) {
        self.aim.x += mouse_delta.0 as f32 * AIM_CELLS_PER_MOUSE_UNIT;
        self.aim.y += mouse_delta.1 as f32 * AIM_CELLS_PER_MOUSE_UNIT;

        let reach = (self.aim.x * self.aim.x + self.aim.y * self.aim.y).sqrt();
        if reach > AIM_REACH_CELLS {
            let scale = AIM_REACH_CELLS / reach;
            self.aim.x *= scale;
            self.aim.y *= scale;
        }
    }

    fn cycle_selection(&mut self, steps: i32) {
        let count = BlockKind::ALL.len() as i32;
        self.selected = (self.selected as i32 + steps).rem_euclid(count) as usize;
    }

    fn edit_target(&mut self, dig: bool, place: bool) {
        let Some(target) = self.target_cell() else {
            return;
        };
        if dig {
            self.set_block(target, None);
        }
        let player_cell = Cell::containing(self.player);
        if place && self.block_at(target).is_none() && player_cell != Some(target) {
            self.set_block(target, Some(self.selected_kind()));
        }
    }
}

impl Simulation for BlockField {
    fn simulate(&mut self, input: &FrameInputSnapshot, time_step_ms: f32) {
        self.move_player(input.movement(), time_step_ms);
        self.advance_hop(input.jump_pressed(), time_step_ms);
        self.move_aim(input.mouse_delta());
        self.cycle_selection(input.scroll_steps());
        self.edit_target(input.left_click_pressed(), input.right_click_pressed());
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}
