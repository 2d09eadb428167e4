use engine::{PixelSurface, Renderer};
use tracing::warn;

use super::field::{BlockField, BlockKind, Cell, FIELD_HEIGHT, FIELD_WIDTH};

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const FLOOR_COLOR: [u8; 4] = [46, 52, 40, 255];
const GRASS_COLOR: [u8; 4] = [74, 112, 56, 255];
const STONE_COLOR: [u8; 4] = [110, 112, 118, 255];
const WOOD_COLOR: [u8; 4] = [112, 83, 58, 255];
const GLASS_COLOR: [u8; 4] = [170, 210, 230, 255];
const PLAYER_COLOR: [u8; 4] = [220, 220, 240, 255];
const SHADOW_COLOR: [u8; 4] = [12, 14, 16, 255];
const TARGET_COLOR: [u8; 4] = [255, 210, 70, 255];
const PLAYER_HALF_SIZE_CELLS: f32 = 0.35;
const SWATCH_MARGIN_PX: i32 = 4;

pub(crate) struct FieldRenderer {
    surface: PixelSurface,
}

impl FieldRenderer {
    pub(crate) fn new(surface: PixelSurface) -> Self {
        Self { surface }
    }
}

impl Renderer<BlockField> for FieldRenderer {
    fn render(&mut self, field: &BlockField) {
        if let Err(error) = self.surface.sync_size() {
            warn!(error = %error, "renderer_resize_failed");
            return;
        }
        let (width, height) = self.surface.size();
        draw_field(self.surface.frame_mut(), width, height, field);
        if let Err(error) = self.surface.present() {
            warn!(error = %error, "renderer_draw_failed");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldLayout {
    cell_px: i32,
    origin_x: i32,
    origin_y: i32,
}

impl FieldLayout {
    /// Largest whole-pixel cell size that fits, centered in the frame.
    fn fit(width: u32, height: u32) -> Self {
        let cell_px = (width / FIELD_WIDTH as u32)
            .min(height / FIELD_HEIGHT as u32)
            .max(1) as i32;
        let field_width_px = cell_px * FIELD_WIDTH as i32;
        let field_height_px = cell_px * FIELD_HEIGHT as i32;
        Self {
            cell_px,
            origin_x: (width as i32 - field_width_px).max(0) / 2,
            origin_y: (height as i32 - field_height_px).max(0) / 2,
        }
    }

    fn cell_left_top(&self, cell: Cell) -> (i32, i32) {
        (
            self.origin_x + cell.x as i32 * self.cell_px,
            self.origin_y + cell.y as i32 * self.cell_px,
        )
    }

    fn to_px(&self, x_cells: f32, y_cells: f32) -> (i32, i32) {
        (
            self.origin_x + (x_cells * self.cell_px as f32).round() as i32,
            self.origin_y + (y_cells * self.cell_px as f32).round() as i32,
        )
    }
}

pub(crate) fn draw_field(frame: &mut [u8], width: u32, height: u32, field: &BlockField) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&CLEAR_COLOR);
    }

    let layout = FieldLayout::fit(width, height);
    let canvas = Canvas { width, height };

    for y in 0..FIELD_HEIGHT {
        for x in 0..FIELD_WIDTH {
            let cell = Cell { x, y };
            let color = field.block_at(cell).map_or(FLOOR_COLOR, block_color);
            let (left, top) = layout.cell_left_top(cell);
            canvas.fill_rect(frame, left, top, layout.cell_px, layout.cell_px, color);
        }
    }

    if let Some(target) = field.target_cell() {
        let (left, top) = layout.cell_left_top(target);
        canvas.outline_rect(frame, left, top, layout.cell_px, layout.cell_px, TARGET_COLOR);
    }

    let player = field.player();
    let half_px = ((PLAYER_HALF_SIZE_CELLS * layout.cell_px as f32).round() as i32).max(1);
    let (center_x, center_y) = layout.to_px(player.x, player.y);
    canvas.fill_rect(
        frame,
        center_x - half_px,
        center_y - half_px,
        half_px * 2,
        half_px * 2,
        SHADOW_COLOR,
    );
    let lift_px = (field.hop_height() * layout.cell_px as f32).round() as i32;
    canvas.fill_rect(
        frame,
        center_x - half_px,
        center_y - half_px - lift_px,
        half_px * 2,
        half_px * 2,
        PLAYER_COLOR,
    );

    canvas.fill_rect(
        frame,
        SWATCH_MARGIN_PX,
        SWATCH_MARGIN_PX,
        layout.cell_px,
        layout.cell_px,
        block_color(field.selected_kind()),
    );
}

fn block_color(kind: BlockKind) -> [u8; 4] {
    match kind {
        BlockKind::Grass => GRASS_COLOR,
        BlockKind::Stone => STONE_COLOR,
        BlockKind::Wood => WOOD_COLOR,
        BlockKind::Glass => GLASS_COLOR,
    }
}

#[derive(Debug, Clone, Copy)]
struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    fn fill_rect(&self, frame: &mut [u8], left: i32, top: i32, w: i32, h: i32, color: [u8; 4]) {
        let x_start = left.max(0);
        let y_start = top.max(0);
        let x_end = (left + w).min(self.width as i32);
        let y_end = (top + h).min(self.height as i32);
        for y in y_start..y_end {
            for x in x_start..x_end {
                let offset = (y as usize * self.width as usize + x as usize) * 4;
                if let Some(pixel) = frame.get_mut(offset..offset + 4) {
                    pixel.copy_from_slice(&color);
                }
            }
        }
    }

    fn outline_rect(&self, frame: &mut [u8], left: i32, top: i32, w: i32, h: i32, color: [u8; 4]) {
        self.fill_rect(frame, left, top, w, 1, color);
        self.fill_rect(frame, left, top + h - 1, w, 1, color);
        self.fill_rect(frame, left, top, 1, h, color);
        self.fill_rect(frame, left + w - 1, top, 1, h, color);
    }
}
