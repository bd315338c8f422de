use bytemuck::{Pod, Zeroable};
use shared::input::Rect;
use shared::session::Session;

const FONT_WIDTH: usize = 5;
const FONT_HEIGHT: usize = 7;
const TEXT_SCALE_BUTTON: f32 = 3.0;
const BUTTON_LABEL: &str = "Play";
const BUTTON_BORDER: f32 = 2.0;
const GRID_LINE: f32 = 1.0;

/// Palette in sRGB bytes, converted to linear when pushed to the GPU.
pub const BACKGROUND: [u8; 3] = [30, 30, 30];
const LIVE_CELL: [u8; 3] = [180, 180, 180];
const DEAD_CELL: [u8; 3] = BACKGROUND;
const GRID_LINES: [u8; 3] = [50, 50, 50];
const BUTTON_ACTIVE: [u8; 3] = [0, 255, 0];
const BUTTON_IDLE: [u8; 3] = BACKGROUND;
const BUTTON_OUTLINE: [u8; 3] = LIVE_CELL;
const BUTTON_TEXT: [u8; 3] = [0, 0, 0];

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CellInstance {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub color: [f32; 3],
    pub _pad: f32,
}

/// Reusable per-frame geometry. The first grid instance is the grid-line
/// backdrop; every visible cell is drawn on top of it, inset by one pixel.
pub struct FrameBuilder {
    instances: Vec<CellInstance>,
    ui_vertices: Vec<Vertex>,
}

impl FrameBuilder {
    pub fn with_capacity(cells: usize) -> Self {
        Self {
            instances: Vec::with_capacity(cells + 1),
            ui_vertices: Vec::with_capacity(2048),
        }
    }

    pub fn build(&mut self, session: &Session) -> (&[CellInstance], &[Vertex]) {
        self.instances.clear();
        self.ui_vertices.clear();

        let layout = session.layout();
        let grid = session.grid();
        let [width, height] = layout.window_size();
        let window = [width.max(1.0), height.max(1.0)];
        let cell_size = layout.cell_size();

        // Cells past the window edge are clipped, not scaled.
        let visible_rows = ((window[1] / cell_size).ceil() as usize).min(grid.rows());
        let visible_cols = ((window[0] / cell_size).ceil() as usize).min(grid.cols());

        let backdrop = Rect::from_origin_size([0.0, 0.0], [grid.cols() as f32 * cell_size, grid.rows() as f32 * cell_size]);
        self.instances.push(cell_instance(backdrop, srgb(GRID_LINES), window));

        for (row, col, cell) in grid.iter() {
            if row >= visible_rows || col >= visible_cols {
                continue;
            }
            let color = if cell.is_alive() { LIVE_CELL } else { DEAD_CELL };
            let rect = layout.cell_rect(row, col).inset(GRID_LINE);
            self.instances.push(cell_instance(rect, srgb(color), window));
        }

        let button = layout.button_rect();
        let fill = if session.is_playing() { BUTTON_ACTIVE } else { BUTTON_IDLE };
        push_rect(&mut self.ui_vertices, button, srgb(BUTTON_OUTLINE), window);
        push_rect(&mut self.ui_vertices, button.inset(BUTTON_BORDER), srgb(fill), window);

        let text_width = text_pixel_width(BUTTON_LABEL) * TEXT_SCALE_BUTTON;
        let text_height = FONT_HEIGHT as f32 * TEXT_SCALE_BUTTON;
        let [center_x, center_y] = button.center();
        draw_text(
            &mut self.ui_vertices,
            BUTTON_LABEL,
            [(center_x - text_width * 0.5).round(), (center_y - text_height * 0.5).round()],
            TEXT_SCALE_BUTTON,
            srgb(BUTTON_TEXT),
            window,
        );

        (&self.instances, &self.ui_vertices)
    }
}

/// sRGB byte color to the linear float color the sRGB surface expects.
pub fn srgb(color: [u8; 3]) -> [f32; 3] {
    color.map(|channel| {
        let c = channel as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

fn cell_instance(rect: Rect, color: [f32; 3], window_size: [f32; 2]) -> CellInstance {
    let [width, height] = window_size;
    CellInstance {
        min: [to_ndc(rect.min[0], width), to_ndc_y(rect.min[1], height)],
        max: [to_ndc(rect.max[0], width), to_ndc_y(rect.max[1], height)],
        color,
        _pad: 0.0,
    }
}

fn push_rect(vertices: &mut Vec<Vertex>, rect: Rect, color: [f32; 3], window_size: [f32; 2]) {
    let [width, height] = window_size;
    let x0 = to_ndc(rect.min[0], width);
    let y0 = to_ndc_y(rect.min[1], height);
    let x1 = to_ndc(rect.max[0], width);
    let y1 = to_ndc_y(rect.max[1], height);

    vertices.push(Vertex { position: [x0, y1], color });
    vertices.push(Vertex { position: [x1, y1], color });
    vertices.push(Vertex { position: [x0, y0], color });
    vertices.push(Vertex { position: [x0, y0], color });
    vertices.push(Vertex { position: [x1, y1], color });
    vertices.push(Vertex { position: [x1, y0], color });
}

fn to_ndc(x: f32, width: f32) -> f32 {
    (x / width) * 2.0 - 1.0
}

fn to_ndc_y(y: f32, height: f32) -> f32 {
    1.0 - (y / height) * 2.0
}

fn text_pixel_width(text: &str) -> f32 {
    let mut units = 0.0;
    for ch in text.to_uppercase().chars() {
        if ch == ' ' || glyph_bits(ch).is_some() {
            units += (FONT_WIDTH as f32) + 1.0;
        }
    }
    (units - 1.0).max(0.0)
}

fn draw_text(vertices: &mut Vec<Vertex>, text: &str, origin: [f32; 2], scale: f32, color: [f32; 3], window_size: [f32; 2]) {
    let mut cursor_x = origin[0];
    for ch in text.to_uppercase().chars() {
        if ch == ' ' {
            cursor_x += (FONT_WIDTH as f32 + 1.0) * scale;
            continue;
        }
        if let Some(rows) = glyph_bits(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..FONT_WIDTH {
                    if (bits >> (FONT_WIDTH - 1 - col)) & 1 == 1 {
                        let rect = Rect {
                            min: [cursor_x + col as f32 * scale, origin[1] + row as f32 * scale],
                            max: [cursor_x + (col as f32 + 1.0) * scale, origin[1] + (row as f32 + 1.0) * scale],
                        };
                        push_rect(vertices, rect, color, window_size);
                    }
                }
            }
        }
        cursor_x += (FONT_WIDTH as f32 + 1.0) * scale;
    }
}

fn glyph_bits(ch: char) -> Option<[u8; FONT_HEIGHT]> {
    match ch {
        'A' => Some([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'L' => Some([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'P' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Y' => Some([0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        _ => None,
    }
}
