//! Page layout: text wrapping, vertical flow and block renderers that record
//! draw commands onto a paginated [`Canvas`].

mod blocks;
mod canvas;
mod cursor;
mod table;
mod wrap;

pub use blocks::{ParagraphStyle, evaluation_line, flow_lines, heading, heading_right, paragraph};
pub use canvas::{Canvas, DisplayList, DrawCommand, Page, Rect};
pub use cursor::Cursor;
pub use table::{KeyValueTable, draw_table, table_height};
pub use wrap::{PLACEHOLDER, wrap};

use crate::config::{LayoutConfig, PageGeometry};
use crate::fonts::FontSet;

/// Everything a block renderer draws with, except the cursor, which callers
/// pass separately so its position is always explicit.
pub struct Pen<'a> {
    pub canvas: Canvas,
    pub fonts: &'a FontSet,
    pub config: &'a LayoutConfig,
}

impl<'a> Pen<'a> {
    pub fn new(fonts: &'a FontSet, config: &'a LayoutConfig) -> Self {
        Self {
            canvas: Canvas::new(config.page),
            fonts,
            config,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.config.page
    }

    pub fn finish(self) -> DisplayList {
        self.canvas.finish()
    }
}
