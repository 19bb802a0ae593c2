use crate::asset::RasterImage;
use crate::config::PageGeometry;
use crate::model::FontSpec;

/// Axis-aligned rectangle in PDF user space (origin bottom-left, `y` is the bottom edge).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Text with its baseline starting at (`x`, `y`).
    Text {
        x: f32,
        y: f32,
        font: FontSpec,
        text: String,
    },
    FillRect {
        rect: Rect,
        color: [u8; 3],
    },
    StrokeRect {
        rect: Rect,
        line_width: f32,
        color: [u8; 3],
    },
    /// Index into [`DisplayList::images`].
    Image {
        index: usize,
        rect: Rect,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Records draw commands page by page. Nothing is encoded until the finished
/// [`DisplayList`] is handed to the PDF writer.
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    images: Vec<RasterImage>,
}

impl Canvas {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page::default(),
            images: Vec::new(),
        }
    }

    /// Blank strings are not recorded.
    pub fn draw_text(&mut self, x: f32, y: f32, font: FontSpec, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.current.commands.push(DrawCommand::Text { x, y, font, text });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 3]) {
        self.current.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: [u8; 3]) {
        self.current.commands.push(DrawCommand::StrokeRect {
            rect,
            line_width,
            color,
        });
    }

    pub fn draw_image(&mut self, image: RasterImage, rect: Rect) {
        let index = self.images.len();
        self.images.push(image);
        self.current.commands.push(DrawCommand::Image { index, rect });
    }

    /// Close the current page and start a new one.
    pub fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    /// Pages so far, counting the open one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Close the open page. A trailing page that received no drawing is dropped,
    /// unless it is the only page.
    pub fn finish(mut self) -> DisplayList {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        DisplayList {
            geometry: self.geometry,
            pages: self.pages,
            images: self.images,
        }
    }
}

/// The finished, paginated drawing of one document.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub images: Vec<RasterImage>,
}

impl DisplayList {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of every page, one entry per drawn text run.
    pub fn page_texts(&self) -> Vec<Vec<String>> {
        self.pages
            .iter()
            .map(|p| p.texts().map(str::to_string).collect())
            .collect()
    }

    pub fn commands(&self) -> impl Iterator<Item = (usize, &DrawCommand)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.commands.iter().map(move |c| (i, c)))
    }
}
