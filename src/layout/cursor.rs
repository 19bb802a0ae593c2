use crate::config::PageGeometry;

use super::canvas::Canvas;

/// Vertical position of the next baseline on the active page.
///
/// Every draw goes through [`Cursor::line`], which pages first when the
/// baseline has fallen below the bottom margin, so nothing is ever drawn
/// into the margin.
#[derive(Clone, Debug)]
pub struct Cursor {
    y: f32,
    top: f32,
    bottom: f32,
    page: usize,
}

impl Cursor {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            y: geometry.top_y(),
            top: geometry.top_y(),
            bottom: geometry.margin_bottom,
            page: 0,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Space left above the bottom margin. Negative once the cursor has passed it.
    pub fn remaining(&self) -> f32 {
        self.y - self.bottom
    }

    pub fn at_page_top(&self) -> bool {
        (self.y - self.top).abs() < 1.0
    }

    /// Move down one line; page immediately if that crosses the bottom margin.
    pub fn advance(&mut self, line_height: f32, canvas: &mut Canvas) {
        self.y -= line_height;
        if self.y < self.bottom {
            self.page_break(canvas);
        }
    }

    /// Move down by a gap without paging. The next [`Cursor::line`] pages if needed.
    pub fn skip(&mut self, gap: f32) {
        self.y -= gap;
    }

    /// Page now unless at least `min_space` remains. A fresh page is never
    /// broken again, even if `min_space` exceeds the page.
    pub fn ensure_room(&mut self, min_space: f32, canvas: &mut Canvas) {
        if self.y - min_space < self.bottom && !self.at_page_top() {
            self.page_break(canvas);
        }
    }

    /// Baseline to draw the next line at.
    pub fn line(&mut self, canvas: &mut Canvas) -> f32 {
        if self.y < self.bottom {
            self.page_break(canvas);
        }
        self.y
    }

    pub fn page_break(&mut self, canvas: &mut Canvas) {
        log::debug!("page break after page {} at y={:.1}", self.page + 1, self.y);
        canvas.show_page();
        self.y = self.top;
        self.page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontSpec;

    fn setup() -> (Cursor, Canvas) {
        let g = PageGeometry::default();
        (Cursor::new(&g), Canvas::new(g))
    }

    #[test]
    fn starts_at_top_margin() {
        let (c, _) = setup();
        let g = PageGeometry::default();
        assert_eq!(c.y(), g.height - g.margin_top);
        assert!(c.at_page_top());
        assert_eq!(c.page_index(), 0);
    }

    #[test]
    fn advance_pages_when_crossing_bottom_margin() {
        let (mut c, mut canvas) = setup();
        let usable = c.remaining();
        let steps = (usable / 14.0).floor() as usize;
        for _ in 0..steps {
            c.advance(14.0, &mut canvas);
        }
        assert_eq!(c.page_index(), 0);
        c.advance(14.0, &mut canvas);
        assert_eq!(c.page_index(), 1);
        assert!(c.at_page_top());
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn skip_defers_the_break_to_the_next_line() {
        let (mut c, mut canvas) = setup();
        c.skip(c.remaining() + 5.0);
        assert_eq!(c.page_index(), 0);
        let y = c.line(&mut canvas);
        assert_eq!(c.page_index(), 1);
        assert!(y >= PageGeometry::default().margin_bottom);
    }

    #[test]
    fn ensure_room_breaks_only_when_short() {
        let (mut c, mut canvas) = setup();
        canvas.draw_text(60.0, c.y(), FontSpec::regular(10.0), "x");
        c.skip(100.0);
        c.ensure_room(50.0, &mut canvas);
        assert_eq!(c.page_index(), 0);
        c.ensure_room(c.remaining() + 1.0, &mut canvas);
        assert_eq!(c.page_index(), 1);
        // already at the top: no second, empty page
        c.ensure_room(10_000.0, &mut canvas);
        assert_eq!(c.page_index(), 1);
    }
}
