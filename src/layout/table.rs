use std::ops::Range;

use crate::fonts::FontSet;
use crate::model::FontSpec;

use super::canvas::Rect;
use super::cursor::Cursor;
use super::wrap::wrap;
use super::Pen;

const HEADER_FONT: FontSpec = FontSpec::bold(10.0);
const BODY_FONT: FontSpec = FontSpec::regular(9.0);
const HEADER_FILL: [u8; 3] = [0xF2, 0xF2, 0xF2];
const GRID_COLOR: [u8; 3] = [0xBB, 0xBB, 0xBB];
const GRID_WIDTH: f32 = 0.25;
const CELL_PADDING: f32 = 6.0;
const LEADING: f32 = 1.2;

/// Two-column table whose first row is a styled header.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValueTable {
    pub header: [String; 2],
    pub rows: Vec<[String; 2]>,
}

impl KeyValueTable {
    fn all_rows(&self) -> impl Iterator<Item = (&[String; 2], FontSpec)> {
        std::iter::once((&self.header, HEADER_FONT)).chain(self.rows.iter().map(|r| (r, BODY_FONT)))
    }
}

/// Start from equal halves and widen a column whose longest unbreakable word
/// would not fit, taking the space from the other column. Total width is preserved.
fn auto_fit_columns(table: &KeyValueTable, total: f32, fonts: &FontSet) -> [f32; 2] {
    let mut min_widths = [0.0f32; 2];
    for (row, font) in table.all_rows() {
        for (col, text) in row.iter().enumerate() {
            for word in text.split_whitespace() {
                let ww = fonts.text_width(font, word) + 2.0 * CELL_PADDING;
                min_widths[col] = min_widths[col].max(ww);
            }
        }
    }

    let half = total / 2.0;
    let mut widths = [half, half];
    for col in 0..2 {
        let other = 1 - col;
        if min_widths[col] > widths[col] {
            let spare = (widths[other] - min_widths[other]).max(0.0);
            let grow = (min_widths[col] - widths[col]).min(spare);
            widths[col] += grow;
            widths[other] -= grow;
        }
    }
    widths
}

struct RowLayout {
    height: f32,
    font: FontSpec,
    cell_lines: [Vec<String>; 2],
}

impl RowLayout {
    fn line_height(&self) -> f32 {
        self.font.size * LEADING
    }

    /// Lines in the taller cell; an empty row still takes one.
    fn line_count(&self) -> usize {
        self.cell_lines.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }
}

/// Empty cells stay empty rather than showing the placeholder dash.
fn wrap_cell(text: &str, font: FontSpec, width: f32, fonts: &FontSet) -> Vec<String> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        wrap(text, font, width, fonts)
    }
}

fn compute_row_layouts(table: &KeyValueTable, col_widths: [f32; 2], fonts: &FontSet) -> Vec<RowLayout> {
    table
        .all_rows()
        .map(|(row, font)| {
            let cell_lines = [0, 1].map(|col| {
                let text_w = (col_widths[col] - 2.0 * CELL_PADDING).max(1.0);
                wrap_cell(&row[col], font, text_w, fonts)
            });
            let mut layout = RowLayout {
                height: 0.0,
                font,
                cell_lines,
            };
            layout.height = layout.line_count() as f32 * layout.line_height() + 2.0 * CELL_PADDING;
            layout
        })
        .collect()
}

/// Rendered height of `table` at the page's content width.
pub fn table_height(table: &KeyValueTable, content_width: f32, fonts: &FontSet) -> f32 {
    let widths = auto_fit_columns(table, content_width, fonts);
    compute_row_layouts(table, widths, fonts)
        .iter()
        .map(|r| r.height)
        .sum()
}

/// Lines of `line_h` that fit in `space` once the cell padding is taken off.
fn lines_fitting(space: f32, line_h: f32) -> usize {
    ((space - 2.0 * CELL_PADDING) / line_h).floor().max(0.0) as usize
}

/// Draw lines `part` of a row with its top edge at the cursor, closing the
/// part with its own grid cells.
fn draw_row_part(
    pen: &mut Pen,
    cursor: &mut Cursor,
    col_widths: [f32; 2],
    layout: &RowLayout,
    part: Range<usize>,
    filled: bool,
) {
    let g = *pen.geometry();
    let line_h = layout.line_height();
    let row_h = part.len() as f32 * line_h + 2.0 * CELL_PADDING;
    let row_top = cursor.y();
    let row_bottom = row_top - row_h;

    if filled {
        pen.canvas.fill_rect(
            Rect::new(g.margin_left, row_bottom, col_widths[0] + col_widths[1], row_h),
            HEADER_FILL,
        );
    }

    let ascender = pen.fonts.ascender_ratio(layout.font.style);
    let mut cell_x = g.margin_left;
    for (col, lines) in layout.cell_lines.iter().enumerate() {
        let mut baseline = row_top - CELL_PADDING - layout.font.size * ascender;
        for line in lines.iter().take(part.end).skip(part.start) {
            pen.canvas.draw_text(cell_x + CELL_PADDING, baseline, layout.font, line.clone());
            baseline -= line_h;
        }
        pen.canvas.stroke_rect(
            Rect::new(cell_x, row_bottom, col_widths[col], row_h),
            GRID_WIDTH,
            GRID_COLOR,
        );
        cell_x += col_widths[col];
    }

    cursor.skip(row_h);
}

/// Draw the table with its top edge at the cursor.
///
/// The table moves to a new page as a whole when it doesn't fit in the space
/// left. Only a table taller than an entire page is split, between rows, and a
/// row taller than the space left continues on the next page.
pub fn draw_table(pen: &mut Pen, cursor: &mut Cursor, table: &KeyValueTable, space_after: f32) {
    let g = *pen.geometry();
    let col_widths = auto_fit_columns(table, g.content_width(), pen.fonts);
    let layouts = compute_row_layouts(table, col_widths, pen.fonts);
    let total: f32 = layouts.iter().map(|r| r.height).sum();
    let fits_one_page = total <= g.content_height();

    if fits_one_page && cursor.remaining() < total && !cursor.at_page_top() {
        cursor.page_break(&mut pen.canvas);
    }
    log::debug!(
        "TABLE rows={} height={:.2} page={} top={:.2}",
        layouts.len(),
        total,
        cursor.page_index() + 1,
        cursor.y()
    );

    for (ri, layout) in layouts.iter().enumerate() {
        let line_h = layout.line_height();
        let lines = layout.line_count();
        if !fits_one_page
            && cursor.remaining() < layout.height
            && !cursor.at_page_top()
            && (layout.height <= g.content_height() || lines_fitting(cursor.remaining(), line_h) == 0)
        {
            cursor.page_break(&mut pen.canvas);
        }

        let mut start = 0;
        loop {
            let rest_h = (lines - start) as f32 * line_h + 2.0 * CELL_PADDING;
            let end = if fits_one_page || rest_h <= cursor.remaining() {
                lines
            } else {
                (start + lines_fitting(cursor.remaining(), line_h).max(1)).min(lines)
            };
            draw_row_part(pen, cursor, col_widths, layout, start..end, ri == 0);
            if end >= lines {
                break;
            }
            log::debug!("TABLE row {ri} continues after line {end}");
            start = end;
            cursor.page_break(&mut pen.canvas);
        }
    }
    cursor.skip(space_after);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::DrawCommand;

    fn table(rows: usize) -> KeyValueTable {
        KeyValueTable {
            header: ["Campo".into(), "Valor".into()],
            rows: (0..rows).map(|i| [format!("Campo {i}:"), format!("valor {i}")]).collect(),
        }
    }

    #[test]
    fn single_line_rows_have_uniform_height() {
        let fonts = FontSet::builtin();
        let h = table_height(&table(11), 480.0, &fonts);
        let expected = (10.0 * LEADING + 12.0) + 11.0 * (9.0 * LEADING + 12.0);
        assert!((h - expected).abs() < 1e-3, "{h} vs {expected}");
    }

    #[test]
    fn wrapped_cell_grows_its_row() {
        let fonts = FontSet::builtin();
        let mut t = table(1);
        let base = table_height(&t, 480.0, &fonts);
        t.rows[0][1] = "palabra ".repeat(60);
        assert!(table_height(&t, 480.0, &fonts) > base + 9.0);
    }

    #[test]
    fn long_word_widens_its_column() {
        let fonts = FontSet::builtin();
        let mut t = table(1);
        t.rows[0][1] = "https://intranet.example.com/riesgos/expedientes/2024/000123".into();
        let w = auto_fit_columns(&t, 480.0, &fonts);
        assert!(w[1] > 240.0);
        assert!((w[0] + w[1] - 480.0).abs() < 1e-3);
    }

    #[test]
    fn table_moves_to_next_page_as_a_unit() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        pen.canvas.draw_text(60.0, cursor.y(), FontSpec::regular(9.0), "arriba");
        cursor.skip(cursor.remaining() - 50.0);
        draw_table(&mut pen, &mut cursor, &table(11), 24.0);
        let list = pen.finish();
        assert_eq!(list.page_count(), 2);
        assert_eq!(list.page_texts()[1].len(), 24);
        assert!(list.pages[1]
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::FillRect { .. })));
    }

    #[test]
    fn oversized_table_splits_between_rows() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        draw_table(&mut pen, &mut cursor, &table(80), 24.0);
        let list = pen.finish();
        assert!(list.page_count() >= 2);
        for (_, cmd) in list.commands() {
            if let DrawCommand::StrokeRect { rect, .. } = cmd {
                assert!(rect.y >= config.page.margin_bottom - 1e-3);
                assert!(rect.top() <= config.page.top_y() + 1e-3);
            }
        }
    }

    #[test]
    fn row_taller_than_a_page_continues_on_the_next() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        let mut t = table(2);
        t.rows[0][1] = "hipoteca ".repeat(2_000);
        draw_table(&mut pen, &mut cursor, &t, 24.0);
        let list = pen.finish();
        assert!(list.page_count() >= 3);

        let g = config.page;
        let mut words = 0;
        for (_, cmd) in list.commands() {
            match cmd {
                DrawCommand::Text { y, text, .. } => {
                    assert!(*y >= g.margin_bottom, "{text:?} at y={y}");
                    words += text.split_whitespace().filter(|w| *w == "hipoteca").count();
                }
                DrawCommand::StrokeRect { rect, .. } => {
                    assert!(rect.y >= g.margin_bottom - 1e-3);
                    assert!(rect.top() <= g.top_y() + 1e-3);
                }
                _ => {}
            }
        }
        assert_eq!(words, 2_000);
        let last = list.page_texts().concat();
        assert_eq!(last.last().map(String::as_str), Some("valor 1"));
    }
}
