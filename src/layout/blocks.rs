use crate::model::{Evaluation, FontSpec, TextBlock};
use crate::schema::EVALUATION_PREFIX;

use super::cursor::Cursor;
use super::wrap::{PLACEHOLDER, wrap};
use super::Pen;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub size: f32,
    pub line_height: f32,
    pub space_after: f32,
}

/// Bold text at the cursor, left margin. The cursor does not move.
pub fn heading(pen: &mut Pen, cursor: &mut Cursor, text: &str, size: f32) {
    let y = cursor.line(&mut pen.canvas);
    let x = pen.geometry().margin_left;
    pen.canvas.draw_text(x, y, FontSpec::bold(size), text);
}

/// Text flush with the right margin. Never starts left of the left margin.
pub fn heading_right(pen: &mut Pen, cursor: &mut Cursor, text: &str, font: FontSpec) {
    let y = cursor.line(&mut pen.canvas);
    let g = pen.geometry();
    let x = (g.right_edge() - pen.fonts.text_width(font, text)).max(g.margin_left);
    pen.canvas.draw_text(x, y, font, text);
}

/// Wrap `text` to the content width and draw it line by line, paging as needed.
pub fn flow_lines(pen: &mut Pen, cursor: &mut Cursor, text: &str, font: FontSpec, line_height: f32) {
    let x = pen.geometry().margin_left;
    let lines = wrap(text, font, pen.geometry().content_width(), pen.fonts);
    for line in lines {
        let y = cursor.line(&mut pen.canvas);
        pen.canvas.draw_text(x, y, font, line);
        cursor.advance(line_height, &mut pen.canvas);
    }
}

/// Bold title line followed by the wrapped body.
pub fn paragraph(pen: &mut Pen, cursor: &mut Cursor, block: &TextBlock, style: ParagraphStyle) {
    heading(pen, cursor, &block.title, style.size);
    cursor.advance(style.line_height, &mut pen.canvas);
    flow_lines(pen, cursor, &block.body, FontSpec::regular(style.size), style.line_height);
    cursor.skip(style.space_after);
}

/// Bold label, then `Evaluación de Riesgo: <value>`; `-` stands in for an unset value.
pub fn evaluation_line(
    pen: &mut Pen,
    cursor: &mut Cursor,
    label: &str,
    value: Option<Evaluation>,
    style: ParagraphStyle,
) {
    heading(pen, cursor, label, style.size);
    cursor.advance(style.line_height, &mut pen.canvas);
    let value = value.map_or(PLACEHOLDER, Evaluation::label);
    let y = cursor.line(&mut pen.canvas);
    let x = pen.geometry().margin_left;
    pen.canvas.draw_text(x, y, FontSpec::regular(style.size), format!("{EVALUATION_PREFIX}{value}"));
    cursor.skip(style.space_after);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::fonts::FontSet;
    use crate::layout::DrawCommand;

    const STYLE: ParagraphStyle = ParagraphStyle {
        size: 10.0,
        line_height: 14.0,
        space_after: 22.0,
    };

    #[test]
    fn paragraph_moves_cursor_by_lines_plus_space() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        let y0 = cursor.y();
        paragraph(&mut pen, &mut cursor, &TextBlock::new("Título:", "uno\ndos"), STYLE);
        assert!((y0 - cursor.y() - (3.0 * 14.0 + 22.0)).abs() < 1e-3);
        let list = pen.finish();
        assert_eq!(list.page_texts()[0], vec!["Título:", "uno", "dos"]);
    }

    #[test]
    fn blank_body_renders_placeholder() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        paragraph(&mut pen, &mut cursor, &TextBlock::new("T", "   "), STYLE);
        assert_eq!(pen.finish().page_texts()[0], vec!["T", "-"]);
    }

    #[test]
    fn unset_evaluation_prints_dash() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        evaluation_line(&mut pen, &mut cursor, "Resultado:", None, STYLE);
        evaluation_line(&mut pen, &mut cursor, "Resultado:", Some(Evaluation::WellMitigated), STYLE);
        let texts = &pen.finish().page_texts()[0];
        assert_eq!(texts[1], "Evaluación de Riesgo: -");
        assert_eq!(texts[3], "Evaluación de Riesgo: Bien mitigado");
    }

    #[test]
    fn right_aligned_text_ends_at_right_margin() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        let font = FontSpec::bold(16.0);
        heading_right(&mut pen, &mut cursor, "Formulario", font);
        let list = pen.finish();
        let DrawCommand::Text { x, text, .. } = &list.pages[0].commands[0] else {
            panic!("expected text");
        };
        let end = x + fonts.text_width(font, text);
        assert!((end - config.page.right_edge()).abs() < 1e-3);
    }

    #[test]
    fn long_body_pages_without_drawing_in_margin() {
        let config = LayoutConfig::default();
        let fonts = FontSet::builtin();
        let mut pen = Pen::new(&fonts, &config);
        let mut cursor = Cursor::new(&config.page);
        let body = vec!["línea"; 200].join("\n");
        paragraph(&mut pen, &mut cursor, &TextBlock::new("T", body), STYLE);
        let list = pen.finish();
        assert!(list.page_count() >= 4);
        for (_, cmd) in list.commands() {
            if let DrawCommand::Text { y, .. } = cmd {
                assert!(*y >= config.page.margin_bottom);
                assert!(*y <= config.page.top_y());
            }
        }
    }
}
