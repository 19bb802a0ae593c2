//! Composes a [`ReportData`] into a paginated [`DisplayList`].

use chrono::NaiveDateTime;

use crate::asset::LogoAsset;
use crate::config::LayoutConfig;
use crate::fonts::FontSet;
use crate::layout::{
    Cursor, DisplayList, KeyValueTable, ParagraphStyle, Pen, Rect, draw_table, evaluation_line,
    flow_lines, heading, heading_right, paragraph,
};
use crate::model::{FontSpec, ReportData, Section, TextBlock};
use crate::schema::{
    INSTRUCTIONS, INSTRUCTIONS_HEADING, NARRATIVE_LABEL, QUESTION_PREFIX, RECOMMENDATION_HEADING,
    RECOMMENDATION_LABEL, REPORT_TITLE, RESULT_LABEL, SUMMARY_HEADING, TABLE_HEADER, summary_rows,
};

const BODY_SIZE: f32 = 10.0;
const TITLE_FONT: FontSpec = FontSpec::bold(16.0);
const STAMP_FONT: FontSpec = FontSpec::regular(9.0);
const QUESTION_FONT: FontSpec = FontSpec::oblique(9.0);
const SUMMARY_HEADING_SIZE: f32 = 13.0;
const SECTION_HEADING_SIZE: f32 = 12.0;
const LOGO_BOX: (f32, f32) = (90.0, 30.0);
const LOGO_DROP: f32 = 20.0;
const TITLE_GAP: f32 = 22.0;
const HEADER_GAP: f32 = 20.0;
const SUMMARY_HEADING_GAP: f32 = 14.0;
const SECTION_HEADING_GAP: f32 = 12.0;
const QUESTION_GAP: f32 = 8.0;
const INSTRUCTIONS_EXTRA_GAP: f32 = 6.0;

#[derive(Clone, Copy, Debug)]
enum Stage {
    Header,
    SummaryTable,
    Instructions,
    Sections,
    Recommendation,
}

/// The fixed order the report is drawn in.
const STAGES: [Stage; 5] = [
    Stage::Header,
    Stage::SummaryTable,
    Stage::Instructions,
    Stage::Sections,
    Stage::Recommendation,
];

fn body_style(config: &LayoutConfig, space_after: f32) -> ParagraphStyle {
    ParagraphStyle {
        size: BODY_SIZE,
        line_height: config.spacing.line_height,
        space_after,
    }
}

/// Lay out one numbered section: heading, guiding question, narrative and result.
pub fn section_block(pen: &mut Pen, cursor: &mut Cursor, section: &Section) {
    let spacing = pen.config.spacing;
    cursor.ensure_room(spacing.section_reserve, &mut pen.canvas);

    heading(
        pen,
        cursor,
        &format!("{}. {}", section.ordinal, section.title),
        SECTION_HEADING_SIZE,
    );
    cursor.skip(SECTION_HEADING_GAP);

    let question = format!("{QUESTION_PREFIX}{}", section.question);
    flow_lines(pen, cursor, &question, QUESTION_FONT, spacing.line_height);
    cursor.skip(QUESTION_GAP);

    let narrative_style = body_style(pen.config, spacing.block_space);
    paragraph(
        pen,
        cursor,
        &TextBlock::new(NARRATIVE_LABEL, section.narrative.as_str()),
        narrative_style,
    );
    let result_style = body_style(pen.config, spacing.block_space + spacing.section_extra_gap);
    evaluation_line(pen, cursor, RESULT_LABEL, section.evaluation, result_style);
}

fn draw_header(pen: &mut Pen, cursor: &mut Cursor, logo: Option<&LogoAsset>, generated_at: NaiveDateTime) {
    if let Some(img) = logo.and_then(LogoAsset::image) {
        let (w, h) = LOGO_BOX;
        let bounds = Rect::new(pen.geometry().margin_left, cursor.y() - LOGO_DROP, w, h);
        let rect = img.fit_into(bounds);
        pen.canvas.draw_image(img.clone(), rect);
    }
    heading_right(pen, cursor, REPORT_TITLE, TITLE_FONT);
    cursor.skip(TITLE_GAP);
    let stamp = format!("Generado: {}", generated_at.format("%Y-%m-%d %H:%M"));
    heading_right(pen, cursor, &stamp, STAMP_FONT);
    cursor.skip(HEADER_GAP);
}

fn draw_summary(pen: &mut Pen, cursor: &mut Cursor, data: &ReportData) {
    heading(pen, cursor, SUMMARY_HEADING, SUMMARY_HEADING_SIZE);
    cursor.skip(SUMMARY_HEADING_GAP);
    let table = KeyValueTable {
        header: TABLE_HEADER.map(String::from),
        rows: summary_rows(&data.summary),
    };
    let space_after = pen.config.spacing.table_space;
    draw_table(pen, cursor, &table, space_after);
}

fn draw_recommendation(pen: &mut Pen, cursor: &mut Cursor, data: &ReportData) {
    let spacing = pen.config.spacing;
    cursor.ensure_room(spacing.recommendation_reserve, &mut pen.canvas);
    heading(pen, cursor, RECOMMENDATION_HEADING, SECTION_HEADING_SIZE);
    cursor.skip(SECTION_HEADING_GAP);
    let style = body_style(pen.config, spacing.block_space);
    paragraph(
        pen,
        cursor,
        &TextBlock::new(RECOMMENDATION_LABEL, data.recommendation.as_str()),
        style,
    );
}

/// Draw the whole report. `data` is expected to have passed validation;
/// nothing is re-checked here.
pub fn assemble(
    data: &ReportData,
    logo: Option<&LogoAsset>,
    fonts: &FontSet,
    config: &LayoutConfig,
    generated_at: NaiveDateTime,
) -> DisplayList {
    let mut pen = Pen::new(fonts, config);
    let mut cursor = Cursor::new(&config.page);

    for stage in STAGES {
        log::trace!("stage {stage:?} at page {} y={:.1}", cursor.page_index() + 1, cursor.y());
        match stage {
            Stage::Header => draw_header(&mut pen, &mut cursor, logo, generated_at),
            Stage::SummaryTable => draw_summary(&mut pen, &mut cursor, data),
            Stage::Instructions => {
                let space_after = config.spacing.block_space + INSTRUCTIONS_EXTRA_GAP;
                paragraph(
                    &mut pen,
                    &mut cursor,
                    &TextBlock::new(INSTRUCTIONS_HEADING, INSTRUCTIONS),
                    body_style(config, space_after),
                );
            }
            Stage::Sections => {
                for section in &data.sections {
                    section_block(&mut pen, &mut cursor, section);
                }
            }
            Stage::Recommendation => draw_recommendation(&mut pen, &mut cursor, data),
        }
    }

    pen.finish()
}
