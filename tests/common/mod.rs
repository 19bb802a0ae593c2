#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use risk_committee_pdf::{Evaluation, FormInput, RECOMMENDATION_KEY, SECTIONS, SUMMARY_FIELDS};

/// Every field filled with a single word and every section rated `Bien mitigado`.
pub fn filled_form() -> FormInput {
    let mut form = FormInput::new();
    for field in &SUMMARY_FIELDS {
        form.set(field.key, "Valor");
    }
    form.set("nombre_cliente", "ACME");
    form.set("fecha", "2024-05-17");
    for def in &SECTIONS {
        form.set(def.narrative_key(), "Correcto");
        form.set(def.eval_key(), Evaluation::WellMitigated.label());
    }
    form.set(RECOMMENDATION_KEY, "Aprobar");
    form
}

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|d| d.and_hms_opt(10, 45, 0))
        .unwrap()
}

pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Page objects in a PDF file (the page tree node is excluded).
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    count(bytes, b"/Type /Page") - count(bytes, b"/Type /Pages")
}

/// A small opaque PNG.
pub fn png_logo(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0x1F, 0x4E, 0x79]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Page texts with the generation stamp removed.
pub fn texts_without_stamp(pages: Vec<Vec<String>>) -> Vec<Vec<String>> {
    pages
        .into_iter()
        .map(|p| p.into_iter().filter(|t| !t.starts_with("Generado:")).collect())
        .collect()
}
