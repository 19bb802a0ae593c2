mod asset;
mod config;
mod error;
mod fonts;
mod form;
pub mod layout;
mod model;
mod report;
mod schema;

#[cfg(feature = "pdf")]
mod pdf;

pub use asset::{LogoAsset, RasterImage, decode_logo};
pub use config::{FontFiles, LayoutConfig, PageGeometry, Spacing};
pub use error::{Error, Result};
pub use fonts::FontSet;
pub use form::{FormInput, missing_fields, validate};
pub use model::{Evaluation, FontSpec, FontStyle, ReportData, Section, Summary, TextBlock};
pub use report::{assemble, section_block};
pub use schema::{
    DEFAULT_BASE_NAME, RECOMMENDATION_KEY, SECTIONS, SUMMARY_FIELDS, SectionDef, SummaryField, section_def,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;

use layout::DisplayList;

/// Whether this build can produce PDF output.
pub fn renderer_available() -> bool {
    cfg!(feature = "pdf")
}

/// Lay out the report without encoding it. Useful for inspecting pagination.
pub fn layout_report(
    data: &ReportData,
    logo: Option<&[u8]>,
    config: &LayoutConfig,
    generated_at: NaiveDateTime,
) -> Result<DisplayList> {
    config.validate()?;
    let fonts = FontSet::load(&config.fonts);
    let logo = logo.map(decode_logo);
    Ok(assemble(data, logo.as_ref(), &fonts, config, generated_at))
}

/// Render the report to PDF bytes, stamped with the current local time.
pub fn build_report(data: &ReportData, logo: Option<&[u8]>, config: &LayoutConfig) -> Result<Vec<u8>> {
    build_report_at(data, logo, config, chrono::Local::now().naive_local())
}

/// Render the report to PDF bytes with an explicit "Generado" timestamp.
pub fn build_report_at(
    data: &ReportData,
    logo: Option<&[u8]>,
    config: &LayoutConfig,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>> {
    if !renderer_available() {
        return Err(Error::RendererUnavailable);
    }
    config.validate()?;

    let t0 = Instant::now();
    let fonts = FontSet::load(&config.fonts);
    let logo = logo.map(decode_logo);
    let list = assemble(data, logo.as_ref(), &fonts, config, generated_at);
    let t_layout = t0.elapsed();

    let bytes = encode(&list, &fonts, data, generated_at)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, encode={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        list.page_count(),
        bytes.len(),
    );
    Ok(bytes)
}

#[cfg(feature = "pdf")]
fn encode(list: &DisplayList, fonts: &FontSet, data: &ReportData, created: NaiveDateTime) -> Result<Vec<u8>> {
    let meta = pdf::Metadata {
        title: schema::REPORT_TITLE,
        author: &data.summary.analyst,
        created,
    };
    pdf::encode(list, fonts, &meta)
}

#[cfg(not(feature = "pdf"))]
fn encode(_: &DisplayList, _: &FontSet, _: &ReportData, _: NaiveDateTime) -> Result<Vec<u8>> {
    Err(Error::RendererUnavailable)
}

/// `{base}_{client}_{YYYYMMDD_HHMM}.pdf`. Path separators and control
/// characters in the parts are replaced with `_`.
pub fn suggested_filename(base: &str, client: &str, at: NaiveDateTime) -> String {
    let clean = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| {
                if c == '/' || c == '\\' || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    };
    let base = if base.trim().is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        clean(base)
    };
    format!("{base}_{}_{}.pdf", clean(client), at.format("%Y%m%d_%H%M"))
}

/// Validate `form`, render it and write the PDF into `out_dir` under its
/// suggested filename. Returns the written path.
pub fn export_report(
    form: &FormInput,
    logo: Option<&[u8]>,
    config: &LayoutConfig,
    out_dir: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    let data = validate(form)?;
    let now = chrono::Local::now().naive_local();
    let bytes = build_report_at(&data, logo, config, now)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(suggested_filename(base_name, &data.summary.client_name, now));
    std::fs::write(&path, &bytes)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
