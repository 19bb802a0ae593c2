//! Serializes a [`DisplayList`] with `pdf-writer`.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::asset::RasterImage;
use crate::error::Error;
use crate::fonts::{BuiltinFont, FontFace, FontSet, TrueTypeFont, to_winansi_bytes};
use crate::layout::{DisplayList, DrawCommand};
use crate::model::FontStyle;

/// Document information dictionary entries.
#[derive(Clone, Debug)]
pub struct Metadata<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub created: NaiveDateTime,
}

struct FontEntry {
    pdf_name: String,
    font_ref: Ref,
    /// Present for embedded CID fonts; builtin fonts are WinAnsi encoded.
    char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => text
                .chars()
                .filter_map(|ch| map.get(&ch))
                .flat_map(|gid| gid.to_be_bytes())
                .collect(),
            None => to_winansi_bytes(text),
        }
    }
}

fn style_index(style: FontStyle) -> usize {
    match style {
        FontStyle::Regular => 0,
        FontStyle::Bold => 1,
        FontStyle::Oblique => 2,
    }
}

const STYLES: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Oblique];

fn to_pdf_color(c: [u8; 3]) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

fn embed_builtin(pdf: &mut Pdf, font_ref: Ref, font: BuiltinFont) {
    pdf.type1_font(font_ref)
        .base_font(Name(font.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

/// Embed a TrueType/OpenType face as a Type0 font with Identity-H encoding,
/// subset to `used_chars`. Returns the char → CID map for content streams.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font: &TrueTypeFont,
    oblique: bool,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>, Error> {
    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut remapped: Vec<(char, u16, u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(&(gid, width)) = font.glyphs.get(&ch) {
            remapped.push((ch, gid, remapper.remap(gid), width));
        }
    }

    // A failed subset embeds the whole font, which keeps the original glyph ids.
    let (font_data, use_new_ids) = match subsetter::subset(&font.data, 0, &remapper) {
        Ok(data) => (data, true),
        Err(e) => {
            log::warn!("font subsetting failed for {}: {e}; embedding full font", font.ps_name);
            (font.data.to_vec(), false)
        }
    };
    let cid_of = |&(_, old, new, _): &(char, u16, u16, f32)| if use_new_ids { new } else { old };

    let data_len = i32::try_from(font_data.len())
        .map_err(|_| Error::Build(format!("fuente {} demasiado grande para incrustar", font.ps_name)))?;
    pdf.stream(data_ref, &font_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font.ps_name.as_bytes();
    let mut flags = FontFlags::NON_SYMBOLIC;
    if oblique {
        flags |= FontFlags::ITALIC;
    }
    let [x0, y0, x1, y1] = font.bbox;
    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name))
        .flags(flags)
        .bbox(Rect::new(x0, y0, x1, y1))
        .italic_angle(if oblique { -12.0 } else { 0.0 })
        .ascent(font.ascent)
        .descent(font.descent)
        .cap_height(font.cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(CidFontType::Type2);
        cid.base_font(Name(ps_name));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut widths: Vec<(u16, f32)> = remapped.iter().map(|r| (cid_of(r), r.3)).collect();
        widths.sort_by_key(|&(cid, _)| cid);
        widths.dedup_by_key(|&mut (cid, _)| cid);
        if !widths.is_empty() {
            let mut w = cid.widths();
            for (cid, width) in widths {
                w.consecutive(cid, [width]);
            }
        }
    }

    let cmap_name = format!("{}-UTF16", font.ps_name);
    let mut cmap = UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for r in &remapped {
        cmap.pair(cid_of(r), r.0);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(remapped.iter().map(|r| (r.0, cid_of(r))).collect())
}

fn embed_image(pdf: &mut Pdf, img: &RasterImage, alloc: &mut impl FnMut() -> Ref) -> Ref {
    let xobj_ref = alloc();
    let (w, h) = (img.width as i32, img.height as i32);

    let smask_ref = if img.has_alpha() {
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&img.alpha(), 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w);
        mask.height(h);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&img.rgb(), 6);
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w);
    xobj.height(h);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    xobj_ref
}

fn pdf_date(at: NaiveDateTime) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
}

fn write_page_content(
    list: &DisplayList,
    page_index: usize,
    fonts: &[Option<FontEntry>; 3],
    image_names: &[String],
) -> Result<Content, Error> {
    let mut content = Content::new();
    for cmd in &list.pages[page_index].commands {
        match cmd {
            DrawCommand::Text { x, y, font, text } => {
                let entry = fonts[style_index(font.style)]
                    .as_ref()
                    .ok_or_else(|| Error::Build(format!("sin fuente registrada para {:?}", font.style)))?;
                let bytes = entry.encode(text);
                content
                    .set_fill_gray(0.0)
                    .begin_text()
                    .set_font(Name(entry.pdf_name.as_bytes()), font.size)
                    .next_line(*x, *y)
                    .show(Str(&bytes))
                    .end_text();
            }
            DrawCommand::FillRect { rect, color } => {
                let (r, g, b) = to_pdf_color(*color);
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(rect.x, rect.y, rect.width, rect.height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawCommand::StrokeRect {
                rect,
                line_width,
                color,
            } => {
                let (r, g, b) = to_pdf_color(*color);
                content.save_state();
                content.set_line_width(*line_width);
                content.set_stroke_rgb(r, g, b);
                content.rect(rect.x, rect.y, rect.width, rect.height);
                content.stroke();
                content.restore_state();
            }
            DrawCommand::Image { index, rect } => {
                let name = image_names
                    .get(*index)
                    .ok_or_else(|| Error::Build(format!("imagen {index} ausente de la lista de dibujo")))?;
                content.save_state();
                content.transform([rect.width, 0.0, 0.0, rect.height, rect.x, rect.y]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
        }
    }
    Ok(content)
}

/// Encode every page of `list`. Fonts are embedded only for the styles the
/// list actually draws with.
pub fn encode(list: &DisplayList, fonts: &FontSet, meta: &Metadata) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let mut used_chars: [BTreeSet<char>; 3] = Default::default();
    for (_, cmd) in list.commands() {
        if let DrawCommand::Text { font, text, .. } = cmd {
            used_chars[style_index(font.style)].extend(text.chars());
        }
    }

    let mut font_entries: [Option<FontEntry>; 3] = [None, None, None];
    for style in STYLES {
        let i = style_index(style);
        if used_chars[i].is_empty() {
            continue;
        }
        let font_ref = alloc();
        let char_to_gid = match fonts.face(style) {
            FontFace::Builtin(b) => {
                embed_builtin(&mut pdf, font_ref, *b);
                None
            }
            FontFace::TrueType(t) => Some(embed_truetype(
                &mut pdf,
                font_ref,
                t,
                style == FontStyle::Oblique,
                &used_chars[i],
                &mut alloc,
            )?),
        };
        font_entries[i] = Some(FontEntry {
            pdf_name: format!("F{}", i + 1),
            font_ref,
            char_to_gid,
        });
    }
    let t_fonts = t0.elapsed();

    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    for (i, img) in list.images.iter().enumerate() {
        let xobj_ref = embed_image(&mut pdf, img, &mut alloc);
        image_xobjects.push((format!("Im{}", i + 1), xobj_ref));
    }
    let image_names: Vec<String> = image_xobjects.iter().map(|(n, _)| n.clone()).collect();

    let n = list.page_count();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for i in 0..n {
        let content = write_page_content(list, i, &font_entries, &image_names)?;
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let g = &list.geometry;
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, g.width, g.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in font_entries.iter().flatten() {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(meta.title));
        if !meta.author.trim().is_empty() {
            info.author(TextStr(meta.author));
        }
        info.creator(TextStr(concat!("risk-report ", env!("CARGO_PKG_VERSION"))));
        info.creation_date(pdf_date(meta.created));
    }

    let bytes = pdf.finish();
    log::debug!(
        "encode: {n} pages, fonts={:.1}ms, total={:.1}ms, {} bytes",
        t_fonts.as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::{Canvas, Rect as Area};
    use crate::model::FontSpec;

    fn meta() -> Metadata<'static> {
        Metadata {
            title: "Formulario Comité de Riesgos",
            author: "Analista",
            created: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|d| d.and_hms_opt(3, 4, 5))
                .unwrap(),
        }
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn encodes_pages_and_only_used_fonts() {
        let config = LayoutConfig::default();
        let mut canvas = Canvas::new(config.page);
        canvas.draw_text(60.0, 700.0, FontSpec::bold(12.0), "Título");
        canvas.show_page();
        canvas.draw_text(60.0, 700.0, FontSpec::regular(10.0), "Segunda página");
        let list = canvas.finish();

        let bytes = encode(&list, &FontSet::builtin(), &meta()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page") - count(&bytes, b"/Type /Pages"), 2);
        assert_eq!(count(&bytes, b"/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count(&bytes, b"/BaseFont /Helvetica-Oblique"), 0);
        assert_eq!(count(&bytes, b"/WinAnsiEncoding"), 2);
    }

    #[test]
    fn translucent_image_gets_soft_mask() {
        let config = LayoutConfig::default();
        let mut canvas = Canvas::new(config.page);
        let img = RasterImage {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 100],
        };
        canvas.draw_image(img, Area::new(60.0, 700.0, 30.0, 30.0));
        let bytes = encode(&canvas.finish(), &FontSet::builtin(), &meta()).unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 2);
        assert_eq!(count(&bytes, b"/SMask"), 1);
    }

    #[test]
    fn builtin_entry_encodes_winansi() {
        let entry = FontEntry {
            pdf_name: "F1".into(),
            font_ref: Ref::new(1),
            char_to_gid: None,
        };
        assert_eq!(entry.encode("é"), vec![0xE9]);
        let cid = FontEntry {
            char_to_gid: Some(HashMap::from([('a', 0x0102)])),
            ..entry
        };
        assert_eq!(cid.encode("aXa"), vec![1, 2, 1, 2]);
    }
}
