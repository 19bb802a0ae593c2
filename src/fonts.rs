use std::collections::HashMap;
use std::path::Path;

use memmap2::Mmap;
use ttf_parser::Face;

use crate::config::FontFiles;
use crate::error::Error;
use crate::model::{FontSpec, FontStyle};

/// Helvetica AFM advance widths for ASCII 32..=126 (1000 units/em).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM advance widths for ASCII 32..=126 (1000 units/em).
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica ascender (718/1000).
const HELVETICA_ASCENDER: f32 = 0.718;

/// The standard-14 fonts used when no TrueType file is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub(crate) fn for_style(style: FontStyle) -> Self {
        match style {
            FontStyle::Regular => BuiltinFont::Helvetica,
            FontStyle::Bold => BuiltinFont::HelveticaBold,
            FontStyle::Oblique => BuiltinFont::HelveticaOblique,
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    fn is_bold(self) -> bool {
        self == BuiltinFont::HelveticaBold
    }

    fn char_width_1000(self, ch: char) -> f32 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let byte = char_to_winansi(ch);
        if byte == 0 {
            return 0.0;
        }
        if (32..=126).contains(&byte) {
            return table[(byte - 32) as usize] as f32;
        }
        // Accented Latin-1 letters share the advance of their base letter.
        let base = match ch {
            'À'..='Å' => 'A',
            'Ç' => 'C',
            'È'..='Ë' => 'E',
            'Ñ' => 'N',
            'Ò'..='Ö' | 'Ø' => 'O',
            'Ù'..='Ü' => 'U',
            'Ý' => 'Y',
            'à'..='å' => 'a',
            'ç' => 'c',
            'è'..='ë' => 'e',
            'ñ' => 'n',
            'ò'..='ö' | 'ø' => 'o',
            'ù'..='ü' => 'u',
            'ý' | 'ÿ' => 'y',
            'Ì'..='Ï' | 'ì'..='ï' | '\u{A0}' | '·' => return 278.0,
            '¿' => return 611.0,
            '¡' => return 333.0,
            '–' | '«' | '»' | '€' => return 556.0,
            '—' => return 1000.0,
            '•' => return 350.0,
            '°' => return 400.0,
            'º' => return 365.0,
            'ª' => return 370.0,
            '‘' | '’' => return if self.is_bold() { 278.0 } else { 222.0 },
            '“' | '”' => return if self.is_bold() { 500.0 } else { 333.0 },
            _ => return 556.0,
        };
        table[(base as u8 - 32) as usize] as f32
    }
}

/// A TrueType/OpenType face loaded from disk, measured from its own tables.
pub(crate) struct TrueTypeFont {
    pub(crate) ps_name: String,
    pub(crate) data: Mmap,
    /// char -> (glyph id, advance in 1000 units)
    pub(crate) glyphs: HashMap<char, (u16, f32)>,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) cap_height: f32,
    pub(crate) bbox: [f32; 4],
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn load_truetype(path: &Path) -> Result<TrueTypeFont, Error> {
    let t0 = std::time::Instant::now();
    let fail = |e: &dyn std::fmt::Display| Error::Config(format!("{}: {e}", path.display()));

    let file = std::fs::File::open(path).map_err(|e| fail(&e))?;
    let data = unsafe { Mmap::map(&file) }.map_err(|e| fail(&e))?;

    let (ps_name, glyphs, ascent, descent, cap_height, bbox) = {
        let face = Face::parse(&data, 0).map_err(|e| fail(&e))?;
        let units = face.units_per_em() as f32;
        let to_1000 = |v: f32| v / units * 1000.0;

        let mut glyphs: HashMap<char, (u16, f32)> = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let Some(ch) = char::from_u32(cp)
                        && let Some(gid) = subtable.glyph_index(cp)
                    {
                        let adv = face
                            .glyph_hor_advance(gid)
                            .map(|a| to_1000(a as f32))
                            .unwrap_or(0.0);
                        glyphs.entry(ch).or_insert((gid.0, adv));
                    }
                });
            }
        }
        if glyphs.is_empty() {
            return Err(Error::Config(format!(
                "{}: la fuente no tiene cmap Unicode",
                path.display()
            )));
        }

        let bb = face.global_bounding_box();
        let name = font_family_name(&face)
            .unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "EmbeddedFont".to_string())
            })
            .replace(' ', "");
        (
            name,
            glyphs,
            to_1000(face.ascender() as f32),
            to_1000(face.descender() as f32),
            face.capital_height()
                .map(|h| to_1000(h as f32))
                .unwrap_or(700.0),
            [
                to_1000(bb.x_min as f32),
                to_1000(bb.y_min as f32),
                to_1000(bb.x_max as f32),
                to_1000(bb.y_max as f32),
            ],
        )
    };

    log::debug!(
        "load_truetype: {} ({ps_name}, {} glyphs) → {:.1}ms",
        path.display(),
        glyphs.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(TrueTypeFont {
        ps_name,
        data,
        glyphs,
        ascent,
        descent,
        cap_height,
        bbox,
    })
}

pub(crate) enum FontFace {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFont),
}

impl FontFace {
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        match self {
            FontFace::Builtin(b) => b.char_width_1000(ch),
            FontFace::TrueType(t) => t.glyphs.get(&ch).map_or(0.0, |&(_, w)| w),
        }
    }

    fn ascender_ratio(&self) -> f32 {
        match self {
            FontFace::Builtin(_) => HELVETICA_ASCENDER,
            FontFace::TrueType(t) => t.ascent / 1000.0,
        }
    }
}

/// The three faces a report draws with, plus width measurement.
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
    oblique: FontFace,
}

impl FontSet {
    /// Helvetica, Helvetica-Bold and Helvetica-Oblique with builtin metrics.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::Builtin(BuiltinFont::Helvetica),
            bold: FontFace::Builtin(BuiltinFont::HelveticaBold),
            oblique: FontFace::Builtin(BuiltinFont::HelveticaOblique),
        }
    }

    /// Load configured font files; any style whose file can't be read falls
    /// back to its builtin Helvetica variant.
    pub fn load(files: &FontFiles) -> Self {
        let pick = |path: Option<&Path>, style: FontStyle| match path {
            None => FontFace::Builtin(BuiltinFont::for_style(style)),
            Some(p) => match load_truetype(p) {
                Ok(font) => FontFace::TrueType(font),
                Err(e) => {
                    log::warn!("{e}; using {}", BuiltinFont::for_style(style).base_font());
                    FontFace::Builtin(BuiltinFont::for_style(style))
                }
            },
        };
        Self {
            regular: pick(files.regular.as_deref(), FontStyle::Regular),
            bold: pick(files.bold.as_deref(), FontStyle::Bold),
            oblique: pick(files.oblique.as_deref(), FontStyle::Oblique),
        }
    }

    pub(crate) fn face(&self, style: FontStyle) -> &FontFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }

    /// Advance width of `text` in points.
    pub fn text_width(&self, font: FontSpec, text: &str) -> f32 {
        let face = self.face(font.style);
        text.chars().map(|ch| face.char_width_1000(ch)).sum::<f32>() * font.size / 1000.0
    }

    /// Distance from the top of a line box to its baseline, as a fraction of the font size.
    pub fn ascender_ratio(&self, style: FontStyle) -> f32 {
        self.face(style).ascender_ratio()
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
pub(crate) fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}
