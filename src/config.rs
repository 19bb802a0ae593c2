use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// A4 portrait in points. Kept as plain constants so geometry is known even
/// when the PDF encoder is compiled out.
pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;
/// 2 cm in points.
pub const DEFAULT_MARGIN: f32 = 2.0 * 28.3465;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: DEFAULT_MARGIN,
            margin_right: DEFAULT_MARGIN,
            margin_top: DEFAULT_MARGIN,
            margin_bottom: DEFAULT_MARGIN,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Baseline of the first line on a fresh page.
    pub fn top_y(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub line_height: f32,
    pub block_space: f32,
    pub table_space: f32,
    pub section_extra_gap: f32,
    /// Room a section needs below the cursor before it may start on the current page.
    pub section_reserve: f32,
    pub recommendation_reserve: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            line_height: 14.0,
            block_space: 22.0,
            table_space: 24.0,
            section_extra_gap: 10.0,
            section_reserve: 260.0,
            recommendation_reserve: 150.0,
        }
    }
}

/// Optional TrueType/OpenType files replacing the builtin Helvetica family.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontFiles {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub oblique: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page: PageGeometry,
    pub spacing: Spacing,
    pub fonts: FontFiles,
}

impl LayoutConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: LayoutConfig =
            toml::from_str(s).map_err(|e| Error::Config(format!("TOML inválido: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let p = &self.page;
        if p.content_width() <= 0.0 {
            return Err(Error::Config(format!(
                "el ancho útil debe ser positivo (página {:.1}pt, márgenes {:.1}+{:.1})",
                p.width, p.margin_left, p.margin_right
            )));
        }
        if p.content_height() <= 0.0 {
            return Err(Error::Config(format!(
                "el alto útil debe ser positivo (página {:.1}pt, márgenes {:.1}+{:.1})",
                p.height, p.margin_top, p.margin_bottom
            )));
        }
        if self.spacing.line_height <= 0.0 {
            return Err(Error::Config("line_height debe ser positivo".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_with_two_cm_margins() {
        let c = LayoutConfig::default();
        assert!((c.page.width - 595.2756).abs() < 1e-3);
        assert!((c.page.margin_left - 56.693).abs() < 1e-2);
        assert!((c.page.content_width() - 481.89).abs() < 0.01);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = LayoutConfig::from_toml_str(
            r#"
            [spacing]
            section_reserve = 200.0
            "#,
        )
        .unwrap();
        assert_eq!(c.spacing.section_reserve, 200.0);
        assert_eq!(c.spacing.line_height, 14.0);
        assert_eq!(c.page, PageGeometry::default());
        assert!(c.fonts.regular.is_none());
    }

    #[test]
    fn rejects_margins_wider_than_page() {
        let err = LayoutConfig::from_toml_str(
            r#"
            [page]
            width = 100.0
            margin_left = 60.0
            margin_right = 60.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
