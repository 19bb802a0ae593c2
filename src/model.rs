#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub size: f32,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            style: FontStyle::Regular,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            style: FontStyle::Bold,
            size,
        }
    }

    pub const fn oblique(size: f32) -> Self {
        Self {
            style: FontStyle::Oblique,
            size,
        }
    }
}

/// Qualitative risk-mitigation rating. Passed through as text, never scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Evaluation {
    CriticalUnmitigated,
    HighWeakMitigation,
    MediumAcceptable,
    WellMitigated,
}

impl Evaluation {
    pub const ALL: [Evaluation; 4] = [
        Evaluation::CriticalUnmitigated,
        Evaluation::HighWeakMitigation,
        Evaluation::MediumAcceptable,
        Evaluation::WellMitigated,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Evaluation::CriticalUnmitigated => "Crítico no mitigado",
            Evaluation::HighWeakMitigation => "Alto con mitigación débil",
            Evaluation::MediumAcceptable => "Medio aceptable",
            Evaluation::WellMitigated => "Bien mitigado",
        }
    }

    /// Exact label match; blank or unknown text is "unset".
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|e| e.label() == s)
    }
}

/// Title + free text body. A blank body renders as `-`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    pub title: String,
    pub body: String,
}

impl TextBlock {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub ordinal: u8,
    pub title: &'static str,
    pub question: &'static str,
    pub narrative: String,
    pub evaluation: Option<Evaluation>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub client_name: String,
    pub funds_destination: String,
    pub requested_amount: String,
    pub collateral_address: String,
    pub collateral: String,
    pub date: String,
    pub score: String,
    pub current_rating: String,
    pub worst_rating: String,
    pub analyst: String,
    pub risk_file: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportData {
    pub summary: Summary,
    pub sections: Vec<Section>,
    pub recommendation: String,
}
