//! Fixed report schema: summary fields, section catalog and static guidance text.

use crate::model::Summary;

pub const REPORT_TITLE: &str = "Formulario Comité de Riesgos";
pub const SUMMARY_HEADING: &str = "1. Resumen Ejecutivo de la Operación";
pub const INSTRUCTIONS_HEADING: &str = "2. Instrucciones Generales";
pub const RECOMMENDATION_HEADING: &str = "10. Recomendación del Analista";
pub const RECOMMENDATION_LABEL: &str = "Recomendaciones y comentarios:";
pub const NARRATIVE_LABEL: &str = "Narrativa o justificación:";
pub const RESULT_LABEL: &str = "Resultado:";
pub const QUESTION_PREFIX: &str = "Pregunta orientadora: ";
pub const EVALUATION_PREFIX: &str = "Evaluación de Riesgo: ";
pub const TABLE_HEADER: [&str; 2] = ["Campo", "Valor"];
pub const DEFAULT_BASE_NAME: &str = "Comite_Riesgos";

pub const INSTRUCTIONS: &str = "Este formulario debe ser completado por el analista antes de la sesión del Comité de Riesgos. \
Cada sección incluye una narrativa obligatoria sobre el criterio evaluado donde se comentarán \
puntos respecto a la pregunta orientadora dada. Además, se debe seleccionar una calificación \
según el grado de mitigación del riesgo identificado.\n\
Escala de evaluación: Crítico no mitigado, Alto con mitigación débil, Medio aceptable, Bien mitigado";

pub struct SectionDef {
    pub ordinal: u8,
    pub title: &'static str,
    pub question: &'static str,
}

impl SectionDef {
    pub fn narrative_key(&self) -> String {
        format!("s{}_narrativa", self.ordinal)
    }

    pub fn eval_key(&self) -> String {
        format!("s{}_eval", self.ordinal)
    }
}

pub const SECTIONS: [SectionDef; 7] = [
    SectionDef {
        ordinal: 3,
        title: "Riesgos materiales identificados",
        question: "Riesgos como ingresos no validados, concentración en un solo cliente, informalidad no mitigada, \
o problemas legales menores. ¿Están bien diagnosticados y mitigados?",
    },
    SectionDef {
        ordinal: 4,
        title: "Coherencia global de la operación",
        question: "¿Hay alineación entre ingresos, destino, monto, plazo, garantía, y tipo de cliente? \
¿Tiene sentido financiero y operativo?",
    },
    SectionDef {
        ordinal: 5,
        title: "Justificación de excepciones al modelo",
        question: "¿Existen excepciones al scoring, LTV, score o historial? ¿Están explícitas, bien sustentadas \
y tienen lógica dentro del apetito de riesgo?",
    },
    SectionDef {
        ordinal: 6,
        title: "Fortalezas compensatorias claras",
        question: "¿Hay fortalezas que compensan debilidades? Ej. garantía de calidad, destino productivo, cliente con \
experiencia sólida, historial positivo del cliente",
    },
    SectionDef {
        ordinal: 7,
        title: "Reputación / trayectoria del cliente",
        question: "¿Tiene referencias confiables? ¿Se conoce su comportamiento informal o trayectoria empresarial \
fuera de burós (historial crediticio)?",
    },
    SectionDef {
        ordinal: 8,
        title: "Relación cliente–empresa / estrategia comercial",
        question: "¿La operación encaja dentro de nuestra estrategia? ¿Es un cliente recurrente, bien gestionado, \
o clave para nuevas líneas?",
    },
    SectionDef {
        ordinal: 9,
        title: "Condiciones de salida o repago alternativo",
        question: "¿Hay una fuente secundaria de repago clara o plan de salida en caso de stress? \
(venta de activo, refinanciamiento, otro flujo)",
    },
];

pub fn section_def(ordinal: u8) -> Option<&'static SectionDef> {
    SECTIONS.iter().find(|s| s.ordinal == ordinal)
}

pub struct SummaryField {
    pub key: &'static str,
    /// Label used in form validation messages.
    pub label: &'static str,
    /// Label printed in the summary table.
    pub row_label: &'static str,
    pub required: bool,
    pub get: fn(&Summary) -> &str,
    pub set: fn(&mut Summary, String),
}

pub const SUMMARY_FIELDS: [SummaryField; 11] = [
    SummaryField {
        key: "nombre_cliente",
        label: "Nombre del cliente",
        row_label: "Nombre del cliente:",
        required: true,
        get: |s| s.client_name.as_str(),
        set: |s, v| s.client_name = v,
    },
    SummaryField {
        key: "destino_fondos",
        label: "Destino de los fondos",
        row_label: "Destino de los fondos:",
        required: true,
        get: |s| s.funds_destination.as_str(),
        set: |s, v| s.funds_destination = v,
    },
    SummaryField {
        key: "monto_solicitado",
        label: "Monto solicitado",
        row_label: "Monto solicitado:",
        required: true,
        get: |s| s.requested_amount.as_str(),
        set: |s, v| s.requested_amount = v,
    },
    SummaryField {
        key: "direccion_garantia",
        label: "Dirección de garantía",
        row_label: "Dirección de garantía:",
        required: true,
        get: |s| s.collateral_address.as_str(),
        set: |s, v| s.collateral_address = v,
    },
    SummaryField {
        key: "garantia",
        label: "Garantía ofrecida",
        row_label: "Garantía ofrecida:",
        required: true,
        get: |s| s.collateral.as_str(),
        set: |s, v| s.collateral = v,
    },
    SummaryField {
        key: "fecha",
        label: "Fecha",
        row_label: "Fecha:",
        required: true,
        get: |s| s.date.as_str(),
        set: |s, v| s.date = v,
    },
    SummaryField {
        key: "score",
        label: "Score",
        row_label: "Score:",
        required: true,
        get: |s| s.score.as_str(),
        set: |s, v| s.score = v,
    },
    SummaryField {
        key: "calificacion_actual",
        label: "Calificación actual",
        row_label: "Calificación actual:",
        required: true,
        get: |s| s.current_rating.as_str(),
        set: |s, v| s.current_rating = v,
    },
    SummaryField {
        key: "peor_calificacion",
        label: "Peor calificación",
        row_label: "Peor calificación:",
        required: true,
        get: |s| s.worst_rating.as_str(),
        set: |s, v| s.worst_rating = v,
    },
    SummaryField {
        key: "responsable",
        label: "Responsable del análisis",
        row_label: "Responsable del análisis:",
        required: true,
        get: |s| s.analyst.as_str(),
        set: |s, v| s.analyst = v,
    },
    SummaryField {
        key: "risk_file",
        label: "Expediente de riesgo",
        row_label: "Expediente de riesgo (ID/enlace interno):",
        required: false,
        get: |s| s.risk_file.as_str(),
        set: |s, v| s.risk_file = v,
    },
];

pub const RECOMMENDATION_KEY: &str = "recomendacion_analista";
pub const RECOMMENDATION_FIELD_LABEL: &str = "Recomendación";

/// Rows of the summary table, without the header.
pub fn summary_rows(summary: &Summary) -> Vec<[String; 2]> {
    SUMMARY_FIELDS
        .iter()
        .map(|f| [f.row_label.to_string(), (f.get)(summary).to_string()])
        .collect()
}
