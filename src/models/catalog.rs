//! Evaluation item catalog
//!
//! Each item is a bilingual prompt (Spanish / Chinese). The catalog is fixed
//! for the lifetime of the process and decides how many rows a case has.

use serde::{Deserialize, Serialize};

/// A single bilingual evaluation prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationItem {
    /// Spanish text
    pub es: String,

    /// Chinese text
    pub zh: String,
}

impl EvaluationItem {
    pub fn new(es: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            es: es.into(),
            zh: zh.into(),
        }
    }

    /// Label as printed on the paper form: "es / zh"
    pub fn label(&self) -> String {
        format!("{} / {}", self.es, self.zh)
    }
}

const DEFAULT_ITEMS: &[(&str, &str)] = &[
    ("Usa herramientas adecuadas para la tarea", "使用适当的工具完成任务"),
    (
        "Se usan los equipos de manera segura, sin improvisaciones",
        "安全使用设备，无即兴操作",
    ),
    (
        "Usa correctamente el EPP (colocado y ajustado)",
        "正确使用并佩戴好PPE防护装备",
    ),
    (
        "El área está limpia y libre de materiales fuera de lugar",
        "区域干净、无杂物",
    ),
    (
        "Realiza correctamente la manipulación de las cargas",
        "正确进行搬运操作",
    ),
    (
        "No presenta distracciones por celular durante la ejecución",
        "作业中无手机分心行为",
    ),
    (
        "Los equipos se encuentran en buen estado y funcionales",
        "设备状况良好、功能正常",
    ),
    (
        "Ejecuta sus actividades conforme a la instrucción de trabajo",
        "按作业指导执行工作",
    ),
    ("Levanta objetos con técnica correcta", "正确使用抬举技巧"),
    ("Verifica el estado de sus herramientas", "工具设备点检完好"),
];

/// Immutable, ordered list of evaluation items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<EvaluationItem>,
}

impl Catalog {
    pub fn new(items: Vec<EvaluationItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[EvaluationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EvaluationItem> {
        self.items.get(index)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_ITEMS
                .iter()
                .map(|(es, zh)| EvaluationItem::new(*es, *zh))
                .collect(),
        )
    }
}
