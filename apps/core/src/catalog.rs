//! Read-only catalog of common pregnancy symptoms for selection UIs.

use crate::models::Symptom;
use std::sync::LazyLock;

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    severity_weight: u8,
}

const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Severe headaches",
        description: "Persistent or worsening headaches",
        category: "neurological",
        severity_weight: 3,
    },
    CatalogEntry {
        name: "Vision changes",
        description: "Blurred vision, spots, or flashes",
        category: "neurological",
        severity_weight: 4,
    },
    CatalogEntry {
        name: "Swelling in hands/face",
        description: "Sudden or severe swelling",
        category: "circulatory",
        severity_weight: 3,
    },
    CatalogEntry {
        name: "Abdominal pain",
        description: "Upper abdominal or stomach pain",
        category: "gastrointestinal",
        severity_weight: 4,
    },
    CatalogEntry {
        name: "Decreased fetal movement",
        description: "Noticeable reduction in baby's movements",
        category: "fetal",
        severity_weight: 5,
    },
    CatalogEntry {
        name: "Nausea and vomiting",
        description: "Persistent nausea or vomiting",
        category: "gastrointestinal",
        severity_weight: 2,
    },
    CatalogEntry {
        name: "Vaginal bleeding",
        description: "Any amount of vaginal bleeding",
        category: "reproductive",
        severity_weight: 5,
    },
    CatalogEntry {
        name: "Severe back pain",
        description: "Intense lower back pain",
        category: "musculoskeletal",
        severity_weight: 2,
    },
    CatalogEntry {
        name: "Difficulty breathing",
        description: "Shortness of breath or breathing difficulties",
        category: "respiratory",
        severity_weight: 4,
    },
    CatalogEntry {
        name: "Chest pain",
        description: "Pain or pressure in chest",
        category: "cardiovascular",
        severity_weight: 5,
    },
];

static CATALOG: LazyLock<Vec<Symptom>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .zip(1u32..)
        .map(|(entry, id)| Symptom {
            id,
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            category: entry.category.to_string(),
            severity_weight: entry.severity_weight,
        })
        .collect()
});

/// Static symptom catalog. Ids are assigned sequentially from 1 in declaration order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymptomCatalog;

impl SymptomCatalog {
    pub fn all(&self) -> &'static [Symptom] {
        CATALOG.as_slice()
    }

    /// Case-insensitive category filter.
    pub fn by_category(&self, category: &str) -> Vec<&'static Symptom> {
        let category = category.trim();
        CATALOG
            .iter()
            .filter(|s| s.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn find(&self, id: u32) -> Option<&'static Symptom> {
        CATALOG.iter().find(|s| s.id == id)
    }
}
