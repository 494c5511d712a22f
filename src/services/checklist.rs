// src/services/checklist.rs

use crate::models::cleaning::ChecklistArea;

// Fixed per-area task templates. Every new assignment is seeded with one
// checklist item per task, in this order.
pub const AREAS: [ChecklistArea; 3] = [
    ChecklistArea::LivingArea,
    ChecklistArea::Bathroom,
    ChecklistArea::Bedroom,
];

pub fn tasks_for(area: ChecklistArea) -> &'static [&'static str] {
    match area {
        ChecklistArea::LivingArea => &[
            "Dust all surfaces",
            "Vacuum or mop floors",
            "Clean windows and mirrors",
            "Empty trash bins",
            "Organize furniture",
            "Clean light fixtures",
        ],
        ChecklistArea::Bathroom => &[
            "Clean toilet",
            "Clean sink and counter",
            "Clean shower/bathtub",
            "Clean mirrors",
            "Mop floor",
            "Empty trash",
            "Restock supplies",
        ],
        ChecklistArea::Bedroom => &[
            "Change bed linens",
            "Dust furniture",
            "Vacuum or mop floors",
            "Organize items",
            "Empty trash",
            "Clean mirrors",
        ],
    }
}

/// All template entries, area by area.
pub fn template() -> impl Iterator<Item = (ChecklistArea, &'static str)> {
    AREAS
        .into_iter()
        .flat_map(|area| tasks_for(area).iter().map(move |task| (area, *task)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_has_expected_counts_per_area() {
        assert_eq!(tasks_for(ChecklistArea::LivingArea).len(), 6);
        assert_eq!(tasks_for(ChecklistArea::Bathroom).len(), 7);
        assert_eq!(tasks_for(ChecklistArea::Bedroom).len(), 6);
    }

    #[test]
    fn template_seeds_nineteen_items() {
        assert_eq!(template().count(), 19);
    }

    #[test]
    fn template_yields_areas_in_declared_order() {
        let areas: Vec<ChecklistArea> = template().map(|(area, _)| area).collect();
        let first_bathroom = areas
            .iter()
            .position(|a| *a == ChecklistArea::Bathroom)
            .unwrap();
        let first_bedroom = areas
            .iter()
            .position(|a| *a == ChecklistArea::Bedroom)
            .unwrap();
        assert_eq!(first_bathroom, 6);
        assert_eq!(first_bedroom, 13);
    }
}
