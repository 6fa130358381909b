//! Static demo catalog.
//!
//! Shown whenever there is no session, the service returns no indicators, or
//! a fetch fails. Results and Compare both resolve against this one table.

use crate::models::{Component, Indicator, Level, Method, Priority};

fn method(id: i64, name: &str, cost: Level, accuracy: Level, ease: Level) -> Method {
    Method {
        id,
        name: name.to_string(),
        cost,
        accuracy,
        ease,
    }
}

/// The four demo indicators, in display order.
pub fn fallback_indicators() -> Vec<Indicator> {
    use Level::{High, Low, Medium};

    vec![
        Indicator {
            id: 47,
            name: "Species Diversity Index".to_string(),
            component: Component::Biotic,
            class: "Biodiversity".to_string(),
            cost: Medium,
            accuracy: High,
            ease: Medium,
            principle: "Principle 2".to_string(),
            criterion: "Criterion 2.1".to_string(),
            priority: Priority::Primary,
            definition: "Measures the variety and abundance of species in a given area, \
                providing insights into ecosystem health and biodiversity."
                .to_string(),
            methods: vec![
                method(1, "Random Walks", Low, Medium, High),
                method(2, "Transect Sampling", Medium, High, Medium),
                method(3, "Camera Traps", High, High, Low),
            ],
        },
        Indicator {
            id: 89,
            name: "Soil Organic Carbon".to_string(),
            component: Component::Abiotic,
            class: "Soil Carbon".to_string(),
            cost: Low,
            accuracy: Medium,
            ease: High,
            principle: "Principle 1".to_string(),
            criterion: "Criterion 1.2".to_string(),
            priority: Priority::Primary,
            definition: "Quantifies the amount of carbon stored in soil, a key indicator of \
                soil health and carbon sequestration potential."
                .to_string(),
            methods: vec![
                method(4, "Walkley-Black Method", Low, Medium, High),
                method(5, "Loss on Ignition", Low, Low, High),
                method(6, "Dry Combustion", High, High, Medium),
            ],
        },
        Indicator {
            id: 12,
            name: "Water Quality Index".to_string(),
            component: Component::Abiotic,
            class: "Water".to_string(),
            cost: High,
            accuracy: High,
            ease: Low,
            principle: "Principle 3".to_string(),
            criterion: "Criterion 3.1".to_string(),
            priority: Priority::Secondary,
            definition: "Composite measure of water quality based on multiple parameters \
                including pH, dissolved oxygen, and contaminants."
                .to_string(),
            methods: vec![
                method(7, "Field Test Kits", Medium, Medium, High),
                method(8, "Laboratory Analysis", High, High, Low),
            ],
        },
        Indicator {
            id: 34,
            name: "Crop Yield per Hectare".to_string(),
            component: Component::Socioeconomic,
            class: "Productivity".to_string(),
            cost: Low,
            accuracy: High,
            ease: High,
            principle: "Principle 5".to_string(),
            criterion: "Criterion 5.2".to_string(),
            priority: Priority::Primary,
            definition: "Measures agricultural productivity by quantifying crop output per \
                unit area, essential for economic viability assessment."
                .to_string(),
            methods: vec![
                method(9, "Harvest Weighing", Low, High, High),
                method(10, "Crop Cutting", Low, High, Medium),
            ],
        },
    ]
}

/// Look up one demo indicator by ID.
pub fn fallback_by_id(id: i64) -> Option<Indicator> {
    fallback_indicators().into_iter().find(|i| i.id == id)
}
