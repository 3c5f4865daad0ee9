use eframe::egui::{Color32, Stroke};

use crate::knowledge::ConceptType;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
pub(super) const EDGE_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_rgb(51, 65, 85),
};
pub(super) const NODE_OUTLINE: Stroke = Stroke {
    width: 2.0,
    color: Color32::WHITE,
};
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(226, 232, 240);
pub(super) const LABEL_FONT_SIZE: f32 = 11.0;
pub(super) const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(100, 116, 139);

const MIN_RADIUS: f32 = 8.0;
const MAX_RADIUS: f32 = 20.0;

pub(super) fn node_radius(mention_count: u32) -> f32 {
    (MIN_RADIUS + 2.0 * mention_count as f32).min(MAX_RADIUS)
}

pub(super) fn type_color(concept_type: &ConceptType) -> Color32 {
    match concept_type {
        ConceptType::Person => Color32::from_rgb(239, 68, 68),
        ConceptType::Organization => Color32::from_rgb(249, 115, 22),
        ConceptType::Technology => Color32::from_rgb(34, 197, 94),
        ConceptType::Concept => Color32::from_rgb(59, 130, 246),
        ConceptType::Event => Color32::from_rgb(168, 85, 247),
        ConceptType::Place => Color32::from_rgb(6, 182, 212),
        ConceptType::Product => Color32::from_rgb(236, 72, 153),
        ConceptType::Method => Color32::from_rgb(132, 204, 22),
        ConceptType::Other(_) => DEFAULT_NODE_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn radius_grows_then_caps() {
        assert_eq!(node_radius(0), 8.0);
        assert_eq!(node_radius(1), 10.0);
        assert_eq!(node_radius(5), 18.0);
        assert_eq!(node_radius(6), 20.0);
        assert_eq!(node_radius(250), 20.0);
    }

    #[test]
    fn known_types_have_distinct_colors() {
        let colors = ConceptType::KNOWN.iter().map(type_color).collect::<Vec<_>>();
        for (index, color) in colors.iter().enumerate() {
            assert_ne!(*color, DEFAULT_NODE_COLOR);
            assert!(!colors[index + 1..].contains(color));
        }
        assert_eq!(
            type_color(&ConceptType::Other("idea".to_owned())),
            DEFAULT_NODE_COLOR
        );
    }

    proptest! {
        #[test]
        fn radius_always_within_range(mentions in any::<u32>()) {
            let radius = node_radius(mentions);
            prop_assert!((8.0..=20.0).contains(&radius));
            prop_assert_eq!(radius, (8.0 + 2.0 * mentions as f32).min(20.0));
        }
    }
}
