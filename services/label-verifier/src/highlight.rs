//! Maps the literal tokens a check matched back to OCR word boxes so the
//! caller can highlight them on the label image.

use shared::dto::{BoundingBox, FieldCheckResult, WordBoxes};

fn lookup<'a>(token: &str, word_boxes: &'a WordBoxes) -> Option<&'a [BoundingBox]> {
    let lower = token.to_lowercase();
    if let Some(entry) = word_boxes.get(&lower) {
        return Some(entry.boxes());
    }
    let bare = lower.trim_matches(|c: char| !c.is_alphanumeric() && c != '%');
    word_boxes.get(bare).map(|e| e.boxes())
}

/// Boxes of every token of `found` that OCR reported a position for.
pub fn boxes_for(found: &str, word_boxes: &WordBoxes) -> Vec<BoundingBox> {
    found
        .split_whitespace()
        .filter_map(|t| lookup(t, word_boxes))
        .flatten()
        .copied()
        .collect()
}

pub fn attach(check: &mut FieldCheckResult, word_boxes: &WordBoxes) {
    let Some(found) = check.found_value.as_deref() else {
        return;
    };
    let boxes = boxes_for(found, word_boxes);
    if !boxes.is_empty() {
        check.bounding_boxes = Some(boxes);
    }
}
