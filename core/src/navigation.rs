//! Keyboard navigation over the loaded result list.

use crate::models::ImageRecord;

/// What a key press means while the detail modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    Close,
}

impl KeyCommand {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" => Some(KeyCommand::Next),
            "ArrowLeft" | "Left" => Some(KeyCommand::Previous),
            "Escape" | "Esc" => Some(KeyCommand::Close),
            _ => None,
        }
    }
}

/// Position of `id` in `records`.
pub fn position_of(records: &[ImageRecord], id: &str) -> Option<usize> {
    records.iter().position(|record| record.id == id)
}

/// Neighbour of `current_id` in the given direction.
///
/// `None` at either end of the list, and when the current record is not in
/// the list at all (e.g. it was opened from the related panel).
pub fn adjacent<'a>(
    records: &'a [ImageRecord],
    current_id: &str,
    command: KeyCommand,
) -> Option<&'a ImageRecord> {
    let index = position_of(records, current_id)?;
    let target = match command {
        KeyCommand::Next => index.checked_add(1)?,
        KeyCommand::Previous => index.checked_sub(1)?,
        KeyCommand::Close => return None,
    };
    records.get(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "_id": format!("img-{}", i),
                    "url": format!("/static/images/{}.jpg", i)
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyCommand::from_key("ArrowRight"), Some(KeyCommand::Next));
        assert_eq!(KeyCommand::from_key("ArrowLeft"), Some(KeyCommand::Previous));
        assert_eq!(KeyCommand::from_key("Escape"), Some(KeyCommand::Close));
        assert_eq!(KeyCommand::from_key("Enter"), None);
    }

    #[test]
    fn test_two_steps_right_from_index_two() {
        let records = list(10);
        let step1 = adjacent(&records, "img-2", KeyCommand::Next).unwrap();
        let step2 = adjacent(&records, &step1.id, KeyCommand::Next).unwrap();
        assert_eq!(position_of(&records, &step2.id), Some(4));
    }

    #[test]
    fn test_edges_are_no_ops() {
        let records = list(10);
        assert!(adjacent(&records, "img-0", KeyCommand::Previous).is_none());
        assert!(adjacent(&records, "img-9", KeyCommand::Next).is_none());
        assert_eq!(adjacent(&records, "img-9", KeyCommand::Previous).unwrap().id, "img-8");
    }

    #[test]
    fn test_record_outside_list() {
        let records = list(3);
        assert!(adjacent(&records, "related-1", KeyCommand::Next).is_none());
        assert!(adjacent(&[], "img-0", KeyCommand::Next).is_none());
    }
}
