use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::JsonSchema;

/// History keeps only the most recent entries; the oldest are evicted first.
pub const HISTORY_CAP: usize = 100;

/// A pointer into one of the content collections. `item_id` is an opaque
/// string, not a typed foreign key; the target may have been deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct TaggedRef {
    pub item_type: String,
    pub item_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryEntry {
    pub item_type: String,
    pub item_id: String,
    pub viewed_at: DateTime,
}

/// Which collection a tagged reference dispatches to. Anything that is not
/// a hotel or package tag (including the literal "explore") is looked up in
/// the locations collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Hotel,
    Package,
    Explore,
}

impl RefKind {
    pub fn from_tag(tag: &str) -> RefKind {
        match tag {
            "hotel" => RefKind::Hotel,
            "package" => RefKind::Package,
            _ => RefKind::Explore,
        }
    }
}

/// Appends a view event and evicts from the front once the cap is exceeded.
/// Repeat views of the same item each produce a new entry.
pub fn push_history(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.push(entry);
    if history.len() > HISTORY_CAP {
        let overflow = history.len() - HISTORY_CAP;
        history.drain(..overflow);
    }
}

/// Inserts the reference unless an entry with the same `item_id` already
/// exists. Uniqueness is keyed on `item_id` alone; ids are opaque strings
/// from separate collections, so cross-type collisions are accepted.
/// Returns true if the list changed.
pub fn add_to_wishlist(wishlist: &mut Vec<TaggedRef>, item: TaggedRef) -> bool {
    if wishlist.iter().any(|r| r.item_id == item.item_id) {
        return false;
    }
    wishlist.push(item);
    true
}

/// Removes every entry matching `item_id`, regardless of type. Removing an
/// absent id is a no-op. Returns true if the list changed.
pub fn remove_from_wishlist(wishlist: &mut Vec<TaggedRef>, item_id: &str) -> bool {
    let before = wishlist.len();
    wishlist.retain(|r| r.item_id != item_id);
    wishlist.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            item_type: "hotel".to_string(),
            item_id: id.to_string(),
            viewed_at: DateTime::now(),
        }
    }

    fn tagged(kind: &str, id: &str) -> TaggedRef {
        TaggedRef {
            item_type: kind.to_string(),
            item_id: id.to_string(),
        }
    }

    #[test]
    fn history_allows_repeat_views() {
        let mut history = Vec::new();
        push_history(&mut history, entry("a"));
        push_history(&mut history, entry("a"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn history_evicts_oldest_beyond_cap() {
        let mut history = Vec::new();
        for i in 0..120 {
            push_history(&mut history, entry(&format!("item-{}", i)));
        }
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].item_id, "item-20");
        assert_eq!(history[HISTORY_CAP - 1].item_id, "item-119");
    }

    #[test]
    fn wishlist_add_is_idempotent_per_item_id() {
        let mut wishlist = Vec::new();
        assert!(add_to_wishlist(&mut wishlist, tagged("hotel", "h1")));
        assert!(!add_to_wishlist(&mut wishlist, tagged("hotel", "h1")));
        // same id under a different type still collides
        assert!(!add_to_wishlist(&mut wishlist, tagged("package", "h1")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn wishlist_remove_absent_is_noop() {
        let mut wishlist = vec![tagged("hotel", "h1")];
        assert!(!remove_from_wishlist(&mut wishlist, "missing"));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn wishlist_remove_drops_all_matching_ids() {
        let mut wishlist = vec![
            tagged("hotel", "shared"),
            tagged("package", "shared"),
            tagged("explore", "keep"),
        ];
        assert!(remove_from_wishlist(&mut wishlist, "shared"));
        assert_eq!(wishlist, vec![tagged("explore", "keep")]);
    }

    #[test]
    fn unknown_tags_dispatch_to_explore() {
        assert_eq!(RefKind::from_tag("hotel"), RefKind::Hotel);
        assert_eq!(RefKind::from_tag("package"), RefKind::Package);
        assert_eq!(RefKind::from_tag("explore"), RefKind::Explore);
        assert_eq!(RefKind::from_tag("waterfall"), RefKind::Explore);
        assert_eq!(RefKind::from_tag(""), RefKind::Explore);
    }
}
