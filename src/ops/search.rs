use regex::Regex;

use crate::model::Item;

/// Lowercased, trimmed form of a search query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `text` contains an already-normalized query. Empty matches all.
pub fn matches(text: &str, normalized: &str) -> bool {
    normalized.is_empty() || text.to_lowercase().contains(normalized)
}

/// Items whose text contains `query`, in store order
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let q = normalize_query(query);
    items.iter().filter(|i| matches(&i.text, &q)).collect()
}

/// Case-insensitive literal regex for highlighting query hits in rendered text
pub fn highlight_regex(query: &str) -> Option<Regex> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(q))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Item> {
        vec![Item::new(1, "a"), Item::new(2, "b"), Item::new(3, "c")]
    }

    #[test]
    fn query_is_trimmed_and_lowercased() {
        assert_eq!(normalize_query("  MiLk "), "milk");
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        assert!(matches("Buy MILK today", "milk"));
        assert!(!matches("Buy bread", "milk"));
        assert!(matches("anything", ""));
    }

    #[test]
    fn filter_keeps_order() {
        let items = items();
        let hits: Vec<u64> = filter_items(&items, "B").iter().map(|i| i.id).collect();
        assert_eq!(hits, vec![2]);
        assert_eq!(filter_items(&items, "  ").len(), 3);
    }

    #[test]
    fn highlight_treats_query_literally() {
        let re = highlight_regex("a.b").unwrap();
        assert!(re.is_match("xA.Bx"));
        assert!(!re.is_match("axb"));
        assert!(highlight_regex(" ").is_none());
    }
}
