//! Engine category names to LSP completion-kind integers.

/// Total over every category string: anything outside the table is
/// kind 1 (Text), matching what clients expect for uncategorized matches.
pub fn completion_kind(category: &str) -> u32 {
    match category {
        "module" => 9,
        "class" => 7,
        "instance" => 6,
        "function" => 3,
        "param" => 6,
        "path" => 17,
        "keyword" => 14,
        "property" => 10,
        "method" => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_maps_exactly() {
        let table = [
            ("module", 9),
            ("class", 7),
            ("instance", 6),
            ("function", 3),
            ("param", 6),
            ("path", 17),
            ("keyword", 14),
            ("property", 10),
            ("method", 2),
        ];
        for (category, kind) in table {
            assert_eq!(completion_kind(category), kind, "category {category}");
        }
    }

    #[test]
    fn unmapped_categories_default_to_text() {
        for category in ["statement", "namespace", "Module", "", "funcdef"] {
            assert_eq!(completion_kind(category), 1, "category {category:?}");
        }
    }
}
