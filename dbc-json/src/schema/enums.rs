//! Enumeration extraction from signal value tables

use super::EnumEntry;
use crate::signals::ValueTable;

/// Convert a value table into `{name, value}` entries
///
/// Source order and duplicates are kept. A missing table gives an empty list.
pub fn extract_enums(table: Option<&ValueTable>) -> Vec<EnumEntry> {
    table
        .map(|table| {
            table
                .iter()
                .map(|(raw, label)| EnumEntry {
                    name: label.to_string(),
                    value: raw,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_table() {
        assert!(extract_enums(None).is_empty());
        assert!(extract_enums(Some(&ValueTable::new())).is_empty());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let table: ValueTable = vec![
            (3, "Sport".to_string()),
            (0, "Eco".to_string()),
            (3, "Sport".to_string()),
            (-1, "Invalid".to_string()),
        ]
        .into_iter()
        .collect();

        let enums = extract_enums(Some(&table));
        assert_eq!(enums.len(), table.len());
        assert_eq!(
            enums,
            vec![
                EnumEntry { name: "Sport".to_string(), value: 3 },
                EnumEntry { name: "Eco".to_string(), value: 0 },
                EnumEntry { name: "Sport".to_string(), value: 3 },
                EnumEntry { name: "Invalid".to_string(), value: -1 },
            ]
        );
    }
}
