//! Elements and resistance tables.

use std::collections::HashMap;

/// Skill element for resistance lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// Element-less; resistance tables are never consulted.
    None,
    Fire,
    Ice,
    Lightning,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

/// Per-element damage multipliers carried by a combatant.
///
/// Entries above 1.0 are weaknesses, entries in `(0, 1)` resistances, and
/// exactly 0.0 immunity. Elements without an entry land at 1.0.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistanceTable {
    entries: HashMap<Element, f64>,
}

impl ResistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, element: Element, multiplier: f64) {
        self.entries.insert(element, multiplier);
    }

    pub fn with(mut self, element: Element, multiplier: f64) -> Self {
        self.set(element, multiplier);
        self
    }

    pub fn get(&self, element: Element) -> Option<f64> {
        self.entries.get(&element).copied()
    }
}

/// Look up the damage multiplier for an element against a resistance table.
///
/// The `None` element always resolves to 1.0; so does a missing table
/// (`table` is `None`) or a table without an entry for the element. A
/// present entry is returned verbatim, including 0.0 for immunity.
pub fn elemental_modifier(element: Element, table: Option<&ResistanceTable>) -> f64 {
    if element == Element::None {
        return 1.0;
    }
    table
        .and_then(|t| t.get(element))
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_element_ignores_table() {
        let table = ResistanceTable::new().with(Element::None, 3.0);
        assert_eq!(elemental_modifier(Element::None, Some(&table)), 1.0);
    }

    #[test]
    fn missing_table_defaults_to_one() {
        assert_eq!(elemental_modifier(Element::Fire, None), 1.0);
    }

    #[test]
    fn entry_returned_verbatim() {
        let table = ResistanceTable::new()
            .with(Element::Fire, 2.0)
            .with(Element::Ice, 0.5)
            .with(Element::Dark, 0.0);
        assert_eq!(elemental_modifier(Element::Fire, Some(&table)), 2.0);
        assert_eq!(elemental_modifier(Element::Ice, Some(&table)), 0.5);
        assert_eq!(elemental_modifier(Element::Dark, Some(&table)), 0.0);
        // No entry: neutral.
        assert_eq!(elemental_modifier(Element::Wind, Some(&table)), 1.0);
    }
}
