//! Statement skeletons with named slots.
//!
//! A skeleton such as `:query FETCH FIRST :limit ROWS ONLY` is split once into
//! literal text and slots. Rendering copies literals and slot values side by
//! side, so a value that happens to contain `:order` is never substituted a
//! second time.

use smol_str::SmolStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Query,
    Order,
    Offset,
    Limit,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Query, Slot::Order, Slot::Offset, Slot::Limit];

    pub fn marker(self) -> &'static str {
        match self {
            Slot::Query => "query",
            Slot::Order => "order",
            Slot::Offset => "offset",
            Slot::Limit => "limit",
        }
    }

    fn from_marker(word: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.marker() == word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(SmolStr),
    Slot(Slot),
}

/// Values for the slots of one rendering, missing slots render empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotValues<'a> {
    pub query: &'a str,
    pub order: &'a str,
    pub offset: &'a str,
    pub limit: &'a str,
}

impl<'a> SlotValues<'a> {
    fn get(&self, slot: Slot) -> &'a str {
        match slot {
            Slot::Query => self.query,
            Slot::Order => self.order,
            Slot::Offset => self.offset,
            Slot::Limit => self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a skeleton. A `:word` is a slot only when the word names one of
    /// the [`Slot`]s, anything else (`:qp0`) stays literal. Each slot may
    /// appear at most once.
    pub fn parse(skeleton: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut seen = Vec::new();
        let mut text_start = 0;
        let bytes = skeleton.as_bytes();
        let mut index = 0;

        while index < bytes.len() {
            if bytes[index] != b':' {
                index += 1;
                continue;
            }
            let word_start = index + 1;
            let word_end = bytes[word_start..]
                .iter()
                .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
                .map_or(bytes.len(), |offset| word_start + offset);
            let Some(slot) = Slot::from_marker(&skeleton[word_start..word_end]) else {
                index = word_end.max(word_start);
                continue;
            };
            if seen.contains(&slot) {
                return Err(Error::Template(format!(
                    "slot :{} appears more than once in {skeleton:?}",
                    slot.marker()
                )));
            }
            seen.push(slot);
            if text_start < index {
                segments.push(Segment::Text(SmolStr::new(&skeleton[text_start..index])));
            }
            segments.push(Segment::Slot(slot));
            text_start = word_end;
            index = word_end;
        }

        if text_start < skeleton.len() {
            segments.push(Segment::Text(SmolStr::new(&skeleton[text_start..])));
        }

        Ok(Self { segments })
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.segments.contains(&Segment::Slot(slot))
    }

    pub fn render(&self, values: &SlotValues<'_>) -> String {
        let capacity = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.len(),
                Segment::Slot(slot) => values.get(*slot).len(),
            })
            .sum();
        let mut out = String::with_capacity(capacity);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(values.get(*slot)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_slots() {
        let template = Template::parse(":query FETCH FIRST :limit ROWS ONLY").unwrap();
        assert!(template.has_slot(Slot::Query));
        assert!(template.has_slot(Slot::Limit));
        assert!(!template.has_slot(Slot::Order));
        let sql = template.render(&SlotValues {
            query: "SELECT * FROM \"t\"",
            limit: "10",
            ..Default::default()
        });
        assert_eq!("SELECT * FROM \"t\" FETCH FIRST 10 ROWS ONLY", sql);
    }

    #[test]
    fn test_adjacent_slots() {
        let template = Template::parse("WHERE :offset:limit").unwrap();
        let sql = template.render(&SlotValues {
            offset: "RN_ > 5",
            limit: " AND RN_ <= 15",
            ..Default::default()
        });
        assert_eq!("WHERE RN_ > 5 AND RN_ <= 15", sql);
    }

    #[test]
    fn test_unknown_markers_stay_literal() {
        let template = Template::parse("x = :qp0 AND :queryx = :query").unwrap();
        let sql = template.render(&SlotValues {
            query: "1",
            ..Default::default()
        });
        assert_eq!("x = :qp0 AND :queryx = 1", sql);
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = Template::parse("(:query) OVER(:order)").unwrap();
        let sql = template.render(&SlotValues {
            query: "SELECT ':order' FROM \"t\" WHERE \"c\" = :limit",
            order: "ORDER BY \"id\" ASC",
            limit: "99",
            ..Default::default()
        });
        assert_eq!(
            "(SELECT ':order' FROM \"t\" WHERE \"c\" = :limit) OVER(ORDER BY \"id\" ASC)",
            sql
        );
    }

    #[test]
    fn test_duplicate_slot_is_rejected() {
        let err = Template::parse(":query UNION :query").unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }
}
