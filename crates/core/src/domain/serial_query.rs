// Serial-number search query

/// Queries of exactly this many ASCII digits match as a serial suffix
pub const SUFFIX_QUERY_LEN: usize = 5;

/// Matching rule derived from a raw, operator-entered query.
///
/// Matching is case-sensitive and never treats query characters as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SerialQuery {
    /// Blank query: no serial filter
    #[default]
    Any,
    /// Serial must end with these digits
    Suffix(String),
    /// Serial must contain this text
    Contains(String),
}

impl SerialQuery {
    pub fn parse(raw: &str) -> Self {
        let q = raw.trim();
        if q.is_empty() {
            SerialQuery::Any
        } else if q.len() == SUFFIX_QUERY_LEN && q.bytes().all(|b| b.is_ascii_digit()) {
            SerialQuery::Suffix(q.to_string())
        } else {
            SerialQuery::Contains(q.to_string())
        }
    }

    pub fn matches(&self, serial_number: &str) -> bool {
        match self {
            SerialQuery::Any => true,
            SerialQuery::Suffix(tail) => serial_number.ends_with(tail.as_str()),
            SerialQuery::Contains(part) => serial_number.contains(part.as_str()),
        }
    }
}
