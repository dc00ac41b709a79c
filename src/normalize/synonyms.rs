//! Closed vocabularies for the categorical survey fields.
//!
//! Every table is keyed by the "low string" form of a cell (lowercase, letters
//! only). What happens to a key that is not in the table is decided by the
//! recoder that owns the table, not here.

/// Sex code written to the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "m",
            Sex::Female => "f",
            Sex::Unknown => "unknown",
        }
    }
}

/// Result of a name lookup: either a canonical spelling or an explicit
/// "no value" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    Name(&'static str),
    Missing,
}

/// A group of synonym keys mapping onto one outcome.
pub struct SynonymTable<T: 'static> {
    entries: &'static [(&'static [&'static str], T)],
}

impl<T: Copy> SynonymTable<T> {
    pub const fn new(entries: &'static [(&'static [&'static str], T)]) -> Self {
        Self { entries }
    }

    /// Returns the outcome for an already-normalized key.
    pub fn lookup(&self, key: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(keys, _)| keys.contains(&key))
            .map(|(_, outcome)| *outcome)
    }
}

pub const OTHER: &str = "Other";
pub const NW_POND_TURTLE: &str = "NW Pond Turtle";
pub const WESTERN_PAINTED_TURTLE: &str = "Western Painted Turtle";

pub static SEX: SynonymTable<Sex> = SynonymTable::<Sex>::new(&[
    (&["male", "m"], Sex::Male),
    (&["female", "f"], Sex::Female),
]);

pub static GRAVID: SynonymTable<bool> = SynonymTable::<bool>::new(&[(&["yes", "y"], true)]);

pub static COMMON_NAME: SynonymTable<Canonical> = SynonymTable::<Canonical>::new(&[
    (
        &["westernpaintedturtle"],
        Canonical::Name(WESTERN_PAINTED_TURTLE),
    ),
    (&["unknown"], Canonical::Name("Unknown")),
    (&["nwpondturtle"], Canonical::Name(NW_POND_TURTLE)),
    (
        &["sliders", "redearedslider"],
        Canonical::Name("Red-eared Slider"),
    ),
    (
        &["commonsnappingturtle"],
        Canonical::Name("Common Snapping Turtle"),
    ),
    (&["none"], Canonical::Missing),
    (
        &[
            "pondandboxturtles",
            "boxturtle",
            "russiantortoise",
            "floridaboxturtle",
            "turtlesandtortoises",
            "floridasoftshellturtle",
        ],
        Canonical::Name(OTHER),
    ),
]);

pub static SCIENTIFIC: SynonymTable<Canonical> = SynonymTable::<Canonical>::new(&[
    (
        &[
            "emydidae",
            "terrapene",
            "floridaboxturtle",
            "testudines",
            "russiantortoise",
            "apaloneferox",
        ],
        Canonical::Name(OTHER),
    ),
    (&["none"], Canonical::Missing),
    (
        &["trachemys", "trachemysscriptaelegans"],
        Canonical::Name("Trachemys scripta elegans"),
    ),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hits_any_synonym_in_group() {
        assert_eq!(COMMON_NAME.lookup("sliders"), Some(Canonical::Name("Red-eared Slider")));
        assert_eq!(
            COMMON_NAME.lookup("redearedslider"),
            Some(Canonical::Name("Red-eared Slider"))
        );
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        assert_eq!(SEX.lookup("juvenile"), None);
        assert_eq!(GRAVID.lookup("no"), None);
    }

    #[test]
    fn test_missing_is_distinct_from_other() {
        assert_eq!(SCIENTIFIC.lookup("none"), Some(Canonical::Missing));
        assert_eq!(SCIENTIFIC.lookup("terrapene"), Some(Canonical::Name(OTHER)));
    }
}
