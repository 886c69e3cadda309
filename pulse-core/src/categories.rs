/// Categories offered on the Browse tab, in display order.
pub const BROWSE_CATEGORIES: [&str; 9] = [
    "Corporate/Industry Events",
    "Ideas Festivals",
    "Political Events",
    "Social Events",
    "Lifestyle Expos",
    "Cultural Events",
    "Galas and Awards",
    "Education and Training Workshops",
    "Listening and Community Events",
];

const QUERY_TERMS: [(&str, &str); 9] = [
    ("Corporate/Industry Events", "Conference"),
    ("Ideas Festivals", "Ideas"),
    ("Political Events", "Politics"),
    ("Social Events", "Social"),
    ("Lifestyle Expos", "Expo"),
    ("Cultural Events", "Festival"),
    ("Galas and Awards", "Awards"),
    ("Education and Training Workshops", "Workshop"),
    ("Listening and Community Events", "Community"),
];

/// Topics behind the Trending tab. Not user-selectable.
pub const DEFAULT_TRENDING_TOPICS: [&str; 6] = [
    "technology",
    "business",
    "sports",
    "health",
    "science",
    "entertainment",
];

/// Search term sent to the news API for a category label.
/// Unknown labels are used verbatim.
pub fn query_term(label: &str) -> &str {
    QUERY_TERMS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, term)| *term)
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_short_terms() {
        assert_eq!(query_term("Galas and Awards"), "Awards");
        assert_eq!(query_term("Political Events"), "Politics");
        assert_eq!(query_term("Cultural Events"), "Festival");
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(query_term("Space Launches"), "Space Launches");
        assert_eq!(query_term(""), "");
    }

    #[test]
    fn every_browse_category_has_a_term() {
        for label in BROWSE_CATEGORIES {
            assert_ne!(query_term(label), label, "{label} is unmapped");
        }
    }
}
