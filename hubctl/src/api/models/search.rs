//! In-memory search filtering for the list endpoints.
//!
//! The admin UI's search box filters the already-fetched collection with a
//! linear case-insensitive substring scan; this module is that scan.

/// Records filterable by [`filter_by_search`].
pub trait Searchable {
    /// The fields scanned for the search term.
    fn search_fields(&self) -> [Option<&str>; 2];
}

/// Retain the records whose searchable fields contain `query`
/// case-insensitively. An absent or empty query returns the collection
/// unchanged.
pub fn filter_by_search<T: Searchable>(records: Vec<T>, query: Option<&str>) -> Vec<T> {
    let Some(query) = query else {
        return records;
    };
    if query.is_empty() {
        return records;
    }

    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        title: String,
        description: Option<String>,
    }

    impl Record {
        fn new(title: &str, description: Option<&str>) -> Self {
            Self {
                title: title.to_string(),
                description: description.map(|s| s.to_string()),
            }
        }
    }

    impl Searchable for Record {
        fn search_fields(&self) -> [Option<&str>; 2] {
            [Some(&self.title), self.description.as_deref()]
        }
    }

    fn fixtures() -> Vec<Record> {
        vec![
            Record::new("Summer Picnic", Some("Annual gathering in the park")),
            Record::new("Board Meeting", Some("Quarterly review")),
            Record::new("picnic cleanup", None),
            Record::new("Winter Gala", Some("Includes a PICNIC-themed raffle")),
        ]
    }

    #[test]
    fn retains_exactly_the_matching_subset() {
        let filtered = filter_by_search(fixtures(), Some("picnic"));
        let titles: Vec<&str> = filtered.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Summer Picnic", "picnic cleanup", "Winter Gala"]);
    }

    #[test]
    fn matches_case_insensitively_in_either_field() {
        let filtered = filter_by_search(fixtures(), Some("QUARTERLY"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Board Meeting");
    }

    #[test]
    fn empty_query_returns_the_full_set_unchanged() {
        let original_titles: Vec<String> = fixtures().iter().map(|r| r.title.clone()).collect();
        let filtered = filter_by_search(fixtures(), Some(""));
        let titles: Vec<String> = filtered.iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, original_titles);
    }

    #[test]
    fn absent_query_returns_the_full_set_unchanged() {
        assert_eq!(filter_by_search(fixtures(), None).len(), 4);
    }

    #[test]
    fn no_match_yields_an_empty_set() {
        assert!(filter_by_search(fixtures(), Some("hackathon")).is_empty());
    }
}
