//! Affinity resolution between attendees
//!
//! Decides whether two free-text group preferences denote the same intended
//! seating cluster and derives each person's friend list from that.
//!
//! Similarity is the indel ratio of the two texts: twice the length of their
//! longest common subsequence over the sum of their lengths, counted in
//! characters. It is scaled to 0-100 and rounded half to even. Two texts match
//! when the score strictly exceeds the configured threshold (default 87).
//!
//! Absent and blank groups are compared as-is: two people who stated no
//! preference score 100 against each other and end up clustered together.
//! This is logged, not corrected.

use sitsit_common::{AffinityConfig, Error, Person, Result};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Fuzzy matcher for group preference texts
#[derive(Debug, Clone, Copy)]
pub struct AffinityResolver {
    /// Minimum percentage similarity required (score must exceed it)
    threshold: u8,
}

impl Default for AffinityResolver {
    fn default() -> Self {
        Self::new(AffinityConfig::default())
    }
}

impl AffinityResolver {
    pub fn new(config: AffinityConfig) -> Self {
        Self {
            threshold: config.threshold,
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Similarity of two texts as a rounded percentage (0-100)
    ///
    /// Symmetric in its arguments. Identical texts, including two empty
    /// ones, score 100. A text against the empty text scores 0.
    pub fn score(&self, text1: &str, text2: &str) -> u8 {
        if text1 == text2 {
            return 100;
        }

        let chars1: Vec<char> = text1.chars().collect();
        let chars2: Vec<char> = text2.chars().collect();
        let common = common_subsequence_len(&chars1, &chars2);
        rounded_percent(2 * common, chars1.len() + chars2.len())
    }

    /// True when the two texts are similar enough to be the same group
    pub fn similar(&self, text1: &str, text2: &str) -> bool {
        self.score(text1, text2) > self.threshold
    }

    /// Every other person whose group is similar to `person`'s group
    ///
    /// Identity is matched on name, so `person` itself is never included.
    /// Order follows `people`.
    pub fn common_friends(&self, person: &Person, people: &[Person]) -> Result<Vec<Person>> {
        validate_name(person)?;

        let friends: Vec<Person> = people
            .iter()
            .filter(|p| p.name != person.name)
            .filter(|p| self.similar(person.group_text(), p.group_text()))
            .cloned()
            .collect();

        Ok(friends)
    }

    /// Friend list for every person, in input order
    ///
    /// Each list is computed independently from the pairwise test.
    pub fn friend_map(&self, people: &[Person]) -> Result<FriendMap> {
        let mut seen = HashSet::with_capacity(people.len());
        for person in people {
            validate_name(person)?;
            if !seen.insert(person.name.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate attendee name '{}'",
                    person.name
                )));
            }
        }

        let no_preference = people.iter().filter(|p| p.has_no_preference()).count();
        if no_preference > 1 {
            warn!(
                "{} attendees stated no group preference; they will be matched with each other",
                no_preference
            );
        }

        let mut entries = Vec::with_capacity(people.len());
        for person in people {
            let friends = self.common_friends(person, people)?;
            debug!(person = %person, friends = friends.len(), "Resolved friends");
            entries.push((person.clone(), friends));
        }

        Ok(FriendMap::from_entries(entries))
    }
}

/// Length of the longest common subsequence, two-row table
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// `100 * part / whole` rounded to the nearest integer, ties to even
///
/// Exact integer arithmetic, so a ratio such as 62.5 always lands on 62.
/// `whole` must be non-zero and at least `part`.
fn rounded_percent(part: usize, whole: usize) -> u8 {
    let scaled = 100 * part;
    let quotient = scaled / whole;
    let rounded = match (2 * (scaled % whole)).cmp(&whole) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + quotient % 2,
    };
    rounded.min(100) as u8
}

fn validate_name(person: &Person) -> Result<()> {
    if person.name.trim().is_empty() {
        return Err(Error::InvalidInput(format!(
            "attendee with group '{}' has a blank name",
            person.group_text()
        )));
    }
    Ok(())
}

/// Person → fuzzy-matched companions
///
/// Built once per run and read-only afterwards. No person appears in its own
/// list.
#[derive(Debug, Clone, Default)]
pub struct FriendMap {
    entries: Vec<(Person, Vec<Person>)>,
    index: HashMap<String, usize>,
}

impl FriendMap {
    fn from_entries(entries: Vec<(Person, Vec<Person>)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (person, _))| (person.name.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Companions of `person`, empty when the person is unknown
    pub fn friends_of(&self, person: &Person) -> &[Person] {
        self.index
            .get(&person.name)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    /// Size of the person's affinity cluster (length of the friend list)
    pub fn cluster_size(&self, person: &Person) -> usize {
        self.friends_of(person).len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in input order
    pub fn iter(&self) -> impl Iterator<Item = (&Person, &[Person])> {
        self.entries.iter().map(|(p, f)| (p, f.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(people: &[Person]) -> Vec<&str> {
        people.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_similarity_examples() {
        let resolver = AffinityResolver::default();
        assert!(resolver.similar("Gang gang", "Gang gang"));
        assert!(!resolver.similar("Gang gang", "Jengi jengi"));
        assert!(resolver.similar("Gang gang", "Gang gnag"));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let resolver = AffinityResolver::default();
        let texts = [
            "Gang gang",
            "Gang gnag",
            "Jengi jengi",
            "Fyysikkokilta",
            "fyysikkokilta",
            "",
            "Sitsikuoro",
        ];
        for a in &texts {
            for b in &texts {
                assert_eq!(resolver.score(a, b), resolver.score(b, a), "{a:?} vs {b:?}");
                assert_eq!(resolver.similar(a, b), resolver.similar(b, a));
            }
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        // "Gang g" + "ang" in common: 2 * 8 / 18 = 0.888... rounds to 89
        let at_89 = AffinityResolver::new(AffinityConfig::new(89).unwrap());
        assert_eq!(at_89.score("Gang gang", "Gang gnag"), 89);
        assert!(!at_89.similar("Gang gang", "Gang gnag"));

        let at_88 = AffinityResolver::new(AffinityConfig::new(88).unwrap());
        assert!(at_88.similar("Gang gang", "Gang gnag"));
    }

    #[test]
    fn test_suffix_variants_of_different_length() {
        let resolver = AffinityResolver::default();

        // 2 * 5 / 11
        assert_eq!(resolver.score("Jengi", "Jengit"), 91);
        assert!(resolver.similar("Jengi", "Jengit"));

        // 2 * 8 / 19
        assert_eq!(resolver.score("Kemistit", "Kemistit ry"), 84);
        assert!(!resolver.similar("Kemistit", "Kemistit ry"));

        assert_eq!(resolver.score("Analytical engines", "Analytical engine"), 97);
        assert_eq!(resolver.score("Gang gang", "Jengi jengi"), 50);
    }

    #[test]
    fn test_half_scores_round_to_even() {
        let resolver = AffinityResolver::default();

        // 2 * 5 / 16 = 62.5
        assert_eq!(resolver.score("abcdefgh", "abcdeXYZ"), 62);
        // 2 * 1 / 16 = 12.5
        assert_eq!(resolver.score("abcdefgh", "aXXXXXXX"), 12);
        // 2 * 7 / 16 = 87.5, just over the default threshold
        assert_eq!(resolver.score("abcdefgh", "abcdefgX"), 88);
        assert!(resolver.similar("abcdefgh", "abcdefgX"));
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(rounded_percent(0, 7), 0);
        assert_eq!(rounded_percent(7, 7), 100);
        assert_eq!(rounded_percent(1, 8), 12);
        assert_eq!(rounded_percent(3, 8), 38);
        assert_eq!(rounded_percent(2, 3), 67);
    }

    #[test]
    fn test_scores_count_characters_not_bytes() {
        let resolver = AffinityResolver::default();
        // "ä" vs "a": 2 * 9 / 20
        assert_eq!(resolver.score("Sähkökilta", "Sähkokilta"), 90);
    }

    #[test]
    fn test_threshold_100_matches_nothing() {
        let resolver = AffinityResolver::new(AffinityConfig::new(100).unwrap());
        assert!(!resolver.similar("Gang gang", "Gang gang"));
    }

    #[test]
    fn test_empty_groups_match_each_other() {
        let resolver = AffinityResolver::default();
        assert_eq!(resolver.score("", ""), 100);
        assert!(resolver.similar("", ""));
        assert!(!resolver.similar("", "Gang gang"));
        assert_eq!(resolver.score("", "Gang gang"), 0);
    }

    #[test]
    fn test_common_friends_excludes_self() {
        let resolver = AffinityResolver::default();
        let people = vec![
            Person::with_group("Aino", "Gang gang"),
            Person::with_group("Bertta", "Kemistit"),
            Person::with_group("Cecilia", "Gang gnag"),
            Person::with_group("Daniel", "Gang gang"),
        ];

        let friends = resolver.common_friends(&people[0], &people).unwrap();
        assert_eq!(names(&friends), vec!["Cecilia", "Daniel"]);

        for person in &people {
            let friends = resolver.common_friends(person, &people).unwrap();
            assert!(!friends.contains(person));
        }
    }

    #[test]
    fn test_absent_groups_cluster_together() {
        let resolver = AffinityResolver::default();
        let people = vec![
            Person::new("Eero", None),
            Person::with_group("Fanni", ""),
            Person::with_group("Gustav", "Prodeko"),
        ];

        let map = resolver.friend_map(&people).unwrap();
        assert_eq!(names(map.friends_of(&people[0])), vec!["Fanni"]);
        assert_eq!(names(map.friends_of(&people[1])), vec!["Eero"]);
        assert!(map.friends_of(&people[2]).is_empty());
    }

    #[test]
    fn test_friend_map_cluster_sizes() {
        let resolver = AffinityResolver::default();
        let people = vec![
            Person::with_group("Aino", "Sitsikuoro"),
            Person::with_group("Bertta", "Sitsikuoro"),
            Person::with_group("Cecilia", "Sitsikuoro"),
            Person::with_group("Daniel", "Arkkitehdit"),
        ];

        let map = resolver.friend_map(&people).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.cluster_size(&people[0]), 2);
        assert_eq!(map.cluster_size(&people[3]), 0);

        let order: Vec<&str> = map.iter().map(|(p, _)| p.name.as_str()).collect();
        assert_eq!(order, vec!["Aino", "Bertta", "Cecilia", "Daniel"]);
    }

    #[test]
    fn test_blank_name_rejected() {
        let resolver = AffinityResolver::default();
        let people = vec![Person::with_group("  ", "Gang gang")];

        assert!(matches!(
            resolver.common_friends(&people[0], &people),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(resolver.friend_map(&people), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let resolver = AffinityResolver::default();
        let people = vec![
            Person::with_group("Aino", "Gang gang"),
            Person::with_group("Aino", "Kemistit"),
        ];

        assert!(matches!(resolver.friend_map(&people), Err(Error::InvalidInput(_))));
    }
}
