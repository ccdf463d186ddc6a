use crate::config::{NameMatching, OnAmbiguousName};
use crate::error::{HierarchyError, Result};
use crate::identity::MemberIdentity;
use crate::record::Record;
use crate::types::{Member, Organization};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};
use std::collections::HashSet;

fn row_cells(record: &Record) -> Vec<(&str, &str)> {
    record
        .fields()
        .iter()
        .map(|(column, value)| (column.as_str(), value.as_str()))
        .collect()
}

/// Scores a display name against a requested name
pub trait NameMatcher {
    /// `None` when the candidate does not match; higher scores win
    fn score(&mut self, name: &str, candidate: &str) -> Option<u32>;
}

fn same_name(name: &str, candidate: &str) -> bool {
    name.trim().to_lowercase() == candidate.trim().to_lowercase()
}

/// Trimmed, case-insensitive equality
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactNameMatcher;

impl NameMatcher for ExactNameMatcher {
    fn score(&mut self, name: &str, candidate: &str) -> Option<u32> {
        same_name(name, candidate).then_some(1)
    }
}

/// Fuzzy matching using nucleo-matcher; an exact match always outranks fuzzy ones
pub struct FuzzyNameMatcher {
    matcher: Matcher,
}

impl FuzzyNameMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }
}

impl Default for FuzzyNameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NameMatcher for FuzzyNameMatcher {
    fn score(&mut self, name: &str, candidate: &str) -> Option<u32> {
        if same_name(name, candidate) {
            return Some(u32::MAX);
        }
        let pattern = Pattern::parse(name.trim(), CaseMatching::Ignore, Normalization::Smart);
        let haystack = Utf32String::from(candidate);
        pattern.score(haystack.slice(..), &mut self.matcher)
    }
}

/// Build the matcher selected in configuration
pub fn matcher_for(matching: NameMatching) -> Box<dyn NameMatcher> {
    match matching {
        NameMatching::Exact => Box::new(ExactNameMatcher),
        NameMatching::Fuzzy => Box::new(FuzzyNameMatcher::new()),
    }
}

/// A person known to the hierarchy, with the first team it was seen in
#[derive(Debug, Clone, Copy)]
pub struct DirectoryEntry<'a> {
    pub member: &'a Member,
    pub stream: &'a str,
    pub theme: &'a str,
    pub team: &'a str,
}

impl DirectoryEntry<'_> {
    fn describe(&self) -> String {
        format!(
            "{} ({}/{}/{})",
            self.member.name, self.stream, self.theme, self.team
        )
    }
}

/// Every distinct person of an organization, in traversal order.
///
/// Guest entries are skipped: they are copies of people listed elsewhere.
/// Rows are the same person when `identity` gives them the same person key,
/// or, without one, when every cell matches.
pub struct PersonDirectory<'a> {
    people: Vec<DirectoryEntry<'a>>,
}

impl<'a> PersonDirectory<'a> {
    pub fn from_organization(
        organization: &'a Organization,
        identity: &dyn MemberIdentity,
    ) -> Self {
        let mut seen_keys = HashSet::new();
        let mut seen_rows: HashSet<Vec<(&str, &str)>> = HashSet::new();
        let mut people = Vec::new();

        for team in organization.teams() {
            for member in team.members.regulars() {
                let first_sighting = match identity.person_key(member) {
                    Some(key) => seen_keys.insert(key),
                    None => seen_rows.insert(row_cells(&member.record)),
                };
                if first_sighting {
                    people.push(DirectoryEntry {
                        member,
                        stream: team.stream,
                        theme: team.theme,
                        team: team.team,
                    });
                }
            }
        }

        Self { people }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Find the person a name refers to.
    ///
    /// Only the best-scoring candidates are considered. When several distinct
    /// records tie, `policy` decides between the first one in traversal
    /// order, an error, or no match.
    pub fn find(
        &self,
        name: &str,
        matcher: &mut dyn NameMatcher,
        policy: OnAmbiguousName,
    ) -> Result<Option<&'a Member>> {
        let scored: Vec<(u32, &DirectoryEntry<'a>)> = self
            .people
            .iter()
            .filter_map(|entry| matcher.score(name, &entry.member.name).map(|s| (s, entry)))
            .collect();

        let Some(best) = scored.iter().map(|(score, _)| *score).max() else {
            return Ok(None);
        };
        let candidates: Vec<&DirectoryEntry<'a>> = scored
            .into_iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, entry)| entry)
            .collect();

        if candidates.len() == 1 {
            return Ok(Some(candidates[0].member));
        }

        match policy {
            OnAmbiguousName::FirstMatch => {
                log::debug!(
                    "Name '{}' matches {} people, using the first",
                    name.trim(),
                    candidates.len()
                );
                Ok(Some(candidates[0].member))
            }
            OnAmbiguousName::Error => Err(HierarchyError::AmbiguousName {
                name: name.trim().to_string(),
                candidates: candidates.iter().map(|c| c.describe()).collect(),
            }),
            OnAmbiguousName::Skip => {
                log::warn!(
                    "Skipping ambiguous name '{}': {}",
                    name.trim(),
                    candidates
                        .iter()
                        .map(|c| c.describe())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ColumnIdentity, DisplayNameIdentity};
    use std::sync::Arc;

    fn organization(people: &[(&str, &str)]) -> Organization {
        let mut org = Organization::new();
        for (name, team) in people {
            let record: Record = [("Name", *name), ("Team member of", *team)]
                .into_iter()
                .collect();
            org.team_entry("Core", "Infra", team)
                .members
                .push(Member::new(*name, Arc::new(record)));
        }
        org
    }

    #[test]
    fn test_exact_matcher_ignores_case_and_padding() {
        let mut matcher = ExactNameMatcher;
        assert!(matcher.score("  bob smith ", "Bob Smith").is_some());
        assert!(matcher.score("bob", "Bob Smith").is_none());
    }

    #[test]
    fn test_find_by_name() {
        let org = organization(&[("Alice", "Platform"), ("Bob", "Other")]);
        let directory = PersonDirectory::from_organization(&org, &DisplayNameIdentity);

        let found = directory
            .find("BOB", &mut ExactNameMatcher, OnAmbiguousName::FirstMatch)
            .unwrap();
        assert_eq!(found.map(|m| m.name.as_str()), Some("Bob"));

        let missing = directory
            .find("Carol", &mut ExactNameMatcher, OnAmbiguousName::FirstMatch)
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_directory_skips_fan_out_copies_and_guests() {
        let mut org = organization(&[("Alice", "Platform")]);
        let alice = org.team("Core", "Infra", "Platform").unwrap().members[0].clone();
        org.team_entry("Core", "Infra", "Other").members.push(alice.clone());
        org.team_entry("Core", "Infra", "Third")
            .members
            .push(alice.as_guest("Team Scrum Master"));

        let directory = PersonDirectory::from_organization(&org, &DisplayNameIdentity);
        assert_eq!(directory.len(), 1);
        let found = directory
            .find("alice", &mut ExactNameMatcher, OnAmbiguousName::Error)
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_ambiguous_name_policies() {
        let org = organization(&[("Sam Lee", "Platform"), ("Sam Lee", "Other")]);
        let directory = PersonDirectory::from_organization(&org, &DisplayNameIdentity);
        assert_eq!(directory.len(), 2);

        let first = directory
            .find("sam lee", &mut ExactNameMatcher, OnAmbiguousName::FirstMatch)
            .unwrap()
            .unwrap();
        let expected = &org.team("Core", "Infra", "Platform").unwrap().members[0];
        assert!(Arc::ptr_eq(&first.record, &expected.record));

        let skipped = directory
            .find("sam lee", &mut ExactNameMatcher, OnAmbiguousName::Skip)
            .unwrap();
        assert!(skipped.is_none());

        let err = directory
            .find("sam lee", &mut ExactNameMatcher, OnAmbiguousName::Error)
            .unwrap_err();
        match err {
            HierarchyError::AmbiguousName { name, candidates } => {
                assert_eq!(name, "sam lee");
                assert_eq!(
                    candidates,
                    vec![
                        "Sam Lee (Core/Infra/Platform)".to_string(),
                        "Sam Lee (Core/Infra/Other)".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_rows_are_one_person() {
        let mut org = Organization::new();
        for team in ["Platform", "Other"] {
            let record: Record = [("Name", "Sam Lee"), ("Employee ID", "E1")]
                .into_iter()
                .collect();
            org.team_entry("Core", "Infra", team)
                .members
                .push(Member::new("Sam Lee", Arc::new(record)));
        }

        let directory = PersonDirectory::from_organization(&org, &DisplayNameIdentity);
        assert_eq!(directory.len(), 1);
        let found = directory
            .find("Sam Lee", &mut ExactNameMatcher, OnAmbiguousName::Error)
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_identifier_column_merges_rows_of_one_person() {
        let mut org = Organization::new();
        for (team, id) in [("Platform", "E1"), ("Other", "e1"), ("Third", "E2")] {
            let record: Record = [
                ("Name", "Sam Lee"),
                ("Team member of", team),
                ("Employee ID", id),
            ]
            .into_iter()
            .collect();
            org.team_entry("Core", "Infra", team)
                .members
                .push(Member::new("Sam Lee", Arc::new(record)));
        }

        let identity = ColumnIdentity::new("Employee ID");
        let directory = PersonDirectory::from_organization(&org, &identity);
        assert_eq!(directory.len(), 2);
        assert!(directory
            .find("Sam Lee", &mut ExactNameMatcher, OnAmbiguousName::Error)
            .is_err());
    }

    #[test]
    fn test_fuzzy_matcher_prefers_exact_match() {
        let org = organization(&[("Robert Brown", "Platform"), ("Rob", "Other")]);
        let directory = PersonDirectory::from_organization(&org, &DisplayNameIdentity);
        let mut matcher = FuzzyNameMatcher::new();

        let found = directory
            .find("rob", &mut matcher, OnAmbiguousName::Error)
            .unwrap();
        assert_eq!(found.map(|m| m.name.as_str()), Some("Rob"));

        let fuzzy = directory
            .find("robrt brwn", &mut matcher, OnAmbiguousName::FirstMatch)
            .unwrap();
        assert_eq!(fuzzy.map(|m| m.name.as_str()), Some("Robert Brown"));
    }
}
