use crate::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A record placed in a team.
///
/// The record itself is shared between every bucket it fans out to; only the
/// display name and the guest tag live on the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Resolved display name
    pub name: String,

    /// Guest-role column that pulled this member in, `None` for regular members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_role: Option<String>,

    /// Source row
    pub record: Arc<Record>,
}

impl Member {
    pub fn new(name: impl Into<String>, record: Arc<Record>) -> Self {
        Self {
            name: name.into(),
            guest_role: None,
            record,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.guest_role.is_some()
    }

    /// Copy of this member tagged with a guest role
    pub fn as_guest(&self, role: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            guest_role: Some(role.into()),
            record: Arc::clone(&self.record),
        }
    }
}

/// Ordered member list of one team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub members: Vec<Member>,
}

impl Team {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// Non-guest members
    pub fn regulars(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| !m.is_guest())
    }

    /// Move guests after regular members, keeping relative order in each group
    pub fn sort_guests_last(&mut self) {
        self.members.sort_by_key(Member::is_guest);
    }
}

/// Teams of one theme, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    pub teams: IndexMap<String, Team>,
}

/// Themes of one stream, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stream {
    pub themes: IndexMap<String, Theme>,
}

impl Stream {
    /// Every member of every team of this stream
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.themes
            .values()
            .flat_map(|theme| theme.teams.values())
            .flat_map(|team| team.iter())
    }
}

impl Theme {
    /// Every member of every team of this theme
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.teams.values().flat_map(|team| team.iter())
    }
}

/// Stream → Theme → Team → members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Organization {
    pub streams: IndexMap<String, Stream>,
}

/// Borrowed view of one team with its position in the hierarchy
#[derive(Debug, Clone, Copy)]
pub struct TeamRef<'a> {
    pub stream: &'a str,
    pub theme: &'a str,
    pub team: &'a str,
    pub members: &'a Team,
}

impl Organization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Find a team by its three labels
    pub fn team(&self, stream: &str, theme: &str, team: &str) -> Option<&Team> {
        self.streams.get(stream)?.themes.get(theme)?.teams.get(team)
    }

    /// Get or create the bucket for a (stream, theme, team) triple
    pub fn team_entry(&mut self, stream: &str, theme: &str, team: &str) -> &mut Team {
        self.streams
            .entry(stream.to_string())
            .or_default()
            .themes
            .entry(theme.to_string())
            .or_default()
            .teams
            .entry(team.to_string())
            .or_default()
    }

    /// All teams in traversal order
    pub fn teams(&self) -> impl Iterator<Item = TeamRef<'_>> {
        self.streams.iter().flat_map(|(stream, s)| {
            s.themes.iter().flat_map(move |(theme, t)| {
                t.teams.iter().map(move |(team, members)| TeamRef {
                    stream: stream.as_str(),
                    theme: theme.as_str(),
                    team: team.as_str(),
                    members,
                })
            })
        })
    }

    /// All member entries in traversal order (fan-out entries repeat)
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.streams.values().flat_map(|stream| stream.members())
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn team_count(&self) -> usize {
        self.teams().count()
    }

    /// Number of member entries across all teams
    pub fn entry_count(&self) -> usize {
        self.teams().map(|t| t.members.len()).sum()
    }

    /// Number of guest entries across all teams
    pub fn guest_count(&self) -> usize {
        self.members().filter(|m| m.is_guest()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn member(name: &str) -> Member {
        let record: Record = [("Name", name)].into_iter().collect();
        Member::new(name, Arc::new(record))
    }

    #[test]
    fn test_sort_guests_last_is_stable() {
        let mut team = Team {
            members: vec![
                member("A"),
                member("B").as_guest("Team Product Manager"),
                member("C"),
                member("D").as_guest("Team Scrum Master"),
            ],
        };

        team.sort_guests_last();

        assert_eq!(team.names(), vec!["A", "C", "B", "D"]);
        assert!(team.members[2].is_guest());
    }

    #[test]
    fn test_as_guest_shares_record() {
        let regular = member("Bob");
        let guest = regular.as_guest("Team Delivery Manager");

        assert!(!regular.is_guest());
        assert!(Arc::ptr_eq(&regular.record, &guest.record));
        assert_eq!(guest.guest_role.as_deref(), Some("Team Delivery Manager"));
    }

    #[test]
    fn test_team_entry_creates_nested_buckets() {
        let mut org = Organization::new();
        org.team_entry("Core", "Infra", "Platform").members.push(member("Alice"));
        org.team_entry("Core", "Infra", "Other");

        assert_eq!(org.stream_count(), 1);
        assert_eq!(org.team_count(), 2);
        assert_eq!(org.entry_count(), 1);
        assert_eq!(org.team("Core", "Infra", "Platform").map(Team::len), Some(1));
        assert!(org.team("Core", "Infra", "Missing").is_none());

        let order: Vec<_> = org.teams().map(|t| t.team).collect();
        assert_eq!(order, vec!["Platform", "Other"]);
    }
}
