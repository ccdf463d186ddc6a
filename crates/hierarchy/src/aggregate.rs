use crate::config::AggregationColumns;
use crate::record::Record;
use crate::tokens::{sort_collated, split_multi_value};
use crate::types::{Member, Organization};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Distinct values of one column over a set of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedInfo {
    /// `false` only when the column is missing from the headers
    pub exists: bool,
    pub items: Vec<String>,
}

impl AggregatedInfo {
    fn missing() -> Self {
        Self::default()
    }

    /// Items concatenated without separator
    pub fn joined(&self) -> String {
        self.items.concat()
    }
}

/// Real (trimmed) header name matching `name` trimmed and case-insensitively
pub fn find_header<'h>(headers: &'h [String], name: &str) -> Option<&'h str> {
    let target = name.trim().to_lowercase();
    headers
        .iter()
        .map(|header| header.trim())
        .find(|header| header.to_lowercase() == target)
}

/// Roll up one column over `records`.
///
/// With `sort_elements` every cell is split into tokens and the distinct
/// tokens come back in collated order (case and accents ignored). Without it
/// whole non-empty cells are kept once each, in first-seen order.
pub fn aggregate_info_by_header<'a, I>(
    records: I,
    headers: &[String],
    header: &str,
    sort_elements: bool,
) -> AggregatedInfo
where
    I: IntoIterator<Item = &'a Record>,
{
    let Some(column) = find_header(headers, header) else {
        return AggregatedInfo::missing();
    };

    let mut values: IndexSet<String> = IndexSet::new();
    for record in records {
        let raw = record.value(column);
        if raw.is_empty() {
            continue;
        }
        if sort_elements {
            values.extend(split_multi_value(raw));
        } else {
            values.insert(raw.to_string());
        }
    }

    let mut items: Vec<String> = values.into_iter().collect();
    if sort_elements {
        sort_collated(&mut items);
    }

    AggregatedInfo {
        exists: true,
        items,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub services: AggregatedInfo,
    pub description: String,
    pub channels: Vec<String>,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    pub description: String,
    pub teams: IndexMap<String, TeamInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub description: String,
    pub themes: IndexMap<String, ThemeInfo>,
}

/// Per-node rollups mirroring the hierarchy shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decorations {
    pub streams: IndexMap<String, StreamInfo>,
}

impl Decorations {
    pub fn team(&self, stream: &str, theme: &str, team: &str) -> Option<&TeamInfo> {
        self.streams.get(stream)?.themes.get(theme)?.teams.get(team)
    }
}

fn regular_records<'a>(members: impl Iterator<Item = &'a Member>) -> Vec<&'a Record> {
    members
        .filter(|member| !member.is_guest())
        .map(|member| member.record.as_ref())
        .collect()
}

/// Compute node decorations from a hierarchy. Guest entries never contribute.
pub fn decorate(
    organization: &Organization,
    headers: &[String],
    columns: &AggregationColumns,
) -> Decorations {
    let mut decorations = Decorations::default();

    for (stream_name, stream) in &organization.streams {
        let stream_records = regular_records(stream.members());
        let mut stream_info = StreamInfo {
            description: aggregate_info_by_header(
                stream_records,
                headers,
                &columns.stream_description,
                false,
            )
            .joined(),
            themes: IndexMap::new(),
        };

        for (theme_name, theme) in &stream.themes {
            let theme_records = regular_records(theme.members());
            let mut theme_info = ThemeInfo {
                description: aggregate_info_by_header(
                    theme_records,
                    headers,
                    &columns.theme_description,
                    false,
                )
                .joined(),
                teams: IndexMap::new(),
            };

            for (team_name, team) in &theme.teams {
                let records = regular_records(team.iter());
                let info = TeamInfo {
                    services: aggregate_info_by_header(
                        records.iter().copied(),
                        headers,
                        &columns.team_services,
                        true,
                    ),
                    description: aggregate_info_by_header(
                        records.iter().copied(),
                        headers,
                        &columns.team_description,
                        false,
                    )
                    .joined(),
                    channels: aggregate_info_by_header(
                        records.iter().copied(),
                        headers,
                        &columns.team_channels,
                        true,
                    )
                    .items,
                    email: aggregate_info_by_header(
                        records.iter().copied(),
                        headers,
                        &columns.team_email,
                        false,
                    )
                    .joined(),
                };
                theme_info.teams.insert(team_name.clone(), info);
            }

            stream_info.themes.insert(theme_name.clone(), theme_info);
        }

        decorations.streams.insert(stream_name.clone(), stream_info);
    }

    decorations
}
