use crate::config::{ColumnConfig, OrgChartConfig};
use crate::identity::{identity_for, MemberIdentity};
use crate::record::Record;
use crate::tokens::split_multi_value;
use crate::types::{Member, Organization};
use std::sync::Arc;

/// Build the Stream → Theme → Team hierarchy from normalized records
pub struct HierarchyBuilder {
    columns: ColumnConfig,
    stream_sentinel: String,
    theme_sentinel: String,
    team_sentinel: String,
    identity: Box<dyn MemberIdentity>,
}

impl HierarchyBuilder {
    pub fn new(config: &OrgChartConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            stream_sentinel: config.stream_sentinel(),
            theme_sentinel: config.theme_sentinel(),
            team_sentinel: config.team_sentinel(),
            identity: identity_for(&config.identity),
        }
    }

    /// Replace the de-duplication identity
    #[must_use]
    pub fn with_identity(mut self, identity: Box<dyn MemberIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Build hierarchy from records
    ///
    /// Each record lands in every (stream, theme, team) combination of its
    /// multi-valued level columns, at most once per team.
    pub fn build(&self, records: &[Record]) -> Organization {
        let organization = records
            .iter()
            .fold(Organization::new(), |organization, record| {
                self.insert(organization, record)
            });

        log::info!(
            "Built organization: {} streams, {} teams, {} entries from {} records",
            organization.stream_count(),
            organization.team_count(),
            organization.entry_count(),
            records.len()
        );

        organization
    }

    fn insert(&self, mut organization: Organization, record: &Record) -> Organization {
        let streams = level_tokens(record, &self.columns.stream, &self.stream_sentinel);
        let themes = level_tokens(record, &self.columns.theme, &self.theme_sentinel);
        let teams = level_tokens(record, &self.columns.team, &self.team_sentinel);

        let member = Member::new(record.display_name(&self.columns), Arc::new(record.clone()));
        let key = self.identity.key(&member);

        for stream in &streams {
            for theme in &themes {
                for team in &teams {
                    let bucket = organization.team_entry(stream, theme, team);
                    if self.identity.contains(bucket, &key) {
                        log::debug!(
                            "Dropping duplicate '{}' in {stream}/{theme}/{team}",
                            member.name
                        );
                        continue;
                    }
                    bucket.members.push(member.clone());
                }
            }
        }

        organization
    }
}

/// Tokens of one level column, or the sentinel when the cell is blank
fn level_tokens(record: &Record, column: &str, sentinel: &str) -> Vec<String> {
    let tokens = split_multi_value(record.value(column));
    if tokens.is_empty() {
        vec![sentinel.to_string()]
    } else {
        tokens
    }
}
