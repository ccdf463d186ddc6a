use crate::config::IdentityKey;
use crate::types::{Member, Team};

/// Decides when two members of one team are the same person.
pub trait MemberIdentity {
    /// Identity key of a member; never empty
    fn key(&self, member: &Member) -> String;

    /// Whether a team already holds a member with this key
    fn contains(&self, team: &Team, key: &str) -> bool {
        team.iter().any(|existing| self.key(existing) == key)
    }

    /// Key naming one person across rows, when this identity can tell
    /// namesakes apart. `None` means equal names may still be different people.
    fn person_key(&self, _member: &Member) -> Option<String> {
        None
    }
}

/// Identity = resolved display name (exact)
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayNameIdentity;

impl MemberIdentity for DisplayNameIdentity {
    fn key(&self, member: &Member) -> String {
        member.name.clone()
    }
}

/// Identity = value of a unique identifier column, display name when blank
#[derive(Debug, Clone)]
pub struct ColumnIdentity {
    column: String,
}

impl ColumnIdentity {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl MemberIdentity for ColumnIdentity {
    fn key(&self, member: &Member) -> String {
        self.person_key(member)
            .unwrap_or_else(|| format!("name:{}", member.name))
    }

    fn person_key(&self, member: &Member) -> Option<String> {
        let value = member.record.value(&self.column).trim();
        (!value.is_empty()).then(|| format!("id:{}", value.to_lowercase()))
    }
}

/// Build the identity function selected in configuration
pub fn identity_for(key: &IdentityKey) -> Box<dyn MemberIdentity> {
    match key {
        IdentityKey::DisplayName => Box::new(DisplayNameIdentity),
        IdentityKey::Column(column) => Box::new(ColumnIdentity::new(column.trim())),
    }
}
