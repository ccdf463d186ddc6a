use crate::config::{NameMatching, OnAmbiguousName, OrgChartConfig};
use crate::error::Result;
use crate::identity::{identity_for, MemberIdentity};
use crate::lookup::{matcher_for, NameMatcher, PersonDirectory};
use crate::tokens::split_unique;
use crate::types::{Member, Organization, Team};

/// Injects people named in guest-role columns into the teams that reference them
pub struct GuestResolver {
    guest_roles: Vec<String>,
    matching: NameMatching,
    on_ambiguous_name: OnAmbiguousName,
    identity: Box<dyn MemberIdentity>,
}

#[derive(Debug, Default, Clone, Copy)]
struct ResolveStats {
    added: usize,
    unresolved: usize,
}

impl GuestResolver {
    pub fn new(config: &OrgChartConfig) -> Self {
        Self {
            guest_roles: config.guest_roles.clone(),
            matching: config.name_matching,
            on_ambiguous_name: config.on_ambiguous_name,
            identity: identity_for(&config.identity),
        }
    }

    /// Replace the identity used for the already-present check
    #[must_use]
    pub fn with_identity(mut self, identity: Box<dyn MemberIdentity>) -> Self {
        self.identity = identity;
        self
    }

    /// Resolve guests with the configured name matcher
    pub fn resolve(&self, base: &Organization) -> Result<Organization> {
        let mut matcher = matcher_for(self.matching);
        self.resolve_with(base, matcher.as_mut())
    }

    /// Resolve guests with a caller-supplied name matcher.
    ///
    /// Every team keeps its members, then gains a tagged copy of each person
    /// named in a regular member's guest-role columns, unless that person is
    /// already in the team. Guests come last. Members that are already guests
    /// do not pull in guests of their own, so resolving a resolved hierarchy
    /// changes nothing.
    pub fn resolve_with(
        &self,
        base: &Organization,
        matcher: &mut dyn NameMatcher,
    ) -> Result<Organization> {
        let directory = PersonDirectory::from_organization(base, self.identity.as_ref());
        let mut resolved = Organization::new();
        let mut stats = ResolveStats::default();

        for source in base.teams() {
            let team = resolved.team_entry(source.stream, source.theme, source.team);

            for member in source.members.iter() {
                let key = self.identity.key(member);
                if !self.identity.contains(team, &key) {
                    team.members.push(member.clone());
                }
            }

            // Members go in first so a teammate named in a role column stays a regular member
            for member in source.members.regulars() {
                for role in &self.guest_roles {
                    for name in split_unique(member.record.value(role)) {
                        match directory.find(&name, matcher, self.on_ambiguous_name)? {
                            Some(found) => {
                                if self.add_guest(team, found.as_guest(role.as_str())) {
                                    stats.added += 1;
                                }
                            }
                            None => {
                                stats.unresolved += 1;
                                log::debug!(
                                    "No person named '{name}' for {role} of {}/{}/{}",
                                    source.stream,
                                    source.theme,
                                    source.team
                                );
                            }
                        }
                    }
                }
            }

            team.sort_guests_last();
        }

        log::info!(
            "Resolved guests: {} added, {} unresolved references, {} people indexed",
            stats.added,
            stats.unresolved,
            directory.len()
        );

        Ok(resolved)
    }

    fn add_guest(&self, team: &mut Team, guest: Member) -> bool {
        let key = self.identity.key(&guest);
        if self.identity.contains(team, &key) {
            return false;
        }
        team.members.push(guest);
        true
    }
}
