use clap::ValueEnum;
use solitaire_hierarchy::{NameMatching, OnAmbiguousName, TeamHeightScope};

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum MatchingFlag {
    Exact,
    Fuzzy,
}

impl MatchingFlag {
    pub(crate) const fn as_domain(self) -> NameMatching {
        match self {
            MatchingFlag::Exact => NameMatching::Exact,
            MatchingFlag::Fuzzy => NameMatching::Fuzzy,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum AmbiguityFlag {
    FirstMatch,
    Error,
    Skip,
}

impl AmbiguityFlag {
    pub(crate) const fn as_domain(self) -> OnAmbiguousName {
        match self {
            AmbiguityFlag::FirstMatch => OnAmbiguousName::FirstMatch,
            AmbiguityFlag::Error => OnAmbiguousName::Error,
            AmbiguityFlag::Skip => OnAmbiguousName::Skip,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum HeightScopeFlag {
    Global,
    PerStream,
}

impl HeightScopeFlag {
    pub(crate) const fn as_domain(self) -> TeamHeightScope {
        match self {
            HeightScopeFlag::Global => TeamHeightScope::Global,
            HeightScopeFlag::PerStream => TeamHeightScope::PerStream,
        }
    }
}
