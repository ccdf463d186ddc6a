//! # Solitaire Hierarchy
//!
//! Turns a flat people directory (CSV rows) into a Stream → Theme → Team
//! hierarchy with guest managers, per-node rollups and a box layout.
//!
//! ## Features
//!
//! - **Multi-value fan-out** - one row can belong to several streams, themes and teams
//! - **Per-team de-duplication** - pluggable member identity
//! - **Guest resolution** - people named in role columns join the teams that reference them
//! - **Deterministic layout** - box sizes and positions from hierarchy shape alone
//!
//! ## Architecture
//!
//! ```text
//! headers + rows
//!     │
//!     ├──> Record Normalizer
//!     │      └─ zip, trim, drop inactive rows
//!     │
//!     ├──> Hierarchy Builder (fold)
//!     │      ├─ split level columns (sentinel when blank)
//!     │      └─ insert into every (stream, theme, team) bucket once
//!     │
//!     ├──> Guest Resolver
//!     │      ├─ PersonDirectory + NameMatcher (exact / fuzzy)
//!     │      └─ append tagged copies, guests sorted last
//!     │
//!     ├──> Aggregation (services, descriptions, channels, e-mail)
//!     │
//!     └──> Layout Engine
//!            └─ LayoutPlan: stream / theme / team boxes and card slots
//! ```

mod aggregate;
mod builder;
mod config;
mod dataset;
mod error;
mod identity;
mod layout;
mod lookup;
mod plan;
mod record;
mod resolver;
mod tokens;
mod types;

pub use aggregate::{
    aggregate_info_by_header, decorate, find_header, AggregatedInfo, Decorations, StreamInfo,
    TeamInfo, ThemeInfo,
};
pub use builder::HierarchyBuilder;
pub use config::{
    AggregationColumns, ColumnConfig, IdentityKey, LayoutConfig, NameMatching, OnAmbiguousName,
    OrgChartConfig, SentinelConfig, TeamHeightScope,
};
pub use dataset::{parse_date, DatasetInfo, LAST_UPDATE_COLUMN};
pub use error::{HierarchyError, Result};
pub use identity::{identity_for, ColumnIdentity, DisplayNameIdentity, MemberIdentity};
pub use layout::{
    BoxSize, CardSlot, LayoutEngine, LayoutPlan, Point, StreamFilter, StreamGeometry,
    TeamGeometry, ThemeGeometry,
};
pub use lookup::{
    matcher_for, DirectoryEntry, ExactNameMatcher, FuzzyNameMatcher, NameMatcher, PersonDirectory,
};
pub use plan::OrgChart;
pub use record::{normalize_records, Record};
pub use resolver::GuestResolver;
pub use tokens::{
    clean_name, collation_key, normalize_key, sort_collated, split_multi_value, split_unique,
};
pub use types::{Member, Organization, Stream, Team, TeamRef, Theme};
