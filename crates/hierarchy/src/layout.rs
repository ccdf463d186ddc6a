//! Box sizing and placement for the stream / theme / team / card layout.
//!
//! Every number here is a pure function of the hierarchy shape and
//! [`LayoutConfig`]. Sentinel buckets ("No Team Stream" and friends) get no
//! geometry and do not feed the team size used for box heights.
//!
//! Positions are relative to the parent box: streams to the canvas, themes to
//! their stream, teams to their theme and cards to their team.

use crate::config::{LayoutConfig, OrgChartConfig, TeamHeightScope};
use crate::error::Result;
use crate::tokens::normalize_key;
use crate::types::{Organization, Stream, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One member card inside a team box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSlot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_role: Option<String>,
    pub row: usize,
    pub column: usize,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGeometry {
    pub name: String,
    /// Stable key: `team::<stream>::<theme>::<team>`
    pub key: String,
    pub position: Point,
    pub size: BoxSize,
    pub cards: Vec<CardSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeGeometry {
    pub name: String,
    /// Stable key: `theme::<stream>::<theme>`
    pub key: String,
    pub row: usize,
    pub column: usize,
    pub position: Point,
    pub size: BoxSize,
    pub teams: Vec<TeamGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamGeometry {
    pub name: String,
    /// Stable key: `stream::<stream>`
    pub key: String,
    pub position: Point,
    pub size: BoxSize,
    /// Size of every team box in this stream
    pub team_size: BoxSize,
    /// Height of every theme box in this stream
    pub theme_height: f64,
    pub themes: Vec<ThemeGeometry>,
}

/// Geometry of one extraction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub card_size: BoxSize,

    /// Member count of the largest non-sentinel team of the whole dataset
    pub max_team_size: usize,

    pub team_height_scope: TeamHeightScope,
    pub streams: Vec<StreamGeometry>,

    /// Bounding box of all streams, margins included
    pub canvas: BoxSize,
}

impl LayoutPlan {
    pub fn stream(&self, name: &str) -> Option<&StreamGeometry> {
        self.streams.iter().find(|s| s.name == name)
    }
}

/// Allowed stream names, matched raw or by normalized key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamFilter {
    allowed: HashSet<String>,
}

impl StreamFilter {
    /// `None` when no name survives trimming (no filtering at all)
    pub fn new<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = HashSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            allowed.insert(name.to_string());
            allowed.insert(normalize_key(name));
        }
        (!allowed.is_empty()).then_some(Self { allowed })
    }

    /// Parse a comma-separated list
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(raw.split(','))
    }

    pub fn allows(&self, stream: &str) -> bool {
        self.allowed.contains(stream) || self.allowed.contains(&normalize_key(stream))
    }
}

/// Computes a [`LayoutPlan`] from a resolved hierarchy
pub struct LayoutEngine {
    layout: LayoutConfig,
    stream_sentinel: String,
    theme_sentinel: String,
    team_sentinel: String,
}

impl LayoutEngine {
    /// Fails when the layout constants are unusable (zero items per row,
    /// negative or non-finite sizes).
    pub fn new(config: &OrgChartConfig) -> Result<Self> {
        config.layout.validate()?;
        Ok(Self {
            layout: config.layout.clone(),
            stream_sentinel: config.stream_sentinel(),
            theme_sentinel: config.theme_sentinel(),
            team_sentinel: config.team_sentinel(),
        })
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Team box height for a team of `team_size` cards. At least one row of
    /// cards is always reserved.
    pub fn team_height(&self, team_size: usize) -> f64 {
        let rows = team_size.max(1).div_ceil(self.layout.items_per_row);
        rows as f64 * self.layout.card_height() * self.layout.team_height_multiplier
            + self.layout.team_height_margin
    }

    pub fn theme_height(&self, team_height: f64) -> f64 {
        team_height * self.layout.theme_height_multiplier + self.layout.theme_height_margin
    }

    /// Width of a theme holding `teams` team boxes; the label margin alone when empty
    pub fn theme_width(&self, teams: usize) -> f64 {
        if teams == 0 {
            return self.layout.theme_label_margin;
        }
        teams as f64 * self.layout.team_width()
            + (teams - 1) as f64 * self.layout.team_pad_x
            + self.layout.theme_label_margin
    }

    /// Widest row of wrapped themes plus margin, floored at the minimum width
    pub fn stream_width(&self, theme_widths: &[f64]) -> f64 {
        theme_widths
            .chunks(self.layout.themes_per_row)
            .map(|row| {
                row.iter().sum::<f64>()
                    + (row.len() - 1) as f64 * self.layout.theme_pad_x
                    + self.layout.stream_margin
            })
            .fold(self.layout.stream_min_width, f64::max)
    }

    pub fn stream_height(&self, theme_count: usize, theme_height: f64) -> f64 {
        let rows = theme_count.div_ceil(self.layout.themes_per_row);
        rows as f64 * (theme_height + self.layout.theme_row_pad_y)
            + self.layout.stream_height_margin
    }

    fn is_sentinel_stream(&self, name: &str) -> bool {
        name == self.stream_sentinel
    }

    /// Non-sentinel themes of a stream with their non-sentinel teams
    fn visible_themes<'a>(
        &'a self,
        stream: &'a Stream,
    ) -> impl Iterator<Item = (&'a String, Vec<(&'a String, &'a Team)>)> + 'a {
        stream
            .themes
            .iter()
            .filter(move |(name, _)| **name != self.theme_sentinel)
            .map(move |(name, theme)| {
                let teams = theme
                    .teams
                    .iter()
                    .filter(|(team, _)| **team != self.team_sentinel)
                    .collect();
                (name, teams)
            })
    }

    /// Largest non-sentinel team of one stream, in cards
    fn largest_team(&self, stream: &Stream) -> usize {
        self.visible_themes(stream)
            .flat_map(|(_, teams)| teams.into_iter().map(|(_, team)| team.len()))
            .max()
            .unwrap_or(0)
    }

    /// Lay out every non-sentinel stream allowed by `filter`
    pub fn plan(&self, organization: &Organization, filter: Option<&StreamFilter>) -> LayoutPlan {
        let max_team_size = organization
            .streams
            .iter()
            .filter(|(name, _)| !self.is_sentinel_stream(name))
            .map(|(_, stream)| self.largest_team(stream))
            .max()
            .unwrap_or(0);
        let global_team_height = self.team_height(max_team_size);

        let mut streams = Vec::new();
        let mut y = self.layout.origin_y;

        for (name, stream) in &organization.streams {
            if self.is_sentinel_stream(name) {
                continue;
            }
            if filter.is_some_and(|f| !f.allows(name)) {
                log::debug!("Stream '{name}' filtered out");
                continue;
            }

            let team_height = match self.layout.team_height_scope {
                TeamHeightScope::Global => global_team_height,
                TeamHeightScope::PerStream => self.team_height(self.largest_team(stream)),
            };
            let origin = Point::new(self.layout.origin_x, y);
            let geometry = self.stream_geometry(name, stream, team_height, origin);
            y += geometry.size.height + self.layout.stream_gap_y;
            streams.push(geometry);
        }

        let canvas = self.canvas(&streams);
        log::info!(
            "Laid out {} streams (largest team: {} people), canvas {}x{}",
            streams.len(),
            max_team_size,
            canvas.width,
            canvas.height
        );

        LayoutPlan {
            card_size: BoxSize::new(self.layout.card_width, self.layout.card_height()),
            max_team_size,
            team_height_scope: self.layout.team_height_scope,
            streams,
            canvas,
        }
    }

    fn stream_geometry(
        &self,
        name: &str,
        stream: &Stream,
        team_height: f64,
        position: Point,
    ) -> StreamGeometry {
        let stream_key = normalize_key(name);
        let team_size = BoxSize::new(self.layout.team_width(), team_height);
        let theme_height = self.theme_height(team_height);
        let per_row = self.layout.themes_per_row;

        let mut themes = Vec::new();
        let mut x = self.layout.theme_origin_x;
        for (index, (theme_name, teams)) in self.visible_themes(stream).enumerate() {
            let (row, column) = (index / per_row, index % per_row);
            if column == 0 {
                x = self.layout.theme_origin_x;
            }
            let width = self.theme_width(teams.len());
            let theme_key = format!("{stream_key}::{}", normalize_key(theme_name));

            let teams = teams
                .into_iter()
                .enumerate()
                .map(|(i, (team_name, team))| {
                    let x = self.layout.team_origin_x
                        + i as f64 * (team_size.width + self.layout.team_pad_x);
                    TeamGeometry {
                        name: team_name.clone(),
                        key: format!("team::{theme_key}::{}", normalize_key(team_name)),
                        position: Point::new(x, self.layout.team_origin_y),
                        size: team_size,
                        cards: self.cards(team),
                    }
                })
                .collect();

            themes.push(ThemeGeometry {
                name: theme_name.clone(),
                key: format!("theme::{theme_key}"),
                row,
                column,
                position: Point::new(
                    x,
                    self.layout.theme_origin_y
                        + row as f64 * (theme_height + self.layout.theme_row_pad_y),
                ),
                size: BoxSize::new(width, theme_height),
                teams,
            });
            x += width + self.layout.theme_pad_x;
        }

        let widths: Vec<f64> = themes.iter().map(|t| t.size.width).collect();
        StreamGeometry {
            name: name.to_string(),
            key: format!("stream::{stream_key}"),
            position,
            size: BoxSize::new(
                self.stream_width(&widths),
                self.stream_height(themes.len(), theme_height),
            ),
            team_size,
            theme_height,
            themes,
        }
    }

    fn cards(&self, team: &Team) -> Vec<CardSlot> {
        let per_row = self.layout.items_per_row;
        let step_x = self.layout.card_width + self.layout.card_pad_x;
        let step_y = self.layout.card_height() + self.layout.card_row_gap;

        team.iter()
            .enumerate()
            .map(|(i, member)| {
                let (row, column) = (i / per_row, i % per_row);
                CardSlot {
                    name: member.name.clone(),
                    guest_role: member.guest_role.clone(),
                    row,
                    column,
                    position: Point::new(
                        self.layout.card_origin_x + column as f64 * step_x,
                        self.layout.card_origin_y + row as f64 * step_y,
                    ),
                }
            })
            .collect()
    }

    fn canvas(&self, streams: &[StreamGeometry]) -> BoxSize {
        let floor = BoxSize::new(
            2.0 * self.layout.origin_x + self.layout.stream_min_width,
            2.0 * self.layout.origin_y,
        );
        streams.iter().fold(floor, |canvas, stream| {
            BoxSize::new(
                canvas
                    .width
                    .max(stream.position.x + stream.size.width + self.layout.origin_x),
                canvas
                    .height
                    .max(stream.position.y + stream.size.height + self.layout.origin_y),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::types::Member;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn organization(teams: &[(&str, &str, &str, usize)]) -> Organization {
        let mut org = Organization::new();
        for (stream, theme, team, size) in teams {
            let bucket = org.team_entry(stream, theme, team);
            for i in 0..*size {
                let name = format!("{team}-{i}");
                let record: Record = [("Name", name.as_str())].into_iter().collect();
                bucket.members.push(Member::new(name, Arc::new(record)));
            }
        }
        org
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(&OrgChartConfig::default()).expect("default layout")
    }

    #[test]
    fn test_default_box_formulas() {
        let engine = engine();
        assert_eq!(engine.team_height(6), 1.0 * 242.0 * 1.2 + 80.0);
        assert_eq!(engine.team_height(7), 2.0 * 242.0 * 1.2 + 80.0);
        assert_eq!(engine.theme_height(100.0), 220.0);
        assert_eq!(engine.theme_width(0), 120.0);
        assert_eq!(engine.theme_width(2), 2.0 * 1060.0 + 24.0 + 120.0);
        assert_eq!(engine.stream_width(&[]), 600.0);
        assert_eq!(engine.stream_height(5, 100.0), 2.0 * 160.0 + 140.0);
    }

    #[test]
    fn test_stream_width_takes_widest_wrapped_row() {
        let engine = engine();
        let widths = [100.0, 100.0, 100.0, 100.0, 1000.0];
        // first row: 400 + 3 * 60 + 80, second row: 1000 + 80
        assert_eq!(engine.stream_width(&widths), 1080.0);
    }

    #[test]
    fn test_single_team_plan() {
        let plan = engine().plan(&organization(&[("Core", "Infra", "Platform", 2)]), None);

        assert_eq!(plan.max_team_size, 2);
        assert_eq!(plan.card_size, BoxSize::new(160.0, 242.0));

        let stream = &plan.streams[0];
        let team_height = 242.0 * 1.2 + 80.0;
        let theme_height = team_height * 1.2 + 100.0;
        assert_eq!(stream.position, Point::new(40.0, 40.0));
        assert_eq!(stream.team_size, BoxSize::new(1060.0, team_height));
        assert_eq!(stream.size, BoxSize::new(1180.0 + 80.0, theme_height + 60.0 + 140.0));
        assert_eq!(stream.key, "stream::core");

        let theme = &stream.themes[0];
        assert_eq!(theme.position, Point::new(60.0, 100.0));
        assert_eq!(theme.size.width, 1180.0);
        assert_eq!(theme.key, "theme::core::infra");

        let team = &theme.teams[0];
        assert_eq!(team.position, Point::new(50.0, 130.0));
        assert_eq!(team.key, "team::core::infra::platform");
        assert_eq!(team.cards.len(), 2);
        assert_eq!(team.cards[1].position, Point::new(20.0 + 170.0, 115.0));
    }

    #[test]
    fn test_cards_wrap_after_items_per_row() {
        let plan = engine().plan(&organization(&[("S", "T", "Big", 7)]), None);
        let card = &plan.streams[0].themes[0].teams[0].cards[6];
        assert_eq!((card.row, card.column), (1, 0));
        assert_eq!(card.position, Point::new(20.0, 115.0 + 252.0));
    }

    #[test]
    fn test_themes_wrap_and_advance() {
        let org = organization(&[
            ("S", "A", "t", 1),
            ("S", "B", "t", 1),
            ("S", "C", "t", 1),
            ("S", "D", "t", 1),
            ("S", "E", "t", 1),
        ]);
        let plan = engine().plan(&org, None);
        let themes = &plan.streams[0].themes;
        let width = 1180.0;
        let theme_height = plan.streams[0].theme_height;

        assert_eq!(themes[1].position.x, 60.0 + width + 60.0);
        assert_eq!(themes[4].position, Point::new(60.0, 100.0 + (theme_height + 60.0)));
        assert_eq!((themes[4].row, themes[4].column), (1, 0));
    }

    #[test]
    fn test_streams_stack_vertically() {
        let plan = engine().plan(
            &organization(&[("A", "X", "t", 1), ("B", "X", "t", 1)]),
            None,
        );
        let first = &plan.streams[0];
        assert_eq!(plan.streams[1].position.y, 40.0 + (first.size.height + 100.0));
        assert_eq!(
            plan.canvas.height,
            plan.streams[1].position.y + plan.streams[1].size.height + 40.0
        );
    }

    #[test]
    fn test_sentinels_get_no_geometry_and_do_not_size() {
        let org = organization(&[
            ("Core", "Infra", "Platform", 2),
            ("Core", "Infra", "No Team member of", 20),
            ("Core", "No Team Theme", "Other", 20),
            ("No Team Stream", "X", "Y", 20),
        ]);
        let plan = engine().plan(&org, None);

        assert_eq!(plan.max_team_size, 2);
        assert_eq!(plan.streams.len(), 1);
        assert_eq!(plan.streams[0].themes.len(), 1);
        assert_eq!(plan.streams[0].themes[0].teams.len(), 1);
    }

    #[test]
    fn test_empty_hierarchy_uses_floor_values() {
        let plan = engine().plan(&Organization::new(), None);
        assert!(plan.streams.is_empty());
        assert_eq!(plan.max_team_size, 0);
        assert_eq!(plan.canvas, BoxSize::new(680.0, 80.0));
    }

    #[test]
    fn test_stream_filter_keeps_global_team_size() {
        let org = organization(&[("Core Platform", "X", "t", 2), ("Edge", "X", "t", 9)]);
        let filter = StreamFilter::parse(" core-platform , ");
        let plan = engine().plan(&org, filter.as_ref());

        assert_eq!(plan.streams.len(), 1);
        assert_eq!(plan.streams[0].name, "Core Platform");
        assert_eq!(plan.max_team_size, 9);
        assert_eq!(plan.streams[0].team_size.height, engine().team_height(9));
    }

    #[test]
    fn test_per_stream_height_scope() {
        let mut config = OrgChartConfig::default();
        config.layout.team_height_scope = TeamHeightScope::PerStream;
        let org = organization(&[("Small", "X", "t", 2), ("Large", "X", "t", 13)]);
        let engine = LayoutEngine::new(&config).unwrap();
        let plan = engine.plan(&org, None);

        assert_eq!(plan.stream("Small").unwrap().team_size.height, engine.team_height(2));
        assert_eq!(plan.stream("Large").unwrap().team_size.height, engine.team_height(13));
    }

    #[test]
    fn test_blank_filter_means_no_filter() {
        assert!(StreamFilter::parse(" , ").is_none());
        let filter = StreamFilter::parse("Core").unwrap();
        assert!(filter.allows("Core"));
        assert!(filter.allows("core"));
        assert!(!filter.allows("Edge"));
    }

    #[test]
    fn test_namesakes_each_take_a_card_row_slot() {
        let mut org = Organization::new();
        let bucket = org.team_entry("Core", "Infra", "Platform");
        for (i, name) in ["P0", "P0", "P1", "P2", "P3", "P4", "P5"].iter().enumerate() {
            let id = format!("E{i}");
            let record: Record = [("Name", *name), ("Employee ID", id.as_str())]
                .into_iter()
                .collect();
            bucket.members.push(Member::new(*name, Arc::new(record)));
        }

        let plan = engine().plan(&org, None);
        let team = &plan.streams[0].themes[0].teams[0];
        let last = team.cards.last().expect("cards");

        assert_eq!(plan.max_team_size, 7);
        assert_eq!(team.size.height, engine().team_height(7));
        assert!(last.position.y + plan.card_size.height <= team.size.height);
    }

    #[test]
    fn test_new_rejects_unusable_layout() {
        let mut config = OrgChartConfig::default();
        config.layout.items_per_row = 0;
        assert!(LayoutEngine::new(&config).is_err());

        let mut config = OrgChartConfig::default();
        config.layout.themes_per_row = 0;
        assert!(LayoutEngine::new(&config).is_err());
    }
}
