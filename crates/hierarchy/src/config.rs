use crate::error::{HierarchyError, Result};
use serde::{Deserialize, Serialize};

/// Everything one extraction pass needs: column names, guest roles, matching
/// policy and layout constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgChartConfig {
    /// Columns whose value names people shown as guests of the team (ordered)
    pub guest_roles: Vec<String>,

    /// How guest names are matched against display names
    pub name_matching: NameMatching,

    /// What to do when a guest name matches more than one person
    pub on_ambiguous_name: OnAmbiguousName,

    /// How two members of one team are recognised as the same person
    pub identity: IdentityKey,

    /// Source columns driving the hierarchy
    pub columns: ColumnConfig,

    /// Overrides for the "No <column>" fallback labels
    pub sentinels: SentinelConfig,

    /// Auxiliary columns rolled up per node
    pub aggregation: AggregationColumns,

    /// Pixel constants for the layout engine
    pub layout: LayoutConfig,
}

impl Default for OrgChartConfig {
    fn default() -> Self {
        Self {
            guest_roles: [
                "Team Product Manager",
                "Team Delivery Manager",
                "Team Scrum Master",
                "Team Solution Architect",
                "Team Development Manager",
                "Team Security Champion",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            name_matching: NameMatching::default(),
            on_ambiguous_name: OnAmbiguousName::default(),
            identity: IdentityKey::default(),
            columns: ColumnConfig::default(),
            sentinels: SentinelConfig::default(),
            aggregation: AggregationColumns::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl OrgChartConfig {
    /// Fallback label for records without a stream
    pub fn stream_sentinel(&self) -> String {
        sentinel_or_default(&self.sentinels.stream, &self.columns.stream)
    }

    /// Fallback label for records without a theme
    pub fn theme_sentinel(&self) -> String {
        sentinel_or_default(&self.sentinels.theme, &self.columns.theme)
    }

    /// Fallback label for records without a team
    pub fn team_sentinel(&self) -> String {
        sentinel_or_default(&self.sentinels.team, &self.columns.team)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("columns.stream", &self.columns.stream),
            ("columns.theme", &self.columns.theme),
            ("columns.team", &self.columns.team),
            ("columns.status", &self.columns.status),
            ("columns.name", &self.columns.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(HierarchyError::invalid_config(format!(
                    "{field} must not be empty"
                )));
            }
        }

        let levels = [
            self.columns.stream.trim().to_lowercase(),
            self.columns.theme.trim().to_lowercase(),
            self.columns.team.trim().to_lowercase(),
        ];
        if levels[0] == levels[1] || levels[1] == levels[2] || levels[0] == levels[2] {
            return Err(HierarchyError::invalid_config(
                "stream, theme and team columns must be distinct",
            ));
        }

        if self.guest_roles.iter().any(|role| role.trim().is_empty()) {
            return Err(HierarchyError::invalid_config(
                "guest_roles must not contain empty column names",
            ));
        }

        if let IdentityKey::Column(column) = &self.identity {
            if column.trim().is_empty() {
                return Err(HierarchyError::invalid_config(
                    "identity column must not be empty",
                ));
            }
        }

        self.layout.validate()
    }
}

fn sentinel_or_default(custom: &Option<String>, column: &str) -> String {
    match custom {
        Some(label) if !label.trim().is_empty() => label.trim().to_string(),
        _ => format!("No {}", column.trim()),
    }
}

/// Source column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Level 1 (multi-valued)
    pub stream: String,

    /// Level 2 (multi-valued)
    pub theme: String,

    /// Level 3 (multi-valued)
    pub team: String,

    /// Activity flag column
    pub status: String,

    /// Status value (case-insensitive) that removes a row
    pub inactive_status: String,

    /// Preferred display name column
    pub name: String,

    /// Tried in order when the name column is blank
    pub fallback_names: Vec<String>,

    /// Display name used when every name column is blank
    pub unknown_name: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            stream: "Team Stream".to_string(),
            theme: "Team Theme".to_string(),
            team: "Team member of".to_string(),
            status: "Status".to_string(),
            inactive_status: "inactive".to_string(),
            name: "Name".to_string(),
            fallback_names: vec!["User".to_string(), "Company email".to_string()],
            unknown_name: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// Identity used for per-team de-duplication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityKey {
    /// Resolved display name
    #[default]
    DisplayName,

    /// A unique identifier column; blank cells fall back to the display name
    Column(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatching {
    /// Trimmed, case-insensitive equality
    #[default]
    Exact,

    /// Best fuzzy score wins
    Fuzzy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnAmbiguousName {
    /// Take the first match in hierarchy traversal order
    #[default]
    FirstMatch,

    /// Fail the resolution pass
    Error,

    /// Leave the guest out
    Skip,
}

/// Auxiliary columns used to decorate hierarchy nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationColumns {
    pub team_services: String,
    pub team_description: String,
    pub team_channels: String,
    pub team_email: String,
    pub theme_description: String,
    pub stream_description: String,
}

impl Default for AggregationColumns {
    fn default() -> Self {
        Self {
            team_services: "Team Managed Services".to_string(),
            team_description: "Team Description".to_string(),
            team_channels: "Team Channels".to_string(),
            team_email: "Team Email".to_string(),
            theme_description: "Team Theme Description".to_string(),
            stream_description: "Team Stream Description".to_string(),
        }
    }
}

/// Which teams feed the shared team box height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamHeightScope {
    /// One height for every team box, sized to the largest team anywhere
    #[default]
    Global,

    /// One height per stream, sized to that stream's largest team
    PerStream,
}

/// Layout constants (pixels unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Member cards per row inside a team box
    pub items_per_row: usize,

    /// Theme boxes per row inside a stream box
    pub themes_per_row: usize,

    pub card_width: f64,

    /// Number of text fields shown on a card
    pub card_fields: usize,

    /// Text lines reserved per field
    pub card_lines_per_field: f64,

    pub card_line_height: f64,

    /// Horizontal gap between cards
    pub card_pad_x: f64,

    /// Vertical gap between card rows
    pub card_row_gap: f64,

    pub card_origin_x: f64,
    pub card_origin_y: f64,

    /// Extra width added to a team box around one row of cards
    pub team_margin: f64,

    /// Gap between team boxes
    pub team_pad_x: f64,

    pub team_height_multiplier: f64,
    pub team_height_margin: f64,
    pub team_origin_x: f64,
    pub team_origin_y: f64,
    pub team_height_scope: TeamHeightScope,

    /// Room for the theme title
    pub theme_label_margin: f64,

    /// Gap between theme boxes in a row
    pub theme_pad_x: f64,

    /// Gap between theme rows
    pub theme_row_pad_y: f64,

    pub theme_height_multiplier: f64,
    pub theme_height_margin: f64,
    pub theme_origin_x: f64,
    pub theme_origin_y: f64,

    /// Extra width added to the widest theme row
    pub stream_margin: f64,

    pub stream_min_width: f64,

    /// Extra height added below the theme rows (title area)
    pub stream_height_margin: f64,

    /// Gap between stacked streams
    pub stream_gap_y: f64,

    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            items_per_row: 6,
            themes_per_row: 4,
            card_width: 160.0,
            card_fields: 5,
            card_lines_per_field: 4.0,
            card_line_height: 11.0,
            card_pad_x: 10.0,
            card_row_gap: 10.0,
            card_origin_x: 20.0,
            card_origin_y: 115.0,
            team_margin: 100.0,
            team_pad_x: 24.0,
            team_height_multiplier: 1.2,
            team_height_margin: 80.0,
            team_origin_x: 50.0,
            team_origin_y: 130.0,
            team_height_scope: TeamHeightScope::Global,
            theme_label_margin: 120.0,
            theme_pad_x: 60.0,
            theme_row_pad_y: 60.0,
            theme_height_multiplier: 1.2,
            theme_height_margin: 100.0,
            theme_origin_x: 60.0,
            theme_origin_y: 100.0,
            stream_margin: 80.0,
            stream_min_width: 600.0,
            stream_height_margin: 140.0,
            stream_gap_y: 100.0,
            origin_x: 40.0,
            origin_y: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Card height: half a spare field on top of the shown ones
    pub fn card_height(&self) -> f64 {
        (self.card_fields as f64 + 0.5) * self.card_lines_per_field * self.card_line_height
    }

    /// Team box width: one row of cards plus margin
    pub fn team_width(&self) -> f64 {
        self.items_per_row as f64 * self.card_width + self.team_margin
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.items_per_row == 0 {
            return Err(HierarchyError::invalid_config("layout.items_per_row must be > 0"));
        }
        if self.themes_per_row == 0 {
            return Err(HierarchyError::invalid_config("layout.themes_per_row must be > 0"));
        }

        let constants = [
            ("card_width", self.card_width),
            ("card_lines_per_field", self.card_lines_per_field),
            ("card_line_height", self.card_line_height),
            ("card_pad_x", self.card_pad_x),
            ("card_row_gap", self.card_row_gap),
            ("card_origin_x", self.card_origin_x),
            ("card_origin_y", self.card_origin_y),
            ("team_margin", self.team_margin),
            ("team_pad_x", self.team_pad_x),
            ("team_height_multiplier", self.team_height_multiplier),
            ("team_height_margin", self.team_height_margin),
            ("team_origin_x", self.team_origin_x),
            ("team_origin_y", self.team_origin_y),
            ("theme_label_margin", self.theme_label_margin),
            ("theme_pad_x", self.theme_pad_x),
            ("theme_row_pad_y", self.theme_row_pad_y),
            ("theme_height_multiplier", self.theme_height_multiplier),
            ("theme_height_margin", self.theme_height_margin),
            ("theme_origin_x", self.theme_origin_x),
            ("theme_origin_y", self.theme_origin_y),
            ("stream_margin", self.stream_margin),
            ("stream_min_width", self.stream_min_width),
            ("stream_height_margin", self.stream_height_margin),
            ("stream_gap_y", self.stream_gap_y),
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(HierarchyError::invalid_config(format!(
                    "layout.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if self.card_width == 0.0 || self.stream_min_width == 0.0 {
            return Err(HierarchyError::invalid_config(
                "layout.card_width and layout.stream_min_width must be > 0",
            ));
        }
        if self.team_height_multiplier == 0.0 || self.theme_height_multiplier == 0.0 {
            return Err(HierarchyError::invalid_config(
                "layout height multipliers must be > 0",
            ));
        }

        Ok(())
    }
}
