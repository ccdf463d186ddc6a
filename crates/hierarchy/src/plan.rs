use crate::aggregate::{decorate, Decorations};
use crate::builder::HierarchyBuilder;
use crate::config::OrgChartConfig;
use crate::dataset::DatasetInfo;
use crate::error::Result;
use crate::layout::{LayoutEngine, LayoutPlan, StreamFilter};
use crate::record::normalize_records;
use crate::resolver::GuestResolver;
use crate::types::Organization;
use serde::{Deserialize, Serialize};

/// Result of one extraction pass: everything a renderer needs to draw the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgChart {
    pub dataset: DatasetInfo,

    /// Hierarchy with guests injected and sorted last
    pub hierarchy: Organization,

    /// Per-node rollups of the auxiliary columns
    pub decorations: Decorations,

    pub layout: LayoutPlan,
}

impl OrgChart {
    /// Run the full pipeline over a tokenized CSV.
    ///
    /// normalize → build → resolve guests → decorate → lay out. Nothing is
    /// cached between calls.
    pub fn extract(
        headers: &[String],
        rows: &[Vec<String>],
        config: &OrgChartConfig,
        filter: Option<&StreamFilter>,
    ) -> Result<Self> {
        config.validate()?;

        let records = normalize_records(headers, rows, &config.columns);
        let dataset = DatasetInfo::new(headers, rows, records.len());

        let base = HierarchyBuilder::new(config).build(&records);
        let hierarchy = GuestResolver::new(config).resolve(&base)?;
        let decorations = decorate(&base, headers, &config.aggregation);
        let layout = LayoutEngine::new(config)?.plan(&hierarchy, filter);

        log::info!(
            "Extracted org chart {}: {} streams, {} teams, {} guests",
            dataset.version(),
            hierarchy.stream_count(),
            hierarchy.team_count(),
            hierarchy.guest_count()
        );

        Ok(Self {
            dataset,
            hierarchy,
            decorations,
            layout,
        })
    }
}
