use solitaire_hierarchy::{OrgChart, StreamFilter};
use std::collections::HashSet;

/// Markdown outline of a resolved hierarchy
pub fn render_outline(chart: &OrgChart, filter: Option<&StreamFilter>) -> String {
    let visible: Vec<_> = chart
        .hierarchy
        .streams
        .iter()
        .filter(|(name, _)| filter.map_or(true, |f| f.allows(name)))
        .collect();

    let mut md = String::new();
    md.push_str("# Org chart outline\n\n");
    md.push_str(&format!("- Dataset: `{}`\n", chart.dataset.version()));
    md.push_str(&format!(
        "- Rows: `{}` (active `{}`)\n",
        chart.dataset.rows, chart.dataset.active_records
    ));
    md.push_str(&format!("- Guests: `{}`\n\n", chart.hierarchy.guest_count()));

    md.push_str("| stream | themes | teams | people |\n");
    md.push_str("|---|---:|---:|---:|\n");
    for (name, stream) in &visible {
        let teams: usize = stream.themes.values().map(|t| t.teams.len()).sum();
        let people: HashSet<&str> = stream.members().map(|m| m.name.as_str()).collect();
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(name),
            stream.themes.len(),
            teams,
            people.len()
        ));
    }
    md.push('\n');

    for (stream_name, stream) in &visible {
        md.push_str(&format!("## {stream_name}\n\n"));
        let stream_info = chart.decorations.streams.get(stream_name.as_str());
        if let Some(info) = stream_info.filter(|i| !i.description.is_empty()) {
            md.push_str(&format!("> {}\n\n", truncate_one_line(&info.description, 200)));
        }

        for (theme_name, theme) in &stream.themes {
            md.push_str(&format!("### {theme_name}\n\n"));
            let theme_info = stream_info.and_then(|s| s.themes.get(theme_name));
            if let Some(info) = theme_info.filter(|i| !i.description.is_empty()) {
                md.push_str(&format!("> {}\n\n", truncate_one_line(&info.description, 200)));
            }

            for (team_name, team) in &theme.teams {
                md.push_str(&format!("#### {team_name}\n\n"));
                let team_info = theme_info.and_then(|t| t.teams.get(team_name));
                if let Some(info) = team_info.filter(|i| !i.services.items.is_empty()) {
                    md.push_str(&format!(
                        "Services ({}): {}\n\n",
                        info.services.items.len(),
                        info.services.items.join(", ")
                    ));
                }

                for member in team.iter() {
                    let line = match &member.guest_role {
                        Some(role) => format!("- {} _(guest: {role})_\n", member.name),
                        None => format!("- {}\n", member.name),
                    };
                    md.push_str(&line);
                }
                md.push('\n');
            }
        }
    }

    md
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let s = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
