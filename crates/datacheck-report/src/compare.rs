//! Multi-file distribution comparison report.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use datacheck_model::Distribution;

/// One file's distribution in a comparison.
#[derive(Debug, Clone)]
pub struct DistributionEntry {
    pub file: String,
    pub sample_count: usize,
    pub distribution: Distribution,
}

/// Render a field-by-field Markdown comparison of several distributions.
pub fn comparison_markdown(entries: &[DistributionEntry]) -> String {
    let mut md = String::new();
    md.push_str("# Distribution comparison\n\n## Files\n\n");
    md.push_str("| File | Samples |\n|------|--------|\n");
    for entry in entries {
        let _ = writeln!(md, "| {} | {} |", entry.file, entry.sample_count);
    }
    md.push_str("\n## Fields\n\n");

    let field_names: BTreeSet<&String> = entries
        .iter()
        .flat_map(|entry| entry.distribution.fields.keys())
        .collect();

    for field_name in field_names {
        let _ = writeln!(md, "### {field_name}\n");
        for entry in entries {
            let Some(stats) = entry.distribution.fields.get(field_name) else {
                continue;
            };
            if let Some(lengths) = stats.length_stats {
                let _ = writeln!(
                    md,
                    "- **{}**: length {}-{} (avg {:.0})",
                    entry.file, lengths.min, lengths.max, lengths.avg
                );
            } else if let Some(values) = stats.value_stats {
                let _ = writeln!(
                    md,
                    "- **{}**: value {}-{} (avg {:.1})",
                    entry.file, values.min, values.max, values.avg
                );
            }
        }
        md.push('\n');
    }

    md
}
