//! Markdown scan report

use crate::models::ScanSummary;
use anyhow::Result;

pub fn generate_markdown_report(summaries: &[ScanSummary]) -> Result<String> {
    let mut report = String::new();

    report.push_str("# Fragrance Scan Report\n\n");

    // Summary
    let containers: usize = summaries.iter().map(|s| s.containers.len()).sum();
    let buttons: usize = summaries
        .iter()
        .flat_map(|s| &s.containers)
        .filter(|c| c.button_attached)
        .count();

    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Pages Scanned**: {}\n", summaries.len()));
    report.push_str(&format!("- **Images Seen**: {}\n",
        summaries.iter().map(|s| s.images_seen).sum::<usize>()));
    report.push_str(&format!("- **Candidate Images**: {}\n",
        summaries.iter().map(|s| s.candidates).sum::<usize>()));
    report.push_str(&format!("- **Containers**: {}\n", containers));
    report.push_str(&format!("- **Buttons Attached**: {}\n\n", buttons));

    // Per page
    for summary in summaries {
        report.push_str(&format!("## {}\n\n", summary.source));

        if summary.containers.is_empty() {
            report.push_str("No fragrance images found.\n\n");
            continue;
        }

        report.push_str("| Container | Name | Button | Search |\n");
        report.push_str("|---|---|---|---|\n");
        for container in &summary.containers {
            report.push_str(&format!(
                "| `{}` | {} | {} | [Fragrantica]({}) |\n",
                container.element,
                container.name.replace('|', "\\|"),
                if container.button_attached { "✅" } else { "—" },
                container.search_url
            ));
        }
        report.push('\n');
    }

    Ok(report)
}
