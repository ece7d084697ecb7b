use std::collections::HashMap;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::license::classifier::classify;
use crate::models::{LicenseReport, LicenseRisk, Outcome};

/// Render a colored terminal report.
pub fn render(reports: &[LicenseReport], show_text: bool, quiet: bool) -> Result<()> {
    let total = reports.len();
    let resolved = reports
        .iter()
        .filter(|r| r.outcome == Outcome::Resolved)
        .count();
    let risks = count_risks(reports);
    let family_count = |r: LicenseRisk| risks.get(&r).copied().unwrap_or(0);

    if quiet {
        println!(
            "Total: {}  Resolved: {}  Unresolved: {}",
            total,
            resolved.to_string().green(),
            (total - resolved).to_string().yellow(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "license-lookup".bold(),
        env!("CARGO_PKG_VERSION")
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Input").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Outcome").add_attribute(Attribute::Bold),
        ]);

    for report in reports {
        let risk = classify(&report.license_type);
        table.add_row(vec![
            Cell::new(&report.dep_name),
            Cell::new(&report.input),
            Cell::new(&report.license_type),
            Cell::new(risk.to_string()).fg(risk_color(risk)),
            Cell::new(report.outcome.to_string())
                .fg(outcome_color(report.outcome))
                .set_alignment(CellAlignment::Center),
        ]);
    }
    println!("{}\n", table);

    println!(
        " {} resolved  {} unresolved  ({} permissive, {} weak copyleft, {} strong copyleft, {} proprietary, {} unknown)",
        format!("{}/{}", resolved, total).green().bold(),
        (total - resolved).to_string().yellow().bold(),
        family_count(LicenseRisk::Permissive),
        family_count(LicenseRisk::WeakCopyleft),
        family_count(LicenseRisk::StrongCopyleft),
        family_count(LicenseRisk::Proprietary),
        family_count(LicenseRisk::Unknown),
    );

    if show_text {
        for report in reports.iter().filter(|r| !r.text.is_empty()) {
            println!(
                "\n {} {} ({})\n",
                "──".dimmed(),
                report.dep_name.bold(),
                report.license_type
            );
            println!("{}", report.text.trim_end());
        }
    }

    Ok(())
}

fn count_risks(reports: &[LicenseReport]) -> HashMap<LicenseRisk, usize> {
    let mut counts = HashMap::new();
    for report in reports {
        *counts.entry(classify(&report.license_type)).or_insert(0) += 1;
    }
    counts
}

fn risk_color(risk: LicenseRisk) -> Color {
    match risk {
        LicenseRisk::Permissive => Color::Green,
        LicenseRisk::WeakCopyleft => Color::Yellow,
        LicenseRisk::StrongCopyleft => Color::Red,
        LicenseRisk::Proprietary => Color::Magenta,
        LicenseRisk::Unknown => Color::DarkGrey,
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Resolved => Color::Green,
        Outcome::NotFound | Outcome::Unsupported => Color::Yellow,
        Outcome::Failed | Outcome::TimedOut => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LicenseClassification;

    fn report(license: &str, outcome: Outcome) -> LicenseReport {
        LicenseReport::new(
            "dep".to_string(),
            "dep".to_string(),
            LicenseClassification::new(license, ""),
            outcome,
        )
    }

    #[test]
    fn test_count_risks() {
        let reports = vec![
            report("MIT", Outcome::Resolved),
            report("Apache-2.0 OR MIT", Outcome::Resolved),
            report("GPL-3.0", Outcome::Resolved),
            report(crate::models::UNKNOWN_LICENSE, Outcome::NotFound),
        ];
        let counts = count_risks(&reports);
        assert_eq!(counts.get(&LicenseRisk::Permissive), Some(&2));
        assert_eq!(counts.get(&LicenseRisk::StrongCopyleft), Some(&1));
        assert_eq!(counts.get(&LicenseRisk::Unknown), Some(&1));
        assert_eq!(counts.get(&LicenseRisk::Proprietary), None);
    }

    #[test]
    fn test_render_does_not_fail() {
        let reports = vec![report("MIT", Outcome::Resolved)];
        assert!(render(&reports, true, false).is_ok());
        assert!(render(&reports, false, true).is_ok());
        assert!(render(&[], false, false).is_ok());
    }
}
