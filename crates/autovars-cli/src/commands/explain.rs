//! Explain command: how the variables were discovered

use colored::Colorize;
use std::fmt::Write;

use autovars_core::{Diagnostic, InventoryReport, RankTier, StopReason};

use crate::context::Loaded;
use crate::error::Result;

/// Run the explain command
pub fn run_explain(loaded: &Loaded, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.report)?);
    } else {
        print!("{}", render_explain(&loaded.report));
    }
    Ok(())
}

/// Human-readable account of a resolution run.
pub fn render_explain(report: &InventoryReport) -> String {
    let mut out = String::new();
    let unset = || "-".dimmed().to_string();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}  {}", "Inventory".dimmed(), report.inventory);
    let _ = writeln!(
        out,
        "{}    {}",
        "Project".dimmed(),
        report.tokens.project.as_deref().map_or_else(unset, |p| p.cyan().to_string())
    );
    let _ = writeln!(
        out,
        "{}        {}",
        "Env".dimmed(),
        report.tokens.environment.as_deref().map_or_else(unset, |e| e.cyan().to_string())
    );
    let _ = writeln!(
        out,
        "{}    {}",
        "Allowed".dimmed(),
        report.allowed.iter().collect::<Vec<_>>().join(", ")
    );
    let _ = writeln!(
        out,
        "{}   {}",
        "Stopped".dimmed(),
        stop_label(report.chain.stop_reason(), report.chain.top().as_str())
    );
    out.push('\n');

    let _ = writeln!(out, "{}", "Levels (farthest first)".bold());
    for scan in &report.levels {
        let _ = writeln!(out, "  {}", scan.level.path);
        if !scan.present {
            let _ = writeln!(out, "    {}", "(no group_vars)".dimmed());
            continue;
        }
        if scan.loaded.is_empty() && scan.skipped.is_empty() {
            let _ = writeln!(out, "    {}", "(empty)".dimmed());
        }
        for candidate in &scan.loaded {
            let name = candidate.path.file_name().unwrap_or_default();
            let _ = writeln!(
                out,
                "    {} {} [{}]",
                "+".green(),
                name,
                tier_label(candidate.rank.tier)
            );
        }
        for skipped in &scan.skipped {
            let name = skipped.path.file_name().unwrap_or_default();
            let _ = writeln!(out, "    {} {} ({})", "-".red(), name, skipped.reason);
        }
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "{} {} variables from {} files, {} hosts with inline overrides",
        "Merged".bold(),
        report.merged.vars.len(),
        report.loaded_files().len(),
        report.host_overrides
    );

    let notes: Vec<&Diagnostic> = report
        .diagnostics
        .iter()
        .filter(|d| {
            !matches!(
                d,
                Diagnostic::SkippedFile { .. } | Diagnostic::MissingGroupVars { .. }
            )
        })
        .collect();
    if !notes.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", "Diagnostics".bold());
        for note in notes {
            let _ = writeln!(out, "  {} {}", "!".yellow(), note);
        }
    }

    out
}

fn tier_label(tier: RankTier) -> &'static str {
    match tier {
        RankTier::All => "all",
        RankTier::Main => "main",
        RankTier::Project => "project",
        RankTier::Environment => "env",
        RankTier::Other => "other",
    }
}

fn stop_label(reason: StopReason, top: &str) -> String {
    match reason {
        StopReason::Boundary => format!("at boundary {top}"),
        StopReason::RootLimit => format!("at project root {top}"),
        StopReason::FilesystemRoot => format!("at filesystem root {top}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn lists_levels_and_files() {
        let rendered = render_explain(&fixtures::loaded().report);

        assert!(rendered.contains("at boundary /p/inventories"), "{rendered}");
        assert!(rendered.contains("all.yaml [all]"), "{rendered}");
        assert!(rendered.contains("shop.yaml [project]"), "{rendered}");
        assert!(rendered.contains("extra.yaml (not in allowed list)"), "{rendered}");
        assert!(rendered.contains("/p/inventories/acme/shop/dev"), "{rendered}");
        assert!(rendered.contains("all, dev, main, shop"), "{rendered}");
    }

    #[test]
    fn summary_counts_files_and_overrides() {
        let rendered = render_explain(&fixtures::loaded().report);
        assert!(
            rendered.contains("2 variables from 2 files, 1 hosts with inline overrides"),
            "{rendered}"
        );
    }

    #[test]
    fn notes_are_listed_under_diagnostics() {
        let mut report = fixtures::loaded().report;
        report.diagnostics.push(Diagnostic::NoFilesFound);
        let rendered = render_explain(&report);
        assert!(rendered.contains("no group_vars/*.yml|*.yaml files loaded"));
    }
}
