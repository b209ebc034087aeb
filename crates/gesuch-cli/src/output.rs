use std::io::Write;
use std::path::Path;

use gesuch_core::ExtractionResult;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Format an amount the Swiss way: `CHF 1'650'000.00`.
pub fn format_chf(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("CHF {}{}.{}", sign, grouped, frac_part)
}

/// Print one document's extraction result.
pub fn print_result(
    w: &mut dyn Write,
    path: &Path,
    result: &ExtractionResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if color.enabled() {
        writeln!(w, "{}", name.bold())?;
    } else {
        writeln!(w, "{}", name)?;
    }

    if !result.success {
        let msg = result.error.as_deref().unwrap_or("unknown error");
        if color.enabled() {
            writeln!(w, "  {} {}", "FAILED:".red(), msg)?;
        } else {
            writeln!(w, "  FAILED: {}", msg)?;
        }
        writeln!(w)?;
        return Ok(());
    }

    let language = if result.language.is_empty() {
        "-"
    } else {
        result.language.as_str()
    };
    let year = result
        .metadata
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(w, "  Language: {}   Year: {}", language, year)?;
    if let Some(applicant) = &result.metadata.applicant {
        writeln!(w, "  Applicant: {}", applicant)?;
    }

    if result.sub_projects.is_empty() {
        let msg = "No sub-projects found";
        if color.enabled() {
            writeln!(w, "  {}", msg.dimmed())?;
        } else {
            writeln!(w, "  {}", msg)?;
        }
        writeln!(w)?;
        return Ok(());
    }

    for sp in &result.sub_projects {
        let amount = format_chf(sp.budget);
        let origin = if sp.auto_detected { "" } else { " (list)" };
        if color.enabled() {
            writeln!(
                w,
                "  {:<5} {:>20}  {}{}",
                sp.label.cyan(),
                amount.green(),
                sp.name,
                origin.dimmed()
            )?;
        } else {
            writeln!(w, "  {:<5} {:>20}  {}{}", sp.label, amount, sp.name, origin)?;
        }
    }
    writeln!(w, "  {:<5} {:>20}", "Total", format_chf(result.total_budget()))?;
    writeln!(w)?;
    Ok(())
}

/// Print the batch summary.
pub fn print_summary(
    w: &mut dyn Write,
    results: &[ExtractionResult],
    color: ColorMode,
) -> std::io::Result<()> {
    let failed = results.iter().filter(|r| !r.success).count();
    let sub_projects: usize = results.iter().map(|r| r.sub_projects.len()).sum();
    let total: f64 = results.iter().map(ExtractionResult::total_budget).sum();

    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    writeln!(w, "  Documents: {}", results.len())?;
    writeln!(w, "  Sub-projects: {}", sub_projects)?;
    writeln!(w, "  Total budget: {}", format_chf(total))?;
    if failed > 0 {
        if color.enabled() {
            writeln!(w, "  {} {}", "Failed:".red(), failed)?;
        } else {
            writeln!(w, "  Failed: {}", failed)?;
        }
    }
    writeln!(w)?;
    Ok(())
}
