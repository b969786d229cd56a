//! Text and JSON output for computed estimates.

use std::io::{self, Write};

use chrono::NaiveDate;
use serde::Serialize;
use tax_core::calculations::common::format_currency;
use tax_core::calculations::compare_deductions;
use tax_core::report::{SummaryLine, SummarySection, summary_lines};
use tax_core::{GuidanceCategory, GuidanceItem, GuidanceReport};

use crate::Estimate;

const RULE: &str = "============================================================";

/// Writes the summary document, then the guidance grouped by category.
pub fn write_text<W: Write>(
    out: &mut W,
    estimate: &Estimate,
    generated_on: NaiveDate,
) -> io::Result<()> {
    let result = &estimate.result;

    writeln!(out, "{RULE}")?;
    writeln!(out, "{} Tax Estimate Summary", result.tax_year)?;
    writeln!(out, "Generated {}", generated_on.format("%B %-d, %Y"))?;
    writeln!(
        out,
        "Filing status: {} | State: {} | NYC resident: {}",
        result.filing_status,
        result.state,
        if result.nyc_resident { "yes" } else { "no" },
    )?;
    writeln!(out, "{RULE}")?;

    write_summary(out, &summary_lines(result))?;

    if let Some(itemized) = &result.itemized {
        let comparison = compare_deductions(result.standard_deduction, itemized.total);
        writeln!(out)?;
        writeln!(
            out,
            "Itemized total {} vs standard {}: {}",
            format_currency(itemized.total),
            format_currency(result.standard_deduction),
            comparison.message(),
        )?;
    }

    if let Some(guidance) = &estimate.guidance {
        writeln!(out)?;
        write_guidance(out, guidance)?;
    }
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    lines: &[SummaryLine],
) -> io::Result<()> {
    let mut section: Option<SummarySection> = None;
    for line in lines {
        if section != Some(line.section) {
            writeln!(out)?;
            writeln!(out, "{}", line.section.title())?;
            section = Some(line.section);
        }
        let label = match line.reference {
            Some(reference) => format!("{reference}: {}", line.label),
            None => line.label.clone(),
        };
        writeln!(out, "  {label:<52}{:>14}", line.value.to_string())?;
    }
    Ok(())
}

fn write_guidance<W: Write>(
    out: &mut W,
    report: &GuidanceReport,
) -> io::Result<()> {
    writeln!(out, "Tax Reduction Guidance")?;
    for category in GuidanceCategory::ALL {
        writeln!(out)?;
        writeln!(out, "{}", category.heading())?;

        let mut items = report.by_category(category).peekable();
        if items.peek().is_none() {
            writeln!(out, "  No additional recommendations in this category.")?;
            continue;
        }
        for item in items {
            write_item(out, item)?;
        }
    }
    writeln!(out)?;
    writeln!(
        out,
        "Total potential savings: {}",
        format_currency(report.total_potential_savings)
    )?;
    Ok(())
}

fn write_item<W: Write>(
    out: &mut W,
    item: &GuidanceItem,
) -> io::Result<()> {
    writeln!(out, "  [{}] {}", item.priority.as_str(), item.title)?;
    writeln!(out, "      {}", item.description)?;
    if let Some(savings) = item.estimated_annual_savings {
        writeln!(out, "      Estimated savings: {}/year", format_currency(savings))?;
    }
    if let Some(calculation) = &item.calculation {
        writeln!(out, "      {calculation}")?;
    }
    if !item.limit_text.is_empty() {
        writeln!(out, "      {}", item.limit_text)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonEstimate<'a> {
    #[serde(flatten)]
    estimate: &'a Estimate,
    summary: Vec<SummaryLine>,
}

/// Pretty-printed JSON array, one entry per estimate, each carrying the
/// request, the full result, the summary lines and the guidance.
pub fn to_json(estimates: &[Estimate]) -> serde_json::Result<String> {
    let entries: Vec<JsonEstimate<'_>> = estimates
        .iter()
        .map(|estimate| JsonEstimate {
            estimate,
            summary: summary_lines(&estimate.result),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{DeductionType, FilingStatus, State, TaxRequest};
    use tax_data::embedded_tables;

    use super::*;
    use crate::estimate;

    fn wage_earner(with_guidance: bool) -> Estimate {
        let mut request = TaxRequest::new(2025, FilingStatus::Single, State::NewYork);
        request.income.gross_wages = dec!(80000);
        request.withholdings.federal = dec!(10000);
        let tables = embedded_tables().expect("embedded tables load");
        estimate(tables, request, with_guidance).expect("2025 supported")
    }

    fn render(estimate: &Estimate) -> String {
        let mut out = Vec::new();
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date");
        write_text(&mut out, estimate, date).expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn text_header_names_year_status_and_date() {
        let text = render(&wage_earner(false));

        assert!(text.contains("2025 Tax Estimate Summary"));
        assert!(text.contains("Generated April 1, 2025"));
        assert!(text.contains("Filing status: Single | State: NY | NYC resident: no"));
    }

    #[test]
    fn text_summary_carries_line_references() {
        let text = render(&wage_earner(false));

        let agi = text
            .lines()
            .find(|line| line.contains("Line 11: Adjusted gross income"))
            .expect("AGI line");
        assert!(agi.trim_end().ends_with("$80,000"));
        assert!(text.contains("Line 12: Standard deduction"));
        assert!(!text.contains("New York City"));
        assert!(!text.contains("Tax Reduction Guidance"));
    }

    #[test]
    fn text_compares_deductions_for_itemizers() {
        let mut request = TaxRequest::new(2025, FilingStatus::Single, State::NewJersey);
        request.income.gross_wages = dec!(120000);
        request.deduction_type = DeductionType::Itemized;
        request.itemized.mortgage_interest = dec!(14000);
        request.itemized.property_taxes = dec!(8000);
        let tables = embedded_tables().expect("embedded tables load");
        let estimate = estimate(tables, request, false).expect("2025 supported");

        let text = render(&estimate);

        // 14000 + 8000 itemized against the 15000 single standard deduction
        assert!(text.contains(
            "Itemized total $22,000 vs standard $15,000: Itemize and save $7,000 more in deductions"
        ));
        assert!(text.contains("Line 12: Itemized deductions"));
    }

    #[test]
    fn text_guidance_lists_every_category() {
        let text = render(&wage_earner(true));

        for category in GuidanceCategory::ALL {
            assert!(text.contains(category.heading()), "{}", category.heading());
        }
        assert!(text.contains("[high] Maximize 401(k) Contributions"));
        assert!(text.contains("Total potential savings:"));
    }

    #[test]
    fn text_guidance_reports_empty_category() {
        let report = GuidanceReport::default();
        let mut out = Vec::new();

        write_guidance(&mut out, &report).expect("write to Vec");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert_eq!(
            text.matches("No additional recommendations in this category.")
                .count(),
            4
        );
        assert!(text.contains("Total potential savings: $0"));
    }

    #[test]
    fn json_output_includes_result_summary_and_guidance() {
        let json = to_json(&[wage_earner(true)]).expect("serializable");

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        let entry = &value[0];
        assert_eq!(entry["request"]["tax_year"], 2025);
        assert_eq!(entry["result"]["filing_status"], "Single");
        assert!(entry["summary"].as_array().is_some_and(|lines| !lines.is_empty()));
        assert!(entry["guidance"]["items"].as_array().is_some());
    }
}
