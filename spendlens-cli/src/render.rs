//! Plain-text panels for insight, anomaly, and coach output.

use rust_decimal::Decimal;
use spendlens_coach::CoachReport;
use spendlens_core::{
    AnomalyRecord, DataQuality, Insight, InsightPriority, MonthSummary, RecPriority,
};
use std::collections::BTreeMap;
use std::fmt::Write;

fn priority_tag(priority: InsightPriority) -> &'static str {
    match priority {
        InsightPriority::Info => "info",
        InsightPriority::Warning => "warn",
        InsightPriority::High => "high",
    }
}

/// The scrollable insights panel: monthly summary, findings, data quality
pub fn insights_panel(
    months: &BTreeMap<String, MonthSummary>,
    insights: &[Insight],
    quality: &DataQuality,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SPENDING INSIGHTS");
    let _ = writeln!(out, "=================");

    if !months.is_empty() {
        let _ = writeln!(out, "\nMonthly summary:");
        for (month, summary) in months {
            let _ = writeln!(
                out,
                "  {}: income {:.2}, expenses {:.2}, net {:.2}",
                month,
                summary.income,
                summary.expense,
                summary.net()
            );
        }
    }

    if insights.is_empty() {
        let _ = writeln!(out, "\nNo transactions to analyze.");
    } else {
        let _ = writeln!(out, "\nFindings:");
        for insight in insights {
            let _ = writeln!(out, "  [{}] {}", priority_tag(insight.priority), insight.text);
        }
    }

    if !quality.is_clean() {
        let _ = writeln!(
            out,
            "\nNote: {} transaction(s) had unparseable dates and were left out of date-based views.",
            quality.malformed_dates
        );
    }
    out
}

/// Flat anomaly listing for both detector variants
pub fn anomalies_panel(by_category: &[AnomalyRecord], by_month: &[AnomalyRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "UNUSUAL TRANSACTIONS");
    let _ = writeln!(out, "====================");

    for (title, records) in [("By category:", by_category), ("By month (expenses):", by_month)] {
        let _ = writeln!(out, "\n{title}");
        if records.is_empty() {
            let _ = writeln!(out, "  none detected");
        }
        for record in records {
            let label = if record.description.is_empty() {
                "(no description)"
            } else {
                record.description.as_str()
            };
            let _ = writeln!(
                out,
                "  {} | {} = {:.2} (z-score {:.2})",
                record.group_key, label, record.amount, record.z_score
            );
        }
    }
    out
}

/// Coach panel with the status line up top
pub fn coach_panel(income: Decimal, report: &CoachReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SAVINGS COACH");
    let _ = writeln!(out, "=============");
    let _ = writeln!(out, "{}", report.status.describe());
    let _ = writeln!(out, "\nIncome:              {:.2}", income);
    let _ = writeln!(out, "Total spending:      {:.2}", report.total_spend);
    let _ = writeln!(out, "Disposable income:   {:.2}", report.disposable_income);
    let _ = writeln!(
        out,
        "Savings goal:        {:.1}% = {:.2}",
        report.savings_pct, report.recommended_savings
    );

    if report.recommendations.is_empty() {
        let _ = writeln!(out, "\nNo spending to advise on yet.");
    } else {
        let _ = writeln!(out, "\nRecommendations:");
        for rec in &report.recommendations {
            let tag = match rec.priority {
                RecPriority::High => "high",
                RecPriority::Low => "low ",
            };
            let _ = writeln!(
                out,
                "  [{}] {} -> target {:.2}",
                tag, rec.message, rec.suggested_target
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spendlens_core::InsightKind;

    #[test]
    fn test_insights_panel_mentions_data_quality() {
        let quality = DataQuality { malformed_dates: 2 };
        let panel = insights_panel(&BTreeMap::new(), &[], &quality);
        assert!(panel.contains("2 transaction(s)"));
        assert!(panel.contains("No transactions"));
    }

    #[test]
    fn test_insights_panel_lists_findings_in_order() {
        let insights = vec![
            Insight {
                kind: InsightKind::Summary,
                text: "Total spending analyzed: 450.00".into(),
                priority: InsightPriority::Info,
            },
            Insight {
                kind: InsightKind::Trend,
                text: "Groceries is your highest spending category".into(),
                priority: InsightPriority::Warning,
            },
        ];
        let panel = insights_panel(&BTreeMap::new(), &insights, &DataQuality::default());
        let summary_at = panel.find("450.00").unwrap();
        let trend_at = panel.find("Groceries").unwrap();
        assert!(summary_at < trend_at);
        assert!(panel.contains("[warn]"));
    }

    #[test]
    fn test_anomalies_panel_empty_sections() {
        let panel = anomalies_panel(&[], &[]);
        assert_eq!(panel.matches("none detected").count(), 2);
    }

    #[test]
    fn test_coach_panel_headline_numbers() {
        let report = CoachReport {
            status: spendlens_coach::CoachStatus::HeuristicNotTrained,
            total_spend: dec!(20000),
            savings_pct: dec!(20),
            recommended_savings: dec!(10000),
            disposable_income: dec!(30000),
            recommendations: vec![],
        };
        let panel = coach_panel(dec!(50000), &report);
        assert!(panel.contains("No trained model"));
        assert!(panel.contains("30000.00"));
        assert!(panel.contains("20.0% = 10000.00"));
    }
}
