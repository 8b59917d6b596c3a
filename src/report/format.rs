//! Plain-text rendering of a `Report`.
//!
//! All terminal formatting lives here so output changes stay localized and
//! the golden tests below catch accidental layout drift.

use std::fmt::Display;

use crate::domain::{
    CategoryShare, ComparisonEntry, CorrelationEntry, CrossTab, RankedTest, Section, TemporalBreakdown,
    Unavailable,
};

use super::Report;

const RULE_WIDTH: usize = 80;

fn banner(out: &mut String, title: &str) {
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
}

fn not_available(reason: Unavailable) -> String {
    format!("not available ({reason})\n")
}

/// Render a section with `body`, or its not-available reason.
fn section<T>(out: &mut String, s: &Section<T>, body: impl FnOnce(&T) -> String) {
    match s {
        Section::Available { value } => out.push_str(&body(value)),
        Section::NotAvailable { reason } => out.push_str(&not_available(*reason)),
    }
}

fn fmt_opt(v: Option<f64>, precision: usize) -> String {
    v.map(|v| format!("{v:.precision$}")).unwrap_or_else(|| "n/a".to_string())
}

fn line(out: &mut String, text: impl Display) {
    out.push_str(format!("{text}\n").trim_end());
    out.push('\n');
}

/// The full text report.
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();
    banner(&mut out, "NUCLEAR TEST RECORDS REPORT");

    heading(&mut out, "1. DATASET OVERVIEW");
    section(&mut out, &report.overall, |o| {
        let mut s = String::new();
        line(&mut s, format!("Total tests: {}", o.count));
        match &o.year_range {
            Section::Available { value } => line(&mut s, format!("Time period: {} - {}", value.first, value.last)),
            Section::NotAvailable { reason } => line(&mut s, format!("Time period: not available ({reason})")),
        }
        line(&mut s, format!("Countries: {}", o.country_count));
        s
    });

    heading(&mut out, "2. DATA QUALITY");
    let a = &report.anomalies;
    line(
        &mut out,
        format!("Records scanned: {} | flagged: {}", a.records_scanned, a.flagged_records),
    );
    for c in &a.counts {
        line(&mut out, format!("  {:<28} {:>6}", c.kind.label(), c.count));
    }
    let missing: Vec<String> = report
        .missing_values
        .iter()
        .filter(|m| m.missing > 0)
        .map(|m| format!("{}={}", m.field, m.missing))
        .collect();
    if missing.is_empty() {
        line(&mut out, "Missing values: none");
    } else {
        line(&mut out, format!("Missing values: {}", missing.join(", ")));
    }

    heading(&mut out, "3. COUNTRIES");
    section(&mut out, &report.by_country, |countries| {
        let mut s = String::new();
        line(
            &mut s,
            format!("{:<10} {:>6} {:>14} {:>12} {:>12}", "country", "tests", "total_kt", "mean_kt", "max_kt"),
        );
        line(&mut s, format!("{:-<10} {:-<6} {:-<14} {:-<12} {:-<12}", "", "", "", "", ""));
        for c in countries {
            line(
                &mut s,
                format!(
                    "{:<10} {:>6} {:>14} {:>12} {:>12}",
                    c.country.code(),
                    c.count,
                    fmt_opt(c.total_yield, 1),
                    fmt_opt(c.average_yield, 2),
                    fmt_opt(c.max_yield, 1),
                ),
            );
        }
        s
    });

    heading(&mut out, "4. TEMPORAL ANALYSIS");
    section(&mut out, &report.peak_year, |p| format!("Peak year: {} with {} tests\n", p.year, p.count));
    section(&mut out, &report.cold_war, |cw| {
        format!(
            "Cold War (1947-1991): {} tests ({:.1}%) | after 1991: {}\n",
            cw.cold_war, cw.cold_war_percentage, cw.post_cold_war
        )
    });
    out.push_str("\nBy decade:\n");
    section(&mut out, &report.by_decade, format_buckets);
    out.push_str("\nBy era:\n");
    section(&mut out, &report.by_era, format_buckets);

    heading(&mut out, "5. PURPOSE AND TYPE");
    out.push_str("By purpose:\n");
    section(&mut out, &report.by_purpose, |shares| format_shares(shares));
    out.push_str("\nBy type:\n");
    section(&mut out, &report.by_type, |shares| format_shares(shares));
    out.push_str("\nBy country and purpose:\n");
    section(&mut out, &report.country_purpose, format_crosstab);

    heading(&mut out, "6. YIELD ANALYSIS");
    let yields = match &report.overall {
        Section::Available { value } => value.yield_stats.clone(),
        Section::NotAvailable { reason } => Section::NotAvailable { reason: *reason },
    };
    section(&mut out, &yields, |y| {
        let mut s = String::new();
        line(&mut s, format!("Tests with yield data: {}", y.n));
        line(&mut s, format!("Mean yield: {:.2} kt", y.mean));
        line(&mut s, format!("Median yield: {:.2} kt", y.median));
        line(&mut s, format!("Maximum yield: {:.2} kt", y.max));
        line(&mut s, format!("Minimum yield: {:.2} kt", y.min));
        line(&mut s, format!("Standard deviation: {} kt", fmt_opt(y.std_dev, 2)));
        s
    });
    out.push_str("\nBy yield category:\n");
    section(&mut out, &report.yield_distribution, |d| format_shares(&d.shares));
    out.push_str("\nLargest tests:\n");
    section(&mut out, &report.top_n, |top| format_top_table(top));

    heading(&mut out, "7. CORRELATIONS AND COMPARISONS");
    for entry in &report.correlations {
        out.push_str(&format_correlation(entry));
    }
    out.push('\n');
    for entry in &report.comparisons {
        out.push_str(&format_comparison(entry));
    }

    heading(&mut out, "8. KEY INSIGHTS");
    if report.insights.is_empty() {
        line(&mut out, "none (no records)");
    }
    for (i, insight) in report.insights.iter().enumerate() {
        line(&mut out, format!("{}. {insight}", i + 1));
    }

    out
}

fn format_buckets(t: &TemporalBreakdown) -> String {
    let mut s = String::new();
    for b in &t.buckets {
        line(&mut s, format!("  {:<32} {:>6}", b.label, b.count));
    }
    if t.out_of_range > 0 {
        line(&mut s, format!("  ({} records outside 1945-1998 excluded)", t.out_of_range));
    }
    s
}

fn format_shares<K>(shares: &[CategoryShare<K>]) -> String {
    let mut s = String::new();
    for share in shares {
        line(
            &mut s,
            format!("  {:<24} {:>6} {:>7.1}%", share.label, share.count, share.percentage),
        );
    }
    s
}

/// Country rows against purpose columns. Each column is as wide as its label.
pub fn format_crosstab(tab: &CrossTab) -> String {
    let widths: Vec<usize> = tab.purposes.iter().map(|p| p.label().len().max(6)).collect();

    let mut s = String::new();
    let mut header = format!("  {:<8}", "country");
    for (purpose, w) in tab.purposes.iter().zip(&widths) {
        header.push_str(&format!(" {:>w$}", purpose.label()));
    }
    line(&mut s, header);

    for (country, row) in tab.countries.iter().zip(&tab.counts) {
        let mut text = format!("  {:<8}", country.code());
        for (count, w) in row.iter().zip(&widths) {
            text.push_str(&format!(" {count:>w$}"));
        }
        line(&mut s, text);
    }
    s
}

/// Table of ranked tests.
pub fn format_top_table(rows: &[RankedTest]) -> String {
    let mut out = String::new();
    line(
        &mut out,
        format!(
            "{:>4} {:<20} {:<8} {:>6} {:>12} {:<12}",
            "rank", "name", "country", "year", "yield_kt", "type"
        ),
    );
    line(
        &mut out,
        format!("{:-<4} {:-<20} {:-<8} {:-<6} {:-<12} {:-<12}", "", "", "", "", "", ""),
    );
    for r in rows {
        line(
            &mut out,
            format!(
                "{:>4} {:<20} {:<8} {:>6} {:>12.1} {:<12}",
                r.rank,
                truncate(&r.record.name, 20),
                r.record.country.code(),
                r.record.year,
                r.representative_yield,
                r.record.test_type.label(),
            ),
        );
    }
    out
}

/// One line per correlation pair.
pub fn format_correlation(entry: &CorrelationEntry) -> String {
    let pair = format!("{} ~ {}", entry.field_a.label(), entry.field_b.label());
    match &entry.result {
        Section::Available { value } => {
            format!("{pair:<24} r = {:>7.4} (n={})\n", value.coefficient, value.n)
        }
        Section::NotAvailable { reason } => format!("{pair:<24} {}", not_available(*reason)),
    }
}

/// Summary of one two-group comparison.
pub fn format_comparison(entry: &ComparisonEntry) -> String {
    let title = format!(
        "{} vs {} ({} by {:?})",
        entry.first,
        entry.second,
        entry.metric.label(),
        entry.group_field
    )
    .to_lowercase();
    match &entry.result {
        Section::Available { value } => {
            let mut s = String::new();
            line(&mut s, &title);
            for g in [&value.first, &value.second] {
                line(
                    &mut s,
                    format!("  {:<14} n={:<6} mean={:.2} sd={:.2}", g.label, g.n, g.mean, g.std_dev),
                );
            }
            line(
                &mut s,
                format!(
                    "  Welch t={:.3} df={:.1} p={:.4}",
                    value.statistic, value.degrees_of_freedom, value.p_value
                ),
            );
            s
        }
        Section::NotAvailable { reason } => format!("{title}: {}", not_available(*reason)),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Correlation, Country, ExplosionRecord, Field, GroupField, Purpose, TestType};

    fn ranked(rank: usize, name: &str, kt: f64) -> RankedTest {
        RankedTest {
            rank,
            representative_yield: kt,
            record: ExplosionRecord {
                country: Country::Ussr,
                region: "NZ".to_string(),
                year: 1961,
                month: 10,
                day: 30,
                latitude: None,
                longitude: None,
                depth: None,
                yield_lower: Some(kt),
                yield_upper: Some(kt),
                purpose: Purpose::WeaponsResearch,
                test_type: TestType::Airdrop,
                name: name.to_string(),
            },
        }
    }

    #[test]
    fn top_table_golden() {
        let txt = format_top_table(&[ranked(1, "TSAR BOMBA", 50_000.0), ranked(2, "A VERY LONG TEST NAME INDEED", 12.5)]);
        let expected = concat!(
            "rank name                 country    year     yield_kt type\n",
            "---- -------------------- -------- ------ ------------ ------------\n",
            "   1 TSAR BOMBA           USSR       1961      50000.0 airdrop\n",
            "   2 A VERY LONG TEST NA. USSR       1961         12.5 airdrop\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn correlation_lines() {
        let ok = CorrelationEntry {
            field_a: Field::Year,
            field_b: Field::Yield,
            result: Section::Available {
                value: Correlation {
                    field_a: Field::Year,
                    field_b: Field::Yield,
                    n: 12,
                    coefficient: -0.25,
                },
            },
        };
        assert_eq!(format_correlation(&ok), "year ~ yield             r = -0.2500 (n=12)\n");

        let missing = CorrelationEntry {
            field_a: Field::Depth,
            field_b: Field::Yield,
            result: Section::NotAvailable {
                reason: Unavailable::TooFewRecords { needed: 2, found: 0 },
            },
        };
        assert_eq!(
            format_correlation(&missing),
            "depth ~ yield            not available (insufficient data: need at least 2 records, found 0)\n"
        );
    }

    #[test]
    fn comparison_not_available() {
        let entry = ComparisonEntry {
            group_field: GroupField::Country,
            first: "USA".to_string(),
            second: "USSR".to_string(),
            metric: Field::Yield,
            result: Section::NotAvailable {
                reason: Unavailable::EmptyInput,
            },
        };
        assert_eq!(
            format_comparison(&entry),
            "usa vs ussr (yield by country): not available (no records)\n"
        );
    }

    #[test]
    fn crosstab_golden() {
        let tab = CrossTab {
            countries: vec![Country::Usa, Country::Ussr],
            purposes: vec![Purpose::WeaponsResearch, Purpose::Combat],
            counts: vec![vec![3, 0], vec![1, 2]],
        };
        let expected = concat!(
            "  country  weapons research combat\n",
            "  USA                     3      0\n",
            "  USSR                    1      2\n",
        );
        assert_eq!(format_crosstab(&tab), expected);
    }

    #[test]
    fn report_renders_country_by_purpose() {
        let txt = format_report(&crate::report::build_report(&crate::engine::fixtures::scenario(), 10));
        let block = txt
            .split("By country and purpose:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        assert_eq!(block.lines().count(), 3);
        assert!(block.lines().next().unwrap().contains("weapons research"));
        assert!(block.contains("USA"));
        assert!(block.contains("USSR"));
    }

    #[test]
    fn empty_report_still_renders() {
        let txt = format_report(&crate::report::build_report(&[], 10));
        assert!(txt.starts_with(&"=".repeat(80)));
        assert!(txt.contains("1. DATASET OVERVIEW"));
        assert!(txt.contains("not available (no records)"));
        assert!(txt.contains("none (no records)"));
    }
}
