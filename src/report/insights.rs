use crate::domain::Purpose;

use super::Report;

/// Plain-language findings drawn from an already-built report.
///
/// A finding whose section is not available is left out rather than
/// padded with a placeholder number.
pub fn key_insights(report: &Report) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(overall) = report.overall.value() {
        out.push(format!("Total nuclear tests recorded: {}", overall.count));
        if let Some(range) = overall.year_range.value() {
            out.push(format!(
                "Time period: {} to {} ({} years)",
                range.first,
                range.last,
                range.last - range.first
            ));
        }
        out.push(format!("Countries conducting tests: {}", overall.country_count));
    }

    if let Some(countries) = report.by_country.value() {
        let top: Vec<String> = countries
            .iter()
            .take(3)
            .map(|c| format!("{} ({})", c.country.code(), c.count))
            .collect();
        out.push(format!("Top 3 countries: {}", top.join(", ")));
    }

    if let Some(peak) = report.peak_year.value() {
        out.push(format!("Peak year of testing: {} with {} tests", peak.year, peak.count));
    }

    if let Some(cw) = report.cold_war.value() {
        out.push(format!(
            "Cold War era tests (1947-1991): {} ({:.1}% of all tests)",
            cw.cold_war, cw.cold_war_percentage
        ));
        out.push(format!("Post-Cold War tests (1992+): {}", cw.post_cold_war));
    }

    let yields = report.overall.value().and_then(|o| o.yield_stats.value());
    if let Some(y) = yields {
        out.push(format!("Average yield: {:.2} kilotons", y.mean));
    }
    if let Some(largest) = report.largest_test.value() {
        out.push(format!(
            "Largest test: {:.2} kilotons ({})",
            largest.representative_yield, largest.record.name
        ));
    }

    if let Some(purposes) = report.by_purpose.value() {
        if let Some(top) = purposes.first() {
            out.push(format!("Most common purpose: {} ({} tests)", top.label, top.count));
        }
        let combat = purposes
            .iter()
            .find(|p| p.category == Purpose::Combat)
            .map(|p| p.count)
            .unwrap_or(0);
        out.push(format!("Combat use: {combat} explosions"));
    }
    if let Some(top) = report.by_type.value().and_then(|types| types.first()) {
        out.push(format!("Most common type: {} ({} tests)", top.label, top.count));
    }

    out
}
