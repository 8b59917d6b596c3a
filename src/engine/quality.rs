use crate::domain::{
    AnomalyCount, AnomalyKind, AnomalyReport, Country, DataQualityIssue, ExplosionRecord, MissingField,
    Purpose, TestType, YieldStatus,
};

/// Every data-quality finding in `records`, one issue per (record, kind).
///
/// Never fails: an empty input scans zero records.
pub fn scan_anomalies(records: &[ExplosionRecord]) -> AnomalyReport {
    let mut issues = Vec::new();
    let mut flagged_records = 0;

    for (index, r) in records.iter().enumerate() {
        let before = issues.len();
        for kind in record_anomalies(r) {
            issues.push(DataQualityIssue {
                index,
                name: r.name.clone(),
                kind,
            });
        }
        if issues.len() > before {
            flagged_records += 1;
        }
    }

    let counts = AnomalyKind::ALL
        .into_iter()
        .map(|kind| AnomalyCount {
            kind,
            count: issues.iter().filter(|i| i.kind == kind).count(),
        })
        .filter(|c| c.count > 0)
        .collect();

    AnomalyReport {
        records_scanned: records.len(),
        flagged_records,
        counts,
        issues,
    }
}

fn record_anomalies(r: &ExplosionRecord) -> Vec<AnomalyKind> {
    let mut kinds = Vec::new();

    if !r.in_study_period() {
        kinds.push(AnomalyKind::YearOutOfRange);
    }
    // Month/day of 0 mean "unknown" in the dataset, not an invalid date.
    if r.month != 0 && r.day != 0 && r.date().is_none() {
        kinds.push(AnomalyKind::InvalidDate);
    }
    match r.yield_status() {
        YieldStatus::Present(_) => {}
        YieldStatus::Missing => kinds.push(AnomalyKind::MissingYield),
        YieldStatus::Inverted => kinds.push(AnomalyKind::InvertedYieldBounds),
        YieldStatus::Negative => kinds.push(AnomalyKind::NegativeYield),
    }
    if r.country == Country::Unknown {
        kinds.push(AnomalyKind::UnknownCountry);
    }
    if r.purpose == Purpose::Unknown {
        kinds.push(AnomalyKind::UnknownPurpose);
    }
    if r.test_type == TestType::Unknown {
        kinds.push(AnomalyKind::UnknownType);
    }

    kinds
}

/// Count of absent values per optional field.
pub fn compute_missing_values(records: &[ExplosionRecord]) -> Vec<MissingField> {
    let optional: [(&str, fn(&ExplosionRecord) -> bool); 6] = [
        ("region", |r: &ExplosionRecord| r.region.trim().is_empty()),
        ("latitude", |r: &ExplosionRecord| r.latitude.is_none()),
        ("longitude", |r: &ExplosionRecord| r.longitude.is_none()),
        ("depth", |r: &ExplosionRecord| r.depth.is_none()),
        ("yield_lower", |r: &ExplosionRecord| r.yield_lower.is_none()),
        ("yield_upper", |r: &ExplosionRecord| r.yield_upper.is_none()),
    ];

    optional
        .into_iter()
        .map(|(field, is_missing)| MissingField {
            field: field.to_string(),
            missing: records.iter().filter(|r| is_missing(r)).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{rec, scenario};

    #[test]
    fn clean_records_have_no_issues() {
        let report = scan_anomalies(&scenario());
        assert_eq!(report.records_scanned, 3);
        assert_eq!(report.flagged_records, 0);
        assert!(report.counts.is_empty());
    }

    #[test]
    fn each_anomaly_kind_is_tallied() {
        let mut records = scenario();
        records.push(rec(Country::Usa, 2001, Some(1.0), "LATE"));
        records.push(rec(Country::Unknown, 1960, None, "MYSTERY"));

        let mut inverted = rec(Country::Usa, 1960, None, "INVERTED");
        inverted.yield_lower = Some(50.0);
        inverted.yield_upper = Some(10.0);
        inverted.purpose = Purpose::Unknown;
        inverted.test_type = TestType::Unknown;
        records.push(inverted);

        let mut feb30 = rec(Country::Usa, 1960, Some(-5.0), "FEB30");
        feb30.month = 2;
        feb30.day = 30;
        records.push(feb30);

        let report = scan_anomalies(&records);
        assert_eq!(report.records_scanned, 7);
        assert_eq!(report.flagged_records, 4);
        for kind in AnomalyKind::ALL {
            assert_eq!(report.count(kind), 1, "{kind:?}");
        }
        let mystery: Vec<AnomalyKind> = report
            .issues
            .iter()
            .filter(|i| i.name == "MYSTERY")
            .map(|i| i.kind)
            .collect();
        assert_eq!(mystery, vec![AnomalyKind::MissingYield, AnomalyKind::UnknownCountry]);
        assert_eq!(report.issues[0].index, 3);
    }

    #[test]
    fn unknown_month_is_not_an_invalid_date() {
        let mut r = rec(Country::Usa, 1960, Some(1.0), "A");
        r.month = 0;
        r.day = 0;
        assert_eq!(scan_anomalies(&[r]).flagged_records, 0);
    }

    #[test]
    fn missing_values_per_field() {
        let mut records = scenario();
        records[0].latitude = None;
        records[1].region = String::new();
        let missing = compute_missing_values(&records);
        let lookup = |name: &str| missing.iter().find(|m| m.field == name).map(|m| m.missing);
        assert_eq!(lookup("depth"), Some(3));
        assert_eq!(lookup("latitude"), Some(1));
        assert_eq!(lookup("region"), Some(1));
        assert_eq!(lookup("yield_upper"), Some(0));
    }

    #[test]
    fn empty_input_scans_nothing() {
        let report = scan_anomalies(&[]);
        assert_eq!(report.records_scanned, 0);
        assert!(compute_missing_values(&[]).iter().all(|m| m.missing == 0));
    }
}
