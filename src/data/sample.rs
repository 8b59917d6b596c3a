//! Synthetic nuclear-test records.
//!
//! Lets the tool run end to end without the external dataset. The generator
//! is seeded, so the same `(count, seed)` always yields the same records.
//! Shapes are loosely modelled on the real record: test counts per country,
//! active years, the move underground after 1963 and heavy-tailed yields.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{Country, ExplosionRecord, Purpose, TestType};
use crate::error::AppError;

/// Where and when a country tested.
struct Program {
    country: Country,
    weight: u32,
    years: (i32, i32),
    /// Last year with atmospheric testing.
    atmospheric_until: i32,
    sites: &'static [Site],
}

struct Site {
    region: &'static str,
    lat: f64,
    lon: f64,
}

const PROGRAMS: [Program; 7] = [
    Program {
        country: Country::Usa,
        weight: 1032,
        years: (1945, 1992),
        atmospheric_until: 1962,
        sites: &[
            Site { region: "NTS", lat: 37.1, lon: -116.05 },
            Site { region: "BIKINI", lat: 11.6, lon: 165.3 },
            Site { region: "ENEWETAK", lat: 11.5, lon: 162.3 },
            Site { region: "CHRISTMAS IS", lat: 1.9, lon: -157.4 },
        ],
    },
    Program {
        country: Country::Ussr,
        weight: 714,
        years: (1949, 1990),
        atmospheric_until: 1962,
        sites: &[
            Site { region: "SEMI KAZAKH", lat: 50.0, lon: 78.0 },
            Site { region: "N2 RUSS", lat: 73.4, lon: 54.9 },
            Site { region: "AZGIR KAZAKH", lat: 47.9, lon: 47.9 },
        ],
    },
    Program {
        country: Country::France,
        weight: 210,
        years: (1960, 1996),
        atmospheric_until: 1974,
        sites: &[
            Site { region: "MURUROA", lat: -21.8, lon: -138.9 },
            Site { region: "FANGATAUFA", lat: -22.2, lon: -138.7 },
            Site { region: "IN ECKER ALG", lat: 24.0, lon: 5.0 },
        ],
    },
    Program {
        country: Country::Uk,
        weight: 45,
        years: (1952, 1991),
        atmospheric_until: 1958,
        sites: &[
            Site { region: "MARALINGA", lat: -29.9, lon: 131.6 },
            Site { region: "MALDEN IS", lat: -4.0, lon: -154.9 },
            Site { region: "NTS", lat: 37.1, lon: -116.05 },
        ],
    },
    Program {
        country: Country::China,
        weight: 45,
        years: (1964, 1996),
        atmospheric_until: 1980,
        sites: &[Site { region: "LOP NOR", lat: 41.5, lon: 88.7 }],
    },
    Program {
        country: Country::India,
        weight: 3,
        years: (1974, 1998),
        atmospheric_until: 0,
        sites: &[Site { region: "POKHRAN", lat: 27.1, lon: 71.8 }],
    },
    Program {
        country: Country::Pakistan,
        weight: 2,
        years: (1998, 1998),
        atmospheric_until: 0,
        sites: &[Site { region: "CHAGAI", lat: 28.8, lon: 64.9 }],
    },
];

const PURPOSES: [(Purpose, u32); 5] = [
    (Purpose::WeaponsResearch, 80),
    (Purpose::WeaponsEffects, 8),
    (Purpose::Peaceful, 6),
    (Purpose::Safety, 4),
    (Purpose::Other, 2),
];

const ATMOSPHERIC_TYPES: [(TestType, u32); 5] = [
    (TestType::Airdrop, 30),
    (TestType::Tower, 30),
    (TestType::Atmospheric, 20),
    (TestType::Surface, 12),
    (TestType::Barge, 8),
];

/// Share of tests with no published yield.
const NO_YIELD_PROB: f64 = 0.1;
/// Share of tests published as a lower/upper range.
const RANGED_YIELD_PROB: f64 = 0.25;

pub fn generate_sample(count: usize, seed: u64) -> Result<Vec<ExplosionRecord>, AppError> {
    if count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let dist_err = |e: &dyn std::fmt::Display| AppError::new(2, format!("Sample distribution error: {e}"));

    let mut rng = StdRng::seed_from_u64(seed);
    let programs = WeightedIndex::new(PROGRAMS.iter().map(|p| p.weight)).map_err(|e| dist_err(&e))?;
    let purposes = WeightedIndex::new(PURPOSES.iter().map(|(_, w)| *w)).map_err(|e| dist_err(&e))?;
    let atmospheric = WeightedIndex::new(ATMOSPHERIC_TYPES.iter().map(|(_, w)| *w)).map_err(|e| dist_err(&e))?;
    // Median around 20 kt with a long tail into the megatons.
    let yields = LogNormal::new(20.0_f64.ln(), 1.6).map_err(|e| dist_err(&e))?;
    let jitter = Normal::new(0.0_f64, 0.25).map_err(|e| dist_err(&e))?;
    let depth = Normal::new(0.45_f64, 0.2).map_err(|e| dist_err(&e))?;

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let program = &PROGRAMS[programs.sample(&mut rng)];
        let site = &program.sites[rng.gen_range(0..program.sites.len())];
        let year = rng.gen_range(program.years.0..=program.years.1);

        let test_type = if year <= program.atmospheric_until && rng.gen_bool(0.85) {
            ATMOSPHERIC_TYPES[atmospheric.sample(&mut rng)].0
        } else if year <= program.atmospheric_until {
            TestType::Underwater
        } else {
            TestType::Underground
        };

        let (yield_lower, yield_upper) = if rng.gen_bool(NO_YIELD_PROB) {
            (None, None)
        } else {
            let kt = round1(yields.sample(&mut rng).max(0.1));
            if rng.gen_bool(RANGED_YIELD_PROB) {
                (Some(round1(kt * 0.5)), Some(round1(kt * 1.5)))
            } else {
                (Some(kt), Some(kt))
            }
        };

        records.push(ExplosionRecord {
            country: program.country,
            region: site.region.to_string(),
            year,
            month: rng.gen_range(1..=12),
            day: rng.gen_range(1..=28),
            latitude: Some(round2(site.lat + jitter.sample(&mut rng))),
            longitude: Some(round2(site.lon + jitter.sample(&mut rng))),
            depth: (test_type == TestType::Underground).then(|| round2(depth.sample(&mut rng).abs())),
            yield_lower,
            yield_upper,
            purpose: PURPOSES[purposes.sample(&mut rng)].0,
            test_type,
            name: format!("{}-{year}-{:04}", program.country.code(), i + 1),
        });
    }

    records.sort_by(|a, b| {
        (a.year, a.month, a.day)
            .cmp(&(b.year, b.month, b.day))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(records)
}

/// `source` string recorded in exports for a synthetic run.
pub fn sample_source(count: usize, seed: u64) -> String {
    format!("synthetic(seed={seed}, count={count})")
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
