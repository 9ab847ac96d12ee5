// Integration tests for Neighborhood Match

use std::collections::HashMap;

use neighborhood_match::cli::{match_records, run_streams};
use neighborhood_match::config::Settings;
use neighborhood_match::{
    AppError, CapacityPolicy, Homeowner, InputReader, MatchError, MatchInput, Matcher,
    Neighborhood, OccupantOrder, Ratings,
};

const SAMPLE: &str = include_str!("fixtures/sample_input.txt");

/// Small deterministic generator so runs are reproducible without extra crates
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }

    fn rating(&mut self) -> Ratings {
        Ratings::new(
            self.below(11) as u8,
            self.below(11) as u8,
            self.below(11) as u8,
        )
    }
}

fn generate_input(seed: u64, neighborhoods: usize, homeowners: usize) -> MatchInput {
    let mut rng = Lcg(seed);

    let neighborhoods: Vec<Neighborhood> = (0..neighborhoods)
        .map(|i| Neighborhood::new(format!("N{}", i), rng.rating()))
        .collect();

    let homeowners = (0..homeowners)
        .map(|i| {
            // Fisher-Yates shuffle for a complete ranking
            let mut prefs: Vec<String> = neighborhoods.iter().map(|n| n.id.clone()).collect();
            for j in (1..prefs.len()).rev() {
                let k = rng.below(j + 1);
                prefs.swap(j, k);
            }
            Homeowner::new(format!("H{}", i), rng.rating(), prefs)
        })
        .collect();

    MatchInput {
        neighborhoods,
        homeowners,
    }
}

fn assert_valid_assignment(input: &MatchInput, policy: CapacityPolicy) {
    let assignment = Matcher::new(policy).assign(input).unwrap();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for placement in &assignment.neighborhoods {
        assert!(placement.occupants.len() <= assignment.capacity);
        for occupant in &placement.occupants {
            *counts.entry(occupant.homeowner.as_str()).or_default() += 1;
        }
    }

    assert_eq!(assignment.total_placed(), input.homeowners.len());
    for homeowner in &input.homeowners {
        assert_eq!(counts.get(homeowner.id.as_str()), Some(&1), "{}", homeowner.id);
    }
}

#[test]
fn test_sample_end_to_end() {
    let mut out = Vec::new();
    let assignment = run_streams(SAMPLE.as_bytes(), &mut out, &Settings::default()).unwrap();

    assert_eq!(assignment.capacity, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "N0: H5(161) H11(154) H2(128) H4(122)\n\
         N1: H9(23) H8(21) H7(20) H1(18)\n\
         N2: H6(128) H3(120) H10(86) H0(83)\n"
    );
}

#[test]
fn test_sample_arrival_order_matches_reference() {
    let mut settings = Settings::default();
    settings.output.order = OccupantOrder::Arrival;

    let mut out = Vec::new();
    run_streams(SAMPLE.as_bytes(), &mut out, &settings).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("N1: H1(18) H7(20) H9(23) H8(21)"));
}

#[test]
fn test_every_homeowner_placed_once() {
    for seed in 0..20 {
        let neighborhoods = 1 + (seed as usize % 6);
        let homeowners = neighborhoods * (1 + seed as usize % 5);
        let input = generate_input(seed, neighborhoods, homeowners);
        assert_valid_assignment(&input, CapacityPolicy::Exact);
    }
}

#[test]
fn test_ceiling_policy_with_remainders() {
    for seed in 0..20 {
        let neighborhoods = 2 + (seed as usize % 4);
        let homeowners = neighborhoods * 3 + 1 + (seed as usize % (neighborhoods - 1));
        let input = generate_input(seed, neighborhoods, homeowners);
        assert_valid_assignment(&input, CapacityPolicy::Ceiling);
    }
}

#[test]
fn test_deterministic_reruns() {
    let input = generate_input(42, 5, 40);
    let matcher = Matcher::with_default_policy();

    let first = matcher.assign(&input).unwrap();
    let second = matcher.assign(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_ties_are_broken_by_input_order() {
    // Every homeowner has the same ratings, so every first-choice score ties
    let text = "N A E:5 W:5 R:5\nN B E:5 W:5 R:5\n\
                H H1 E:1 W:1 R:1 A>B\nH H2 E:1 W:1 R:1 A>B\n\
                H H3 E:1 W:1 R:1 A>B\nH H4 E:1 W:1 R:1 A>B\n";

    let assignment = match_records(text.as_bytes(), &Settings::default()).unwrap();

    assert_eq!(assignment.neighborhood_of("H1"), Some("A"));
    assert_eq!(assignment.neighborhood_of("H2"), Some("A"));
    assert_eq!(assignment.neighborhood_of("H3"), Some("B"));
    assert_eq!(assignment.neighborhood_of("H4"), Some("B"));
}

#[test]
fn test_bumped_homeowner_is_placed_again() {
    let text = "N A E:10 W:0 R:0\nN B E:0 W:10 R:0\nN C E:0 W:0 R:10\n\
                H H1 E:0 W:10 R:0 B>A>C\n\
                H H2 E:1 W:9 R:0 B>A>C\n\
                H H3 E:2 W:5 R:0 B>A>C\n";

    let assignment = match_records(text.as_bytes(), &Settings::default()).unwrap();

    assert_eq!(assignment.stats.evictions, 1);
    assert_eq!(assignment.neighborhood_of("H3"), Some("A"));
    assert_eq!(assignment.neighborhood_of("H2"), Some("C"));
    assert_eq!(assignment.total_placed(), 3);
}

#[test]
fn test_bumped_homeowner_can_be_readmitted() {
    // All first-choice scores tie at zero, so homeowners are taken in input order.
    // H3 bumps H2 from C, H2 bumps H1 from B, H1 bumps H3 from C, H3 settles in A.
    let text = "N A E:10 W:0 R:0\nN B E:0 W:10 R:0\nN C E:0 W:0 R:10\n\
                H H1 E:2 W:0 R:5 B>C>A\n\
                H H2 E:5 W:2 R:0 C>B>A\n\
                H H3 E:5 W:0 R:2 B>C>A\n";

    let assignment = match_records(text.as_bytes(), &Settings::default()).unwrap();

    assert_eq!(assignment.capacity, 1);
    assert_eq!(assignment.stats.evictions, 3);
    assert_eq!(assignment.neighborhood_of("H1"), Some("C"));
    assert_eq!(assignment.neighborhood_of("H2"), Some("B"));
    assert_eq!(assignment.neighborhood_of("H3"), Some("A"));
    assert_eq!(assignment.placement("C").unwrap().occupants[0].score, 50);
}

#[test]
fn test_pipeline_errors() {
    let err = match_records("N  E:7 W:7 R:10\n".as_bytes(), &Settings::default()).unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
    assert_eq!(err.exit_code(), 1);

    let err = match_records(
        "N N0 E:1 W:1 R:1\nH H0 E:1 W:1 R:1 N0>N1\n".as_bytes(),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("found neighborhood preferences for non-present neighborhoods"));

    let err = match_records(
        "N N0 E:1 W:1 R:1\nN N1 E:1 W:1 R:1\n\
         H H0 E:1 W:1 R:1 N0>N1\nH H1 E:1 W:1 R:1 N1>N0\nH H2 E:1 W:1 R:1 N0>N1\n"
            .as_bytes(),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Match(MatchError::UnevenDistribution {
            homeowners: 3,
            neighborhoods: 2
        })
    ));
}

#[test]
fn test_reader_then_matcher() {
    let input = InputReader::default().parse_str(SAMPLE).unwrap();
    let assignment = Matcher::with_default_policy().assign(&input).unwrap();

    assert_eq!(assignment.neighborhood_of("H0"), Some("N2"));
    assert_eq!(assignment.neighborhood_of("H9"), Some("N1"));
    assert_eq!(assignment.stats.evictions, 1);
}
