use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::core::capacity::CapacityPolicy;
use crate::core::scoring::calculate_fit;
use crate::models::{Assignment, Homeowner, MatchInput, MatchStats, Occupant, Placement};

/// Errors raised while assigning homeowners
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("uneven distribution: {homeowners} homeowners cannot be split evenly across {neighborhoods} neighborhoods")]
    UnevenDistribution {
        homeowners: usize,
        neighborhoods: usize,
    },

    #[error("homeowner {homeowner} ranks unknown neighborhood '{neighborhood}'")]
    UnknownNeighborhood {
        homeowner: String,
        neighborhood: String,
    },

    /// Every ranked neighborhood was full of better fits. Unreachable while the
    /// capacities add up to at least the number of homeowners and every
    /// homeowner ranks every neighborhood.
    #[error("internal consistency fault: homeowner {homeowner} exhausted every preference without being placed")]
    PreferencesExhausted { homeowner: String },
}

/// One entry of a homeowner's ranked list: a neighborhood and the fit score for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Choice {
    neighborhood: usize,
    score: u32,
}

/// A homeowner currently holding a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seat {
    homeowner: usize,
    score: u32,
}

/// Greedy capacity-bounded assignment of homeowners to neighborhoods
///
/// # Algorithm
/// Until nobody is pending:
/// 1. Pick the pending homeowner whose top-ranked neighborhood carries the
///    highest fit score (earliest in input order on ties)
/// 2. Walk their ranking: take the first neighborhood with a free slot, or
///    the first full one whose weakest occupant scores strictly lower, bumping
///    that occupant back into the pending set
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: CapacityPolicy,
}

impl Matcher {
    pub fn new(policy: CapacityPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Assign every homeowner in `input` to exactly one neighborhood
    pub fn assign(&self, input: &MatchInput) -> Result<Assignment, MatchError> {
        let capacity = self
            .policy
            .capacity(input.homeowners.len(), input.neighborhoods.len())
            .map_err(|share| MatchError::UnevenDistribution {
                homeowners: share.homeowners,
                neighborhoods: share.neighborhoods,
            })?;

        let mut state = MatchState::new(input, capacity)?;
        while let Some(next) = state.select_next() {
            state.place(next)?;
        }

        let assignment = state.finish();
        info!(
            "Matched {} homeowners into {} neighborhoods (capacity {}, {} iterations, {} evictions)",
            assignment.total_placed(),
            assignment.neighborhoods.len(),
            capacity,
            assignment.stats.iterations,
            assignment.stats.evictions,
        );

        Ok(assignment)
    }
}

/// Working state for a single run
struct MatchState<'a> {
    input: &'a MatchInput,
    capacity: usize,
    /// Per homeowner, their ranking with precomputed scores. Never trimmed, so a
    /// bumped homeowner re-enters with the same list.
    choices: Vec<Vec<Choice>>,
    /// Input positions of homeowners awaiting a slot
    pending: BTreeSet<usize>,
    /// Per neighborhood, current occupants
    seats: Vec<Vec<Seat>>,
    stats: MatchStats,
}

impl<'a> MatchState<'a> {
    fn new(input: &'a MatchInput, capacity: usize) -> Result<Self, MatchError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(input.neighborhoods.len());
        for (position, neighborhood) in input.neighborhoods.iter().enumerate() {
            index.entry(neighborhood.id.as_str()).or_insert(position);
        }

        let choices = input
            .homeowners
            .iter()
            .map(|homeowner| rank_choices(input, &index, homeowner))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            input,
            capacity,
            choices,
            pending: (0..input.homeowners.len()).collect(),
            seats: vec![Vec::with_capacity(capacity + 1); input.neighborhoods.len()],
            stats: MatchStats::default(),
        })
    }

    /// Pending homeowner with the best score for their first choice
    fn select_next(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for &homeowner in &self.pending {
            let key = self.choices[homeowner].first().map_or(0, |c| c.score);
            match best {
                Some((_, best_key)) if key <= best_key => {}
                _ => best = Some((homeowner, key)),
            }
        }
        best.map(|(homeowner, _)| homeowner)
    }

    fn place(&mut self, homeowner: usize) -> Result<(), MatchError> {
        self.stats.iterations += 1;
        debug!(
            homeowner = %self.input.homeowners[homeowner].id,
            pending = self.pending.len(),
            "Placing homeowner"
        );

        for choice in &self.choices[homeowner] {
            let seats = &mut self.seats[choice.neighborhood];
            let neighborhood = &self.input.neighborhoods[choice.neighborhood].id;

            if seats.len() < self.capacity {
                seats.push(Seat {
                    homeowner,
                    score: choice.score,
                });
                self.pending.remove(&homeowner);
                trace!(
                    "{} -> {} ({})",
                    self.input.homeowners[homeowner].id,
                    neighborhood,
                    choice.score
                );
                return Ok(());
            }

            let lowest = seats.iter().map(|s| s.score).min();
            if matches!(lowest, Some(lowest) if choice.score > lowest) {
                seats.push(Seat {
                    homeowner,
                    score: choice.score,
                });
                seats.sort_by(|a, b| b.score.cmp(&a.score));
                let Some(bumped) = seats.pop() else {
                    continue;
                };

                self.pending.remove(&homeowner);
                self.pending.insert(bumped.homeowner);
                self.stats.evictions += 1;
                trace!(
                    "{} -> {} ({}), bumping {} ({})",
                    self.input.homeowners[homeowner].id,
                    neighborhood,
                    choice.score,
                    self.input.homeowners[bumped.homeowner].id,
                    bumped.score
                );
                return Ok(());
            }
        }

        Err(MatchError::PreferencesExhausted {
            homeowner: self.input.homeowners[homeowner].id.clone(),
        })
    }

    fn finish(self) -> Assignment {
        let neighborhoods = self
            .input
            .neighborhoods
            .iter()
            .zip(self.seats)
            .map(|(neighborhood, seats)| Placement {
                neighborhood: neighborhood.id.clone(),
                occupants: seats
                    .into_iter()
                    .map(|seat| Occupant {
                        homeowner: self.input.homeowners[seat.homeowner].id.clone(),
                        score: seat.score,
                    })
                    .collect(),
            })
            .collect();

        Assignment {
            capacity: self.capacity,
            neighborhoods,
            stats: self.stats,
        }
    }
}

/// A homeowner's ranking with the fit score of each ranked neighborhood
fn rank_choices(
    input: &MatchInput,
    index: &HashMap<&str, usize>,
    homeowner: &Homeowner,
) -> Result<Vec<Choice>, MatchError> {
    let mut choices = Vec::with_capacity(homeowner.preferences.len());
    for preference in &homeowner.preferences {
        let Some(&neighborhood) = index.get(preference.as_str()) else {
            return Err(MatchError::UnknownNeighborhood {
                homeowner: homeowner.id.clone(),
                neighborhood: preference.clone(),
            });
        };
        choices.push(Choice {
            neighborhood,
            score: calculate_fit(homeowner, &input.neighborhoods[neighborhood]),
        });
    }
    Ok(choices)
}
