//! Lazy enumeration of gauge-invariant field combinations.
//!
//! Candidates are visited level by level in mass dimension (half units, so
//! fermions fit), and inside a level in lexicographic order of slot indices.

use bsm_core::errors::ModelError;
use bsm_core::rational::{self, checked_mul, Rational};
use bsm_group::Irrep;
use bsm_model::{FieldRegistry, InteractionTerm, Participant};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Tadpoles are removable by a field shift, so candidates start at two fields.
const MIN_FIELDS: usize = 2;

fn default_max_dimension() -> Rational {
    Rational::from_integer(4)
}

fn default_max_fields() -> usize {
    4
}

fn default_true() -> bool {
    true
}

/// Options controlling enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerateOpts {
    /// Highest mass dimension visited.
    #[serde(default = "default_max_dimension", with = "rational::serde_str")]
    pub max_dimension: Rational,
    /// Longest participant list.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
    /// Offer conjugated insertions of non-self-conjugate fields.
    #[serde(default = "default_true")]
    pub include_conjugates: bool,
    /// Drop the later member of each hermitian-conjugate pair and flag the
    /// earlier one with `+ h.c.`.
    #[serde(default = "default_true")]
    pub skip_hermitian_duplicates: bool,
}

impl Default for EnumerateOpts {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            max_fields: default_max_fields(),
            include_conjugates: default_true(),
            skip_hermitian_duplicates: default_true(),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    participant: Participant,
    /// Twice the mass dimension.
    weight: u32,
    /// Index of the conjugate slot, itself when the field has none.
    conjugate: usize,
    /// Irrep per declared group, in group order, conjugation applied.
    irreps: Vec<Irrep>,
}

/// Enumerates candidate terms over a registry snapshot.
#[derive(Debug, Clone)]
pub struct TermEnumerator<'a> {
    registry: &'a FieldRegistry,
    opts: EnumerateOpts,
}

impl<'a> TermEnumerator<'a> {
    /// Creates an enumerator.
    pub fn new(registry: &'a FieldRegistry, opts: EnumerateOpts) -> Self {
        Self { registry, opts }
    }

    /// Options in use.
    pub fn opts(&self) -> &EnumerateOpts {
        &self.opts
    }

    /// Participants available to candidates, in slot order.
    pub fn slots(&self) -> Vec<Participant> {
        self.build_slots()
            .into_iter()
            .map(|slot| slot.participant)
            .collect()
    }

    /// Lazily yields candidates up to the configured dimension.
    pub fn candidates(&self) -> Candidates<'a> {
        Candidates::new(self.registry, self.opts.clone(), self.build_slots())
    }

    /// Lazily yields candidates up to `max_dimension`.
    pub fn enumerate(&self, max_dimension: Rational) -> Candidates<'a> {
        let opts = EnumerateOpts {
            max_dimension,
            ..self.opts.clone()
        };
        Candidates::new(self.registry, opts, self.build_slots())
    }

    fn build_slots(&self) -> Vec<Slot> {
        let mut particles: Vec<_> = self.registry.particles().iter().collect();
        particles.sort_by(|a, b| a.id.cmp(&b.id));

        let mut slots = Vec::new();
        for particle in particles {
            let weight = (particle.mass_dimension() * Rational::from_integer(2)).to_integer() as u32;
            let mut roles = vec![Participant::plain(particle.id.clone())];
            if self.opts.include_conjugates && !particle.self_conjugate {
                roles.push(Participant::conjugated(particle.id.clone()));
            }
            let base = slots.len();
            let count = roles.len();
            for (offset, participant) in roles.into_iter().enumerate() {
                let irreps = self
                    .registry
                    .groups()
                    .iter()
                    .map(|group| {
                        participant
                            .irrep(particle, &group.id)
                            .unwrap_or_else(|| Irrep::singlet(group.family))
                    })
                    .collect();
                slots.push(Slot {
                    participant,
                    weight,
                    conjugate: base + (count - 1 - offset),
                    irreps,
                });
            }
        }
        slots
    }
}

/// Lazy candidate stream; dropping it stops the search.
#[derive(Debug)]
pub struct Candidates<'a> {
    registry: &'a FieldRegistry,
    opts: EnumerateOpts,
    slots: Vec<Slot>,
    level: u32,
    max_level: u32,
    stack: Vec<usize>,
    weight: u32,
    cursor: usize,
    yielded: usize,
}

impl<'a> Candidates<'a> {
    fn new(registry: &'a FieldRegistry, opts: EnumerateOpts, slots: Vec<Slot>) -> Self {
        // Levels count half units of mass dimension.
        let doubled = checked_mul(opts.max_dimension, Rational::from_integer(2))
            .map(|value| value.floor().to_integer())
            .unwrap_or(i64::MAX);
        let requested = u32::try_from(doubled.max(0)).unwrap_or(u32::MAX);
        let heaviest = slots.iter().map(|slot| slot.weight).max().unwrap_or(0);
        let reachable = heaviest.saturating_mul(u32::try_from(opts.max_fields).unwrap_or(u32::MAX));
        Self {
            registry,
            max_level: requested.min(reachable),
            opts,
            slots,
            level: 1,
            stack: Vec::new(),
            weight: 0,
            cursor: 0,
            yielded: 0,
        }
    }

    /// Advances the depth-first odometer to the next slot sequence whose weight
    /// equals the current level.
    fn next_sequence(&mut self) -> Option<Vec<usize>> {
        loop {
            if self.level > self.max_level {
                return None;
            }
            let found = if self.stack.len() < self.opts.max_fields {
                (self.cursor..self.slots.len())
                    .find(|&idx| self.weight + self.slots[idx].weight <= self.level)
            } else {
                None
            };
            match found {
                Some(idx) => {
                    self.stack.push(idx);
                    self.weight += self.slots[idx].weight;
                    if self.weight == self.level {
                        let sequence = self.stack.clone();
                        self.stack.pop();
                        self.weight -= self.slots[idx].weight;
                        self.cursor = idx + 1;
                        if sequence.len() >= MIN_FIELDS {
                            return Some(sequence);
                        }
                    } else {
                        self.cursor = idx;
                    }
                }
                None => match self.stack.pop() {
                    Some(idx) => {
                        self.weight -= self.slots[idx].weight;
                        self.cursor = idx + 1;
                    }
                    None => {
                        self.level += 1;
                        self.cursor = 0;
                        if self.level <= self.max_level {
                            debug!(dimension = %format_level(self.level), "enumeration level");
                        }
                    }
                },
            }
        }
    }

    fn is_invariant(&self, sequence: &[usize]) -> Result<bool, ModelError> {
        for (position, group) in self.registry.groups().iter().enumerate() {
            let irreps: Vec<Irrep> = sequence
                .iter()
                .map(|&idx| self.slots[idx].irreps[position].clone())
                .collect();
            if !self.registry.algebra().contains_singlet(&group.id, &irreps)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn conjugate_sequence(&self, sequence: &[usize]) -> Vec<usize> {
        let mut mirrored: Vec<usize> = sequence
            .iter()
            .map(|&idx| self.slots[idx].conjugate)
            .collect();
        mirrored.sort_unstable();
        mirrored
    }
}

fn format_level(level: u32) -> String {
    rational::format_rational(&Rational::new(level as i64, 2))
}

impl Iterator for Candidates<'_> {
    type Item = Result<InteractionTerm, ModelError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(sequence) = self.next_sequence() {
            match self.is_invariant(&sequence) {
                Err(err) => return Some(Err(err)),
                Ok(false) => {
                    trace!(slots = ?sequence, "rejected candidate");
                    continue;
                }
                Ok(true) => {}
            }
            let mut hermitian = false;
            if self.opts.skip_hermitian_duplicates {
                let mirrored = self.conjugate_sequence(&sequence);
                if mirrored < sequence {
                    continue;
                }
                hermitian = mirrored != sequence;
            }
            self.yielded += 1;
            let participants = sequence
                .iter()
                .map(|&idx| self.slots[idx].participant.clone())
                .collect();
            let term = InteractionTerm::new(format!("c{}", self.yielded), participants)
                .with_hermitian_conjugate(hermitian);
            return Some(Ok(term));
        }
        None
    }
}
