//! Gauge anomaly bookkeeping over the declared chiral fermions.
//!
//! Left-handed fermions count `+1`, right-handed `-1`. Majorana fermions sit
//! in real irreps and only enter the Witten parity. Sums use checked rational
//! arithmetic, so an overflowing coefficient is an error rather than a panic.

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, checked_add, checked_mul, checked_product, format_rational, Rational};
use bsm_group::{anomaly_coefficient, dynkin_index, GaugeGroup, GroupFamily, Irrep};
use bsm_model::{Chirality, FieldRegistry, Particle, Spin};
use serde::{Deserialize, Serialize};

/// One anomaly coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyEntry {
    /// Name such as `SU3C^3`, `U1Y-grav^2` or `Witten(SU2L)`.
    pub name: String,
    /// Summed coefficient; for the Witten parity, the doublet-like count.
    #[serde(with = "rational::serde_str")]
    pub value: Rational,
    /// Whether the coefficient cancels.
    pub cancelled: bool,
}

/// Every anomaly coefficient of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Entries in a fixed order: cubic, gravitational, mixed, Witten.
    pub entries: Vec<AnomalyEntry>,
}

impl AnomalyReport {
    /// True when every entry cancels.
    pub fn is_anomaly_free(&self) -> bool {
        self.entries.iter().all(|entry| entry.cancelled)
    }

    /// Entries that do not cancel.
    pub fn failures(&self) -> Vec<&AnomalyEntry> {
        self.entries.iter().filter(|entry| !entry.cancelled).collect()
    }

    /// Looks an entry up by name.
    pub fn entry(&self, name: &str) -> Option<&AnomalyEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Comma separated failing entries with their values.
    pub fn summary(&self) -> String {
        self.failures()
            .iter()
            .map(|entry| format!("{}={}", entry.name, format_rational(&entry.value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn push(&mut self, name: String, value: Rational) {
        self.entries.push(AnomalyEntry {
            name,
            cancelled: *value.numer() == 0,
            value,
        });
    }
}

struct ChiralField<'a> {
    particle: &'a Particle,
    sign: i64,
}

impl ChiralField<'_> {
    fn irrep(&self, group: &GaugeGroup) -> Irrep {
        self.particle
            .irrep(&group.id)
            .cloned()
            .unwrap_or_else(|| Irrep::singlet(group.family))
    }

    fn charge(&self, group: &GaugeGroup) -> Rational {
        self.irrep(group)
            .as_charge()
            .unwrap_or_else(|| Rational::from_integer(0))
    }

    /// Generations times the dimension under every group not in `skip`.
    fn multiplicity(&self, groups: &[GaugeGroup], skip: &[&GaugeGroup]) -> Result<Rational, ModelError> {
        let mut total = Rational::from_integer(i64::from(self.particle.generations));
        for group in groups {
            if skip.iter().any(|other| other.id == group.id) {
                continue;
            }
            let dimension = self.irrep(group).dimension()?;
            let dimension = i64::try_from(dimension).map_err(|_| {
                ModelError::InvalidRepresentation(
                    ErrorInfo::new("rational-overflow", "irrep dimension exceeds the i64 range")
                        .with_context("particle", self.particle.id.as_str())
                        .with_context("computed", dimension.to_string()),
                )
            })?;
            total = checked_mul(total, Rational::from_integer(dimension))?;
        }
        Ok(total)
    }

    /// Adds `sign · Π factors` to `total`.
    fn accumulate(&self, total: Rational, factors: &[Rational]) -> Result<Rational, ModelError> {
        let term = checked_product(factors.iter().copied())?;
        checked_add(total, checked_mul(term, Rational::from_integer(self.sign))?)
    }
}

/// Computes the anomaly report of every fermion declared in `registry`.
pub fn check_anomalies(registry: &FieldRegistry) -> Result<AnomalyReport, ModelError> {
    let groups = registry.groups();
    let fermions: Vec<&Particle> = registry
        .particles()
        .iter()
        .filter(|particle| particle.spin == Spin::Fermion)
        .collect();
    let chiral: Vec<ChiralField<'_>> = fermions
        .iter()
        .filter_map(|&particle| {
            let sign = match particle.chirality {
                Some(Chirality::Left) => 1,
                Some(Chirality::Right) => -1,
                _ => return None,
            };
            Some(ChiralField { particle, sign })
        })
        .collect();
    let zero = Rational::from_integer(0);
    let mut report = AnomalyReport::default();

    for group in groups {
        match group.family {
            GroupFamily::SpecialUnitary { n } if n >= 3 => {
                let mut total = zero;
                for field in &chiral {
                    let coefficient = anomaly_coefficient(&field.irrep(group))?;
                    let weight = field.multiplicity(groups, &[group])?;
                    total = field.accumulate(total, &[coefficient, weight])?;
                }
                report.push(format!("{}^3", group.id), total);
            }
            GroupFamily::Abelian => {
                let (mut cubic, mut gravity) = (zero, zero);
                for field in &chiral {
                    let q = field.charge(group);
                    let weight = field.multiplicity(groups, &[group])?;
                    cubic = field.accumulate(cubic, &[q, q, q, weight])?;
                    gravity = field.accumulate(gravity, &[q, weight])?;
                }
                report.push(format!("{}^3", group.id), cubic);
                report.push(format!("{}-grav^2", group.id), gravity);
            }
            _ => {}
        }
    }

    for group in groups.iter().filter(|g| !g.family.is_abelian()) {
        for abelian in groups.iter().filter(|g| g.family.is_abelian()) {
            let mut total = zero;
            for field in &chiral {
                let index = dynkin_index(&field.irrep(group))?;
                let weight = field.multiplicity(groups, &[group, abelian])?;
                total = field.accumulate(total, &[index, field.charge(abelian), weight])?;
            }
            report.push(format!("{}^2-{}", group.id, abelian.id), total);
        }
    }

    for squared in groups.iter().filter(|g| g.family.is_abelian()) {
        for linear in groups.iter().filter(|g| g.family.is_abelian()) {
            if squared.id == linear.id {
                continue;
            }
            let mut total = zero;
            for field in &chiral {
                let qa = field.charge(squared);
                let weight = field.multiplicity(groups, &[squared, linear])?;
                total = field.accumulate(total, &[qa, qa, field.charge(linear), weight])?;
            }
            report.push(format!("{}^2-{}", squared.id, linear.id), total);
        }
    }

    for group in groups
        .iter()
        .filter(|g| g.family == GroupFamily::SpecialUnitary { n: 2 })
    {
        let mut count = zero;
        for &particle in &fermions {
            let field = ChiralField { particle, sign: 1 };
            let twice_index = checked_mul(dynkin_index(&field.irrep(group))?, Rational::from_integer(2))?;
            if twice_index.to_integer() % 2 == 1 {
                count = checked_add(count, field.multiplicity(groups, &[group])?)?;
            }
        }
        report.entries.push(AnomalyEntry {
            name: format!("Witten({})", group.id),
            value: count,
            cancelled: count.to_integer() % 2 == 0,
        });
    }
    Ok(report)
}
