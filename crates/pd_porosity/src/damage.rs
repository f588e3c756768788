//! Per-particle damage `d(i) = N_broken(i) / N_total(i)`.
use crate::porosity::BondTallies;

/// Dense damage values in [0, 1], index-aligned with the lattice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageField {
    values: Vec<f64>,
}

/// Summary statistics of a [`DamageField`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Particles without any bond; their damage is 0 by definition.
    pub isolated: usize,
}

/// Computes damage from finalized tallies. Isolated particles get 0.
pub fn evaluate(tallies: &BondTallies) -> DamageField {
    let values = tallies
        .total
        .iter()
        .zip(&tallies.broken)
        .map(|(&total, &broken)| {
            if total > 0 {
                broken as f64 / total as f64
            } else {
                0.0
            }
        })
        .collect();
    DamageField { values }
}

impl DamageField {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }

    /// Min, max and mean damage plus the number of isolated particles.
    pub fn stats(&self, tallies: &BondTallies) -> DamageStats {
        if self.values.is_empty() {
            return DamageStats::default();
        }
        let (min, max, sum) = self.values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(lo, hi, sum), &d| (lo.min(d), hi.max(d), sum + d),
        );
        DamageStats {
            min,
            max,
            mean: sum / self.values.len() as f64,
            isolated: tallies.total.iter().filter(|&&t| t == 0).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tallies(total: Vec<u32>, broken: Vec<u32>) -> BondTallies {
        let total_bonds = total.iter().map(|&t| t as u64).sum::<u64>() / 2;
        let broken_bonds = broken.iter().map(|&b| b as u64).sum::<u64>() / 2;
        BondTallies {
            total,
            broken,
            total_bonds,
            broken_bonds,
        }
    }

    #[test]
    fn damage_is_broken_over_total() {
        let t = tallies(vec![4, 2, 2], vec![1, 1, 0]);
        assert_eq!(evaluate(&t).values(), &[0.25, 0.5, 0.0]);
    }

    #[test]
    fn isolated_particles_have_zero_damage() {
        let t = tallies(vec![0, 2, 2], vec![0, 2, 2]);
        let field = evaluate(&t);
        assert_eq!(field.values(), &[0.0, 1.0, 1.0]);
        let stats = field.stats(&t);
        assert_eq!(stats.isolated, 1);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
        assert!((stats.mean - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_tallies_give_empty_field() {
        let t = BondTallies::default();
        let field = evaluate(&t);
        assert!(field.is_empty());
        assert_eq!(field.stats(&t), DamageStats::default());
    }
}
