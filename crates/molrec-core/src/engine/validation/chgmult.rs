use crate::engine::error::ValidationError;
use tracing::{debug, trace};

const TOL: f64 = 1.0e-6;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

fn is_integral(x: f64) -> bool {
    approx(x, x.round())
}

/// Unresolved charge and multiplicity information for a fragmented molecule.
///
/// `zeff` holds each atom's effective nuclear charge (zero for ghosts).
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeMultiplicityInput<'a> {
    pub zeff: &'a [f64],
    pub fragment_separators: &'a [usize],
    pub molecular_charge: Option<f64>,
    pub fragment_charges: &'a [Option<f64>],
    pub molecular_multiplicity: Option<f64>,
    pub fragment_multiplicities: &'a [Option<f64>],
    pub zero_ghost_fragments: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeMultiplicity {
    pub molecular_charge: f64,
    pub fragment_charges: Vec<f64>,
    pub molecular_multiplicity: f64,
    pub fragment_multiplicities: Vec<f64>,
}

/// Whether a fragment with `z` available electrons can carry charge `c` in
/// multiplicity `m`. Parity is only enforced when both counts are integral.
fn feasible(z: f64, c: f64, m: f64) -> bool {
    if approx(z, 0.0) {
        return approx(c, 0.0) && approx(m, 1.0);
    }
    if m < 1.0 - TOL {
        return false;
    }
    let electrons = z - c;
    if electrons < m - 1.0 - TOL {
        return false;
    }
    if is_integral(electrons) && is_integral(m) {
        (electrons - (m - 1.0)).round().rem_euclid(2.0) == 0.0
    } else {
        true
    }
}

/// Closest-to-singlet multiplicity for the electron count.
fn low_spin(z: f64, c: f64) -> f64 {
    let electrons = z - c;
    if is_integral(electrons) && electrons.round().rem_euclid(2.0) == 1.0 {
        2.0
    } else {
        1.0
    }
}

/// Ways of completing the fragment charges, in order of preference.
///
/// A residual total charge is placed whole on one open fragment, trying open
/// fragments in order.
fn charge_candidates(
    molecular_charge: Option<f64>,
    fragment_charges: &[Option<f64>],
) -> Option<Vec<(f64, Vec<f64>)>> {
    let known: f64 = fragment_charges.iter().flatten().sum();
    let open: Vec<usize> = fragment_charges
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.is_none().then_some(i))
        .collect();
    let filled = |fill: &dyn Fn(usize) -> f64| -> Vec<f64> {
        fragment_charges
            .iter()
            .enumerate()
            .map(|(i, c)| c.unwrap_or_else(|| fill(i)))
            .collect()
    };

    let Some(total) = molecular_charge else {
        return Some(vec![(known, filled(&|_| 0.0))]);
    };
    if open.is_empty() {
        return approx(known, total).then(|| vec![(total, filled(&|_| 0.0))]);
    }
    let residual = total - known;
    if approx(residual, 0.0) {
        return Some(vec![(total, filled(&|_| 0.0))]);
    }
    Some(
        open.iter()
            .map(|&k| (total, filled(&|i| if i == k { residual } else { 0.0 })))
            .collect(),
    )
}

struct MultiplicitySearch<'a> {
    zf: &'a [f64],
    charges: &'a [f64],
    open: Vec<usize>,
    candidates: Vec<Vec<f64>>,
    target_unpaired: f64,
}

impl MultiplicitySearch<'_> {
    /// Depth-first over per-fragment candidates, first fragment varying slowest.
    fn search(&self, depth: usize, unpaired: f64, chosen: &mut Vec<f64>) -> bool {
        if unpaired > self.target_unpaired + TOL {
            return false;
        }
        if depth == self.open.len() {
            return approx(unpaired, self.target_unpaired);
        }
        for &m in &self.candidates[depth] {
            chosen.push(m);
            if self.search(depth + 1, unpaired + (m - 1.0), chosen) {
                return true;
            }
            chosen.pop();
        }
        false
    }
}

fn total_consistent(zf: &[f64], charges: &[f64], fm: &[f64], m: f64) -> bool {
    let high_spin = 1.0 + fm.iter().map(|x| x - 1.0).sum::<f64>();
    if m > high_spin + TOL {
        return false;
    }
    let electrons: f64 = zf.iter().zip(charges).map(|(z, c)| z - c).sum();
    if electrons < m - 1.0 - TOL {
        return false;
    }
    if is_integral(electrons) && is_integral(m) {
        (electrons - (m - 1.0)).round().rem_euclid(2.0) == 0.0
    } else {
        true
    }
}

/// Completes the multiplicities for one full set of fragment charges.
fn solve_multiplicities(
    zf: &[f64],
    charges: &[f64],
    molecular_multiplicity: Option<f64>,
    fragment_multiplicities: &[Option<f64>],
) -> Option<(f64, Vec<f64>)> {
    for (k, fm) in fragment_multiplicities.iter().enumerate() {
        if let Some(fm) = *fm {
            if !feasible(zf[k], charges[k], fm) {
                return None;
            }
        }
    }
    let low: Vec<f64> = fragment_multiplicities
        .iter()
        .enumerate()
        .map(|(k, fm)| fm.unwrap_or_else(|| low_spin(zf[k], charges[k])))
        .collect();

    let Some(m) = molecular_multiplicity else {
        if (0..zf.len()).any(|k| !feasible(zf[k], charges[k], low[k])) {
            return None;
        }
        let m = 1.0 + low.iter().map(|x| x - 1.0).sum::<f64>();
        return Some((m, low));
    };

    let open: Vec<usize> = fragment_multiplicities
        .iter()
        .enumerate()
        .filter_map(|(k, fm)| fm.is_none().then_some(k))
        .collect();
    if open.is_empty() {
        return total_consistent(zf, charges, &low, m).then_some((m, low));
    }

    let known_unpaired: f64 = fragment_multiplicities
        .iter()
        .flatten()
        .map(|x| x - 1.0)
        .sum();
    let target_unpaired = (m - 1.0) - known_unpaired;
    let candidates: Vec<Vec<f64>> = open
        .iter()
        .map(|&k| {
            let mut options = Vec::with_capacity(2);
            if target_unpaired > TOL {
                options.push(target_unpaired + 1.0);
            }
            options.push(low_spin(zf[k], charges[k]));
            let mut kept: Vec<f64> = Vec::with_capacity(2);
            for x in options {
                if feasible(zf[k], charges[k], x) && !kept.iter().any(|&y| approx(x, y)) {
                    kept.push(x);
                }
            }
            kept
        })
        .collect();

    let search = MultiplicitySearch {
        zf,
        charges,
        open,
        candidates,
        target_unpaired,
    };
    let mut chosen = Vec::with_capacity(search.open.len());
    if search.search(0, 0.0, &mut chosen) {
        let mut out = low;
        for (&k, &x) in search.open.iter().zip(&chosen) {
            out[k] = x;
        }
        return Some((m, out));
    }

    // Spins on separate fragments may also couple below their sum.
    let all_integral = is_integral(m)
        && search.zf.iter().zip(search.charges).all(|(z, c)| is_integral(z - c))
        && fragment_multiplicities.iter().flatten().all(|&x| is_integral(x));
    let open_feasible = search
        .open
        .iter()
        .all(|&k| feasible(zf[k], charges[k], low[k]));
    if all_integral && open_feasible && total_consistent(zf, charges, &low, m) {
        return Some((m, low));
    }
    None
}

/// Fills molecular and fragment charges and multiplicities so that fragment
/// charges sum to the molecular charge and every fragment's spin state is
/// consistent with its electron count. Missing values default to neutral and
/// closest-to-singlet.
pub fn resolve_charge_multiplicity(
    input: &ChargeMultiplicityInput<'_>,
) -> Result<ChargeMultiplicity, ValidationError> {
    let nfr = input.fragment_separators.len() + 1;
    if input.fragment_charges.len() != nfr || input.fragment_multiplicities.len() != nfr {
        return Err(ValidationError::ShapeMismatch {
            what: format!(
                "fragment charges ({}) / multiplicities ({}) against fragment count",
                input.fragment_charges.len(),
                input.fragment_multiplicities.len()
            ),
            expected: nfr,
            found: input.fragment_charges.len().max(input.fragment_multiplicities.len()),
        });
    }

    let mut bounds = Vec::with_capacity(nfr + 1);
    bounds.push(0);
    bounds.extend_from_slice(input.fragment_separators);
    bounds.push(input.zeff.len());
    if bounds.windows(2).any(|w| w[0] > w[1]) {
        return Err(ValidationError::Fragmentation(format!(
            "fragment_separators {:?} do not fit {} atoms",
            input.fragment_separators,
            input.zeff.len()
        )));
    }
    let zf: Vec<f64> = bounds
        .windows(2)
        .map(|w| input.zeff[w[0]..w[1]].iter().sum())
        .collect();

    let mut molecular_charge = input.molecular_charge;
    let mut molecular_multiplicity = input.molecular_multiplicity;
    let mut fragment_charges = input.fragment_charges.to_vec();
    let mut fragment_multiplicities = input.fragment_multiplicities.to_vec();

    if input.zero_ghost_fragments && zf.iter().any(|&z| approx(z, 0.0)) {
        molecular_charge = None;
        molecular_multiplicity = None;
        for (k, &z) in zf.iter().enumerate() {
            if approx(z, 0.0) {
                fragment_charges[k] = Some(0.0);
                fragment_multiplicities[k] = Some(1.0);
            }
        }
    }

    let describe = || {
        format!(
            "available electrons per fragment {:?}, molecular charge {:?}, fragment charges {:?}, molecular multiplicity {:?}, fragment multiplicities {:?}",
            zf,
            input.molecular_charge,
            input.fragment_charges,
            input.molecular_multiplicity,
            input.fragment_multiplicities
        )
    };

    if let Some(m) = molecular_multiplicity {
        if !(m.is_finite() && m >= 1.0 - TOL) {
            return Err(ValidationError::ChargeMultiplicity(format!(
                "multiplicity must be positive: {}",
                describe()
            )));
        }
    }

    let candidates = charge_candidates(molecular_charge, &fragment_charges).ok_or_else(|| {
        ValidationError::ChargeMultiplicity(format!(
            "fragment charges do not sum to the molecular charge: {}",
            describe()
        ))
    })?;

    for (total_charge, charges) in candidates {
        trace!(?charges, "Trying fragment charge assignment.");
        if let Some((total_mult, mults)) =
            solve_multiplicities(&zf, &charges, molecular_multiplicity, &fragment_multiplicities)
        {
            debug!(
                molecular_charge = total_charge,
                molecular_multiplicity = total_mult,
                "Resolved charge and multiplicity."
            );
            return Ok(ChargeMultiplicity {
                molecular_charge: total_charge,
                fragment_charges: charges,
                molecular_multiplicity: total_mult,
                fragment_multiplicities: mults,
            });
        }
    }

    Err(ValidationError::ChargeMultiplicity(describe()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: Option<f64> = None;

    fn s(x: f64) -> Option<f64> {
        Some(x)
    }

    fn system(name: &str) -> (Vec<f64>, Vec<usize>) {
        let (z, seps): (&[f64], &[usize]) = match name {
            "He" => (&[2.0], &[]),
            "He/He" => (&[2.0, 2.0], &[1]),
            "Ne/He/He" => (&[10.0, 2.0, 2.0], &[1, 2]),
            "He/He/Ne" => (&[2.0, 2.0, 10.0], &[1, 2]),
            "Ne/Ne" => (&[10.0, 10.0], &[1]),
            "He/He/He" => (&[2.0, 2.0, 2.0], &[1, 2]),
            "H" => (&[1.0], &[]),
            "funnyH" => (&[0.0], &[]),
            "funnierH" => (&[-1.0], &[]),
            "H/H" => (&[1.0, 1.0], &[1]),
            "H/He" => (&[1.0, 2.0], &[1]),
            "H/He/Na/Ne" => (&[1.0, 2.0, 11.0, 10.0], &[1, 2, 3]),
            "N/N/N" => (&[7.0, 7.0, 7.0], &[1, 2]),
            "N/Ne/N" => (&[7.0, 10.0, 7.0], &[1, 2]),
            "He/Gh" => (&[2.0, 0.0], &[1]),
            "Gh/He" => (&[0.0, 2.0], &[1]),
            "Gh" => (&[0.0, 0.0], &[]),
            "Gh/He/Ne" => (&[0.0, 0.0, 2.0, 10.0], &[2, 3]),
            "Gh/He/Gh" => (&[0.0, 2.0, 0.0], &[1, 2]),
            "Gh/Ne" => (&[0.0, 10.0], &[1]),
            other => panic!("unknown system {other}"),
        };
        (z.to_vec(), seps.to_vec())
    }

    fn solve(
        name: &str,
        c: Option<f64>,
        fc: &[Option<f64>],
        m: Option<f64>,
        fm: &[Option<f64>],
        zero_ghost_fragments: bool,
    ) -> Result<ChargeMultiplicity, ValidationError> {
        let (zeff, seps) = system(name);
        resolve_charge_multiplicity(&ChargeMultiplicityInput {
            zeff: &zeff,
            fragment_separators: &seps,
            molecular_charge: c,
            fragment_charges: fc,
            molecular_multiplicity: m,
            fragment_multiplicities: fm,
            zero_ghost_fragments,
        })
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[track_caller]
    fn check(
        name: &str,
        input: (Option<f64>, &[Option<f64>], Option<f64>, &[Option<f64>]),
        expected: (f64, &[f64], f64, &[f64]),
    ) {
        let out = solve(name, input.0, input.1, input.2, input.3, false)
            .unwrap_or_else(|e| panic!("{name} {input:?}: {e}"));
        assert!(
            (out.molecular_charge - expected.0).abs() < 1e-9
                && close(&out.fragment_charges, expected.1)
                && (out.molecular_multiplicity - expected.2).abs() < 1e-9
                && close(&out.fragment_multiplicities, expected.3),
            "{name} {input:?}: got {out:?}, expected {expected:?}"
        );
    }

    #[track_caller]
    fn irreconcilable(name: &str, input: (Option<f64>, &[Option<f64>], Option<f64>, &[Option<f64>])) {
        let result = solve(name, input.0, input.1, input.2, input.3, false);
        assert!(
            matches!(result, Err(ValidationError::ChargeMultiplicity(_))),
            "{name} {input:?}: got {result:?}"
        );
    }

    #[test]
    fn defaults_to_neutral_low_spin() {
        check("He", (s(0.0), &[s(0.0)], s(1.0), &[s(1.0)]), (0.0, &[0.0], 1.0, &[1.0]));
        check("He", (N, &[N], N, &[N]), (0.0, &[0.0], 1.0, &[1.0]));
        check("He/He", (N, &[N, N], N, &[N, N]), (0.0, &[0.0, 0.0], 1.0, &[1.0, 1.0]));
        check("H", (N, &[N], N, &[N]), (0.0, &[0.0], 2.0, &[2.0]));
        check("H/H", (N, &[N, N], N, &[N, N]), (0.0, &[0.0, 0.0], 3.0, &[2.0, 2.0]));
        check("H/He", (N, &[N, N], N, &[N, N]), (0.0, &[0.0, 0.0], 2.0, &[2.0, 1.0]));
        check("funnyH", (N, &[N], N, &[N]), (0.0, &[0.0], 1.0, &[1.0]));
    }

    #[test]
    fn residual_charge_goes_to_first_fragment_that_can_hold_it() {
        check("He/He", (s(2.0), &[N, N], N, &[N, N]), (2.0, &[2.0, 0.0], 1.0, &[1.0, 1.0]));
        check("He/He", (N, &[s(2.0), N], N, &[N, N]), (2.0, &[2.0, 0.0], 1.0, &[1.0, 1.0]));
        check("He/He", (s(0.0), &[s(2.0), N], N, &[N, N]), (0.0, &[2.0, -2.0], 1.0, &[1.0, 1.0]));
        check("Ne/He/He", (s(-2.0), &[N, s(2.0), N], N, &[N, N, N]), (-2.0, &[-4.0, 2.0, 0.0], 1.0, &[1.0, 1.0, 1.0]));
        check("Ne/He/He", (s(2.0), &[N, s(-2.0), N], N, &[N, N, N]), (2.0, &[4.0, -2.0, 0.0], 1.0, &[1.0, 1.0, 1.0]));
        check("He/He/Ne", (s(2.0), &[N, s(-2.0), N], N, &[N, N, N]), (2.0, &[0.0, -2.0, 4.0], 1.0, &[1.0, 1.0, 1.0]));
        check("He/He/Ne", (s(2.0), &[s(2.0), s(-2.0), N], N, &[N, N, N]), (2.0, &[2.0, -2.0, 2.0], 1.0, &[1.0, 1.0, 1.0]));
        check("He/He", (N, &[s(-2.0), s(2.0)], N, &[N, N]), (0.0, &[-2.0, 2.0], 1.0, &[1.0, 1.0]));
        check("He/He", (N, &[N, s(-2.0)], N, &[N, N]), (-2.0, &[0.0, -2.0], 1.0, &[1.0, 1.0]));
        check("Ne/Ne", (s(0.0), &[N, s(4.0)], N, &[N, N]), (0.0, &[-4.0, 4.0], 1.0, &[1.0, 1.0]));
        check("He/He/He", (s(4.0), &[s(2.0), N, N], N, &[N, N, N]), (4.0, &[2.0, 2.0, 0.0], 1.0, &[1.0, 1.0, 1.0]));
        check("He/He", (s(0.0), &[s(-2.0), s(2.0)], N, &[N, N]), (0.0, &[-2.0, 2.0], 1.0, &[1.0, 1.0]));
        check("Ne/Ne", (s(2.0), &[s(-2.0), N], N, &[N, N]), (2.0, &[-2.0, 4.0], 1.0, &[1.0, 1.0]));
    }

    #[test]
    fn explicit_fragment_multiplicities_set_the_total() {
        check("He", (N, &[N], N, &[s(1.0)]), (0.0, &[0.0], 1.0, &[1.0]));
        check("He", (N, &[N], N, &[s(3.0)]), (0.0, &[0.0], 3.0, &[3.0]));
        check("He", (N, &[s(-1.0)], N, &[s(2.0)]), (-1.0, &[-1.0], 2.0, &[2.0]));
        check("He/He", (N, &[N, N], N, &[s(1.0), s(1.0)]), (0.0, &[0.0, 0.0], 1.0, &[1.0, 1.0]));
        check("He/He", (N, &[N, N], N, &[s(3.0), s(1.0)]), (0.0, &[0.0, 0.0], 3.0, &[3.0, 1.0]));
        check("He/He", (N, &[N, N], N, &[s(1.0), s(3.0)]), (0.0, &[0.0, 0.0], 3.0, &[1.0, 3.0]));
        check("He/He", (N, &[N, N], N, &[s(3.0), s(3.0)]), (0.0, &[0.0, 0.0], 5.0, &[3.0, 3.0]));
        check("He/He", (N, &[N, N], s(3.0), &[s(3.0), s(3.0)]), (0.0, &[0.0, 0.0], 3.0, &[3.0, 3.0]));
    }

    #[test]
    fn charged_open_shell_fragments() {
        check("H", (s(1.0), &[N], N, &[N]), (1.0, &[1.0], 1.0, &[1.0]));
        check("H", (N, &[s(-1.0)], N, &[N]), (-1.0, &[-1.0], 1.0, &[1.0]));
        check("H/He", (N, &[s(1.0), s(1.0)], N, &[N, N]), (2.0, &[1.0, 1.0], 2.0, &[1.0, 2.0]));
        check("H/He", (s(-2.0), &[s(-1.0), N], N, &[N, N]), (-2.0, &[-1.0, -1.0], 2.0, &[1.0, 2.0]));
        check("He/He", (N, &[s(-1.0), s(1.0)], N, &[N, N]), (0.0, &[-1.0, 1.0], 3.0, &[2.0, 2.0]));
        check(
            "H/He/Na/Ne",
            (N, &[s(1.0), N, s(1.0), N], N, &[N, N, N, N]),
            (2.0, &[1.0, 0.0, 1.0, 0.0], 1.0, &[1.0, 1.0, 1.0, 1.0]),
        );
        check(
            "H/He/Na/Ne",
            (N, &[s(-1.0), N, s(1.0), N], N, &[N, N, N, N]),
            (0.0, &[-1.0, 0.0, 1.0, 0.0], 1.0, &[1.0, 1.0, 1.0, 1.0]),
        );
        check(
            "H/He/Na/Ne",
            (s(2.0), &[N, N, s(1.0), N], N, &[N, N, N, N]),
            (2.0, &[1.0, 0.0, 1.0, 0.0], 1.0, &[1.0, 1.0, 1.0, 1.0]),
        );
        check(
            "H/He/Na/Ne",
            (s(3.0), &[N, N, s(1.0), N], N, &[N, N, N, N]),
            (3.0, &[0.0, 2.0, 1.0, 0.0], 2.0, &[2.0, 1.0, 1.0, 1.0]),
        );
        check(
            "H/He/Na/Ne",
            (N, &[N, s(1.0), s(0.0), s(1.0)], N, &[N, N, N, N]),
            (2.0, &[0.0, 1.0, 0.0, 1.0], 5.0, &[2.0, 2.0, 2.0, 2.0]),
        );
        check(
            "H/He/Na/Ne",
            (N, &[N, s(1.0), s(0.0), N], N, &[N, N, N, N]),
            (1.0, &[0.0, 1.0, 0.0, 0.0], 4.0, &[2.0, 2.0, 2.0, 1.0]),
        );
        check(
            "H/He/Na/Ne",
            (N, &[N, s(1.0), s(0.0), N], N, &[N, N, s(4.0), N]),
            (1.0, &[0.0, 1.0, 0.0, 0.0], 6.0, &[2.0, 2.0, 4.0, 1.0]),
        );
    }

    #[test]
    fn total_multiplicity_is_distributed_over_open_fragments() {
        check("He/He/He", (s(0.0), &[N, N, s(1.0)], N, &[s(1.0), N, s(2.0)]), (0.0, &[0.0, -1.0, 1.0], 3.0, &[1.0, 2.0, 2.0]));
        check("N/N/N", (N, &[s(1.0), s(1.0), s(1.0)], s(3.0), &[N, s(3.0), N]), (3.0, &[1.0, 1.0, 1.0], 3.0, &[1.0, 3.0, 1.0]));
        check("N/N/N", (N, &[s(1.0), s(1.0), s(1.0)], s(3.0), &[N, N, N]), (3.0, &[1.0, 1.0, 1.0], 3.0, &[3.0, 1.0, 1.0]));
        check("N/N/N", (s(1.0), &[N, s(-1.0), N], s(3.0), &[N, N, s(2.0)]), (1.0, &[2.0, -1.0, 0.0], 3.0, &[2.0, 1.0, 2.0]));
        check("N/Ne/N", (s(1.0), &[N, N, N], s(4.0), &[N, s(3.0), N]), (1.0, &[1.0, 0.0, 0.0], 4.0, &[1.0, 3.0, 2.0]));
        check("N/Ne/N", (N, &[N, N, s(1.0)], s(4.0), &[N, s(3.0), N]), (1.0, &[0.0, 0.0, 1.0], 4.0, &[2.0, 3.0, 1.0]));
    }

    #[test]
    fn ghost_fragments_stay_neutral_singlets() {
        check("He/Gh", (N, &[s(2.0), N], N, &[N, N]), (2.0, &[2.0, 0.0], 1.0, &[1.0, 1.0]));
        check("Gh/He/Ne", (s(2.0), &[N, s(-2.0), N], N, &[N, N, N]), (2.0, &[0.0, -2.0, 4.0], 1.0, &[1.0, 1.0, 1.0]));
        check("Gh/He/Gh", (s(1.0), &[N, N, N], N, &[N, N, N]), (1.0, &[0.0, 1.0, 0.0], 2.0, &[1.0, 2.0, 1.0]));
    }

    #[test]
    fn zero_ghost_fragments_discards_conflicting_totals() {
        let out = solve("Gh/Ne", s(2.0), &[s(-2.0), N], N, &[N, N], true).unwrap();
        assert_eq!(out.molecular_charge, 0.0);
        assert_eq!(out.fragment_charges, vec![0.0, 0.0]);
        assert_eq!(out.molecular_multiplicity, 1.0);
        assert_eq!(out.fragment_multiplicities, vec![1.0, 1.0]);
        irreconcilable("Gh/Ne", (s(2.0), &[s(-2.0), N], N, &[N, N]));
    }

    #[test]
    fn fractional_charges_and_multiplicities() {
        check("Ne/Ne", (N, &[s(-2.1), s(2.1)], N, &[N, N]), (0.0, &[-2.1, 2.1], 1.0, &[1.0, 1.0]));
        check("N/N/N", (s(3.3), &[s(1.0), N, s(1.0)], s(3.0), &[N, s(3.0), N]), (3.3, &[1.0, 3.3 - 2.0, 1.0], 3.0, &[1.0, 3.0, 1.0]));
        check("N/N/N", (s(-2.4), &[N, N, N], N, &[N, N, N]), (-2.4, &[-2.4, 0.0, 0.0], 3.0, &[1.0, 2.0, 2.0]));
        check("He", (N, &[N], s(2.8), &[N]), (0.0, &[0.0], 2.8, &[2.8]));
        check("He", (N, &[N], N, &[s(2.8)]), (0.0, &[0.0], 2.8, &[2.8]));
        check("N/N/N", (N, &[N, N, N], s(2.2), &[s(2.0), s(2.0), s(2.2)]), (0.0, &[0.0, 0.0, 0.0], 2.2, &[2.0, 2.0, 2.2]));
        check("N/N/N", (N, &[N, N, N], s(4.2), &[s(2.0), s(2.0), s(2.2)]), (0.0, &[0.0, 0.0, 0.0], 4.2, &[2.0, 2.0, 2.2]));
        check("N/N/N", (N, &[N, N, N], N, &[s(2.0), s(2.0), s(2.2)]), (0.0, &[0.0, 0.0, 0.0], 4.2, &[2.0, 2.0, 2.2]));
        check("N/N/N", (N, &[s(2.0), s(-2.0), N], s(2.2), &[s(2.0), s(2.0), s(2.2)]), (0.0, &[2.0, -2.0, 0.0], 2.2, &[2.0, 2.0, 2.2]));
    }

    #[test]
    fn coupled_fragment_spins_may_lower_the_total() {
        check("H/H", (N, &[N, N], s(1.0), &[N, N]), (0.0, &[0.0, 0.0], 1.0, &[2.0, 2.0]));
    }

    #[test]
    fn irreconcilable_inputs_are_rejected() {
        irreconcilable("He/He/Ne", (s(2.0), &[N, s(-2.0), s(0.0)], N, &[N, N, N]));
        irreconcilable("He/He", (s(0.0), &[s(-2.0), s(-2.0)], N, &[N, N]));
        irreconcilable("He", (N, &[N], s(0.0), &[N]));
        irreconcilable("He", (N, &[N], N, &[s(2.0)]));
        irreconcilable("He", (N, &[N], N, &[s(5.0)]));
        irreconcilable("He", (N, &[s(-2.0)], N, &[s(2.0)]));
        irreconcilable("He/He", (N, &[N, N], s(2.0), &[s(3.0), s(3.0)]));
        irreconcilable("funnierH", (N, &[N], N, &[N]));
        irreconcilable("H/He", (N, &[s(1.0), N], N, &[s(2.0), N]));
        irreconcilable("H/He", (N, &[N, s(0.0)], N, &[N, s(2.0)]));
        irreconcilable("H/He", (N, &[N, s(-1.0)], N, &[N, s(3.0)]));
        irreconcilable("N/N/N", (N, &[N, N, N], s(3.0), &[N, N, s(2.0)]));
        irreconcilable("Gh", (s(1.0), &[N], N, &[N]));
        irreconcilable("Gh", (s(-1.0), &[N], N, &[N]));
        irreconcilable("Gh", (N, &[N], s(3.0), &[N]));
        irreconcilable("Gh/He", (N, &[s(2.0), N], N, &[N, N]));
        irreconcilable("He", (N, &[N], s(3.2), &[N]));
        irreconcilable("N/N/N", (N, &[N, N, N], s(2.2), &[N, N, s(2.2)]));
    }

    #[test]
    fn list_lengths_must_match_separators() {
        let result = resolve_charge_multiplicity(&ChargeMultiplicityInput {
            zeff: &[2.0, 2.0],
            fragment_separators: &[1],
            molecular_charge: None,
            fragment_charges: &[None],
            molecular_multiplicity: None,
            fragment_multiplicities: &[None, None],
            zero_ghost_fragments: false,
        });
        assert!(matches!(result, Err(ValidationError::ShapeMismatch { .. })));
    }

    #[test]
    fn empty_molecule_is_a_neutral_singlet() {
        let out = resolve_charge_multiplicity(&ChargeMultiplicityInput {
            zeff: &[],
            fragment_separators: &[],
            molecular_charge: None,
            fragment_charges: &[None],
            molecular_multiplicity: None,
            fragment_multiplicities: &[None],
            zero_ghost_fragments: false,
        })
        .unwrap();
        assert_eq!(out.molecular_charge, 0.0);
        assert_eq!(out.molecular_multiplicity, 1.0);
    }
}
