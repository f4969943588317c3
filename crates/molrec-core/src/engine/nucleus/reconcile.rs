use super::cache::{NucleusCache, NucleusQuery};
use super::label::parse_nucleus_label;
use crate::core::elements::table::{NuclideTable, PeriodicTable};
use crate::core::models::nucleus::Nucleus;
use crate::engine::error::ValidationError;
use std::fmt::Debug;
use tracing::trace;

/// Allowed distance of a mass outside the element's tabulated isotope masses.
const MASS_RANGE_SLACK: f64 = 0.5;

type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// Candidate values in order of preference, plus the predicates any winner must pass.
struct Pool<T> {
    candidates: Vec<T>,
    predicates: Vec<Predicate<T>>,
}

impl<T: Clone + Debug> Pool<T> {
    fn new() -> Self {
        Self {
            candidates: Vec::new(),
            predicates: Vec::new(),
        }
    }

    fn with_default(value: T) -> Self {
        let mut pool = Self::new();
        pool.candidates.push(value);
        pool
    }

    fn offer(&mut self, candidate: T, predicate: impl Fn(&T) -> bool + 'static) {
        self.candidates.push(candidate);
        self.predicates.push(Box::new(predicate));
    }

    fn resolve(&self, field: &'static str, query: &NucleusQuery) -> Result<T, ValidationError> {
        for candidate in &self.candidates {
            let passed = self.predicates.iter().all(|p| p(candidate));
            trace!(field, candidate = ?candidate, passed, "Assessing candidate.");
            if passed {
                return Ok(candidate.clone());
            }
        }
        Err(ValidationError::Reconciliation {
            field,
            inputs: describe(query),
        })
    }
}

fn describe(query: &NucleusQuery) -> String {
    fn show<T: Debug>(value: &Option<T>) -> String {
        match value {
            Some(v) => format!("{v:?}"),
            None => "None".to_string(),
        }
    }
    format!(
        "A: {}, Z: {}, E: {}, mass: {}, real: {}, label: {}",
        show(&query.mass_number),
        show(&query.atomic_number),
        show(&query.symbol),
        show(&query.mass),
        show(&query.real),
        show(&query.label),
    )
}

struct Evidence {
    atomic_number: Pool<i64>,
    mass_number: Pool<i64>,
    mass: Pool<f64>,
    real: Pool<bool>,
    user: Pool<String>,
}

/// Resolves partial and possibly redundant atom descriptions into a [`Nucleus`].
///
/// Each piece of input contributes candidate values and constraints for the
/// atomic number, mass number, mass, reality and user tag. The first candidate
/// in each pool that satisfies every constraint wins, so explicit fields take
/// precedence over what is parsed from a label, and both over table defaults.
pub struct NucleusReconciler<'a> {
    table: &'a dyn PeriodicTable,
    cache: &'a NucleusCache,
}

impl NucleusReconciler<'static> {
    pub fn builtin() -> Self {
        Self::new(NuclideTable::builtin(), NucleusCache::global())
    }
}

impl<'a> NucleusReconciler<'a> {
    /// The cache must only ever be paired with this one table.
    pub fn new(table: &'a dyn PeriodicTable, cache: &'a NucleusCache) -> Self {
        Self { table, cache }
    }

    pub fn table(&self) -> &'a dyn PeriodicTable {
        self.table
    }

    pub fn reconcile(&self, query: &NucleusQuery) -> Result<Nucleus, ValidationError> {
        if let Some(hit) = self.cache.get(query) {
            return Ok(hit);
        }
        let nucleus = self.reconcile_uncached(query)?;
        self.cache.insert(query.clone(), nucleus.clone());
        Ok(nucleus)
    }

    fn reconcile_uncached(&self, query: &NucleusQuery) -> Result<Nucleus, ValidationError> {
        let mut ev = Evidence {
            atomic_number: Pool::new(),
            mass_number: Pool::new(),
            mass: Pool::new(),
            real: Pool::with_default(true),
            user: Pool::with_default(String::new()),
        };

        if let Some(z) = query.atomic_number {
            self.offer_atomic_number(&mut ev, query, z)?;
        }
        if let Some(symbol) = &query.symbol {
            self.offer_symbol(&mut ev, query, symbol)?;
        }
        let parsed = match (&query.label, query.speclabel) {
            (Some(label), true) => Some(parse_nucleus_label(label)?),
            _ => None,
        };
        if let Some(parsed) = &parsed {
            if let Some(z) = parsed.atomic_number {
                self.offer_atomic_number(&mut ev, query, z)?;
            }
            if let Some(symbol) = &parsed.symbol {
                self.offer_symbol(&mut ev, query, symbol)?;
            }
        }

        let z = ev.atomic_number.resolve("atomic number", query)?;
        let symbol = self.table.to_e(z)?.to_string();

        if let Some(a) = query.mass_number {
            self.offer_mass_number(&mut ev, query, z, a)?;
        }
        if let Some(m) = query.mass {
            self.offer_mass_value(&mut ev, query, z, m)?;
        }
        if let Some(real) = query.real {
            ev.real.offer(real, move |x| *x == real);
        }
        match (&query.label, parsed) {
            (Some(_), Some(parsed)) => {
                let real = parsed.real;
                ev.real.offer(real, move |x| *x == real);
                if let Some(a) = parsed.mass_number {
                    self.offer_mass_number(&mut ev, query, z, a)?;
                }
                if let Some(m) = parsed.mass {
                    self.offer_mass_value(&mut ev, query, z, m)?;
                }
                if let Some(user) = parsed.user {
                    offer_user_label(&mut ev, &user);
                }
            }
            (Some(label), None) => offer_user_label(&mut ev, label),
            _ => {}
        }

        let mass = ev.mass.resolve("mass", query)?;
        let mass_number = ev.mass_number.resolve("mass number", query)?;
        let real = ev.real.resolve("real/ghost", query)?;
        let label = ev.user.resolve("user label", query)?;

        let out_of_range = |field: &'static str| ValidationError::Reconciliation {
            field,
            inputs: describe(query),
        };
        let nucleus = Nucleus {
            mass_number: i32::try_from(mass_number).map_err(|_| out_of_range("mass number"))?,
            atomic_number: u32::try_from(z).map_err(|_| out_of_range("atomic number"))?,
            symbol,
            mass,
            real,
            label,
        };
        trace!(nucleus = %nucleus, "Reconciled nucleus.");
        Ok(nucleus)
    }

    fn offer_symbol(
        &self,
        ev: &mut Evidence,
        query: &NucleusQuery,
        symbol: &str,
    ) -> Result<(), ValidationError> {
        let z = self.table.to_z(symbol, true)?;
        self.offer_atomic_number(ev, query, i64::from(z))
    }

    fn offer_atomic_number(
        &self,
        ev: &mut Evidence,
        query: &NucleusQuery,
        z: i64,
    ) -> Result<(), ValidationError> {
        self.table.to_e(z)?;
        let default_mass = self.table.to_mass(z)?;
        let default_a = i64::from(self.table.to_a(z)?);
        let (amin, amax) = self.table.mass_number_range(z)?;
        let (mmin, mmax) = self.table.mass_range(z)?;

        ev.atomic_number.offer(z, move |x| *x == z);

        if query.nonphysical {
            ev.mass_number.offer(default_a, |x| *x == -1 || *x >= 1);
            ev.mass.offer(default_mass, |x| *x > 0.5);
        } else {
            let (amin, amax) = (i64::from(amin), i64::from(amax));
            ev.mass_number
                .offer(default_a, move |x| *x == -1 || (amin..=amax).contains(x));
            ev.mass.offer(default_mass, move |x| {
                *x >= mmin - MASS_RANGE_SLACK && *x <= mmax + MASS_RANGE_SLACK
            });
        }
        Ok(())
    }

    fn offer_mass_number(
        &self,
        ev: &mut Evidence,
        query: &NucleusQuery,
        z: i64,
        a: i64,
    ) -> Result<(), ValidationError> {
        let symbol = self.table.to_e(z)?;
        let isotope_mass = self.table.isotope_mass(symbol, a)?;
        let mtol = query.mtol;
        ev.mass_number.offer(a, move |x| *x == a);
        ev.mass
            .offer(isotope_mass, move |x| (*x - isotope_mass).abs() < mtol);
        Ok(())
    }

    fn offer_mass_value(
        &self,
        ev: &mut Evidence,
        query: &NucleusQuery,
        z: i64,
        m: f64,
    ) -> Result<(), ValidationError> {
        let symbol = self.table.to_e(z)?;
        let rounded = m.round() as i64;
        // Only a tabulated nuclide close to `m` earns a mass number.
        let a = match self.table.isotope_mass(symbol, rounded) {
            Ok(iso) if (iso - m).abs() <= query.mtol => rounded,
            _ => Nucleus::UNKNOWN_MASS_NUMBER as i64,
        };
        ev.mass_number.offer(a, move |x| *x == a);
        ev.mass.offer(m, move |x| *x == m);
        Ok(())
    }
}

fn offer_user_label(ev: &mut Evidence, label: &str) {
    let label = label.to_lowercase();
    let expected = label.clone();
    ev.user.offer(label, move |x| *x == expected);
}
