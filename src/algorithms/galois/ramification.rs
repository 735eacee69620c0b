use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::{event, span, Level};

use crate::algorithms::galois::GaloisGroup;
use crate::error::{NumberFieldError, Result};
use crate::rings::extension::ideal::{valuation_integral, Prime};
use crate::rings::extension::number_field::NumberField;

///
/// A subset of a [`GaloisGroup`], stored as bit vector over the indices of the elements.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subgroup {
    group_len: usize,
    words: Vec<u64>
}

impl Subgroup {

    fn empty(group_len: usize) -> Self {
        Subgroup { group_len, words: vec![0; group_len.div_ceil(64)] }
    }

    ///
    /// The subgroup `{1}`.
    ///
    pub fn trivial(group_len: usize) -> Self {
        let mut result = Self::empty(group_len);
        result.insert(0);
        return result;
    }

    pub fn full(group_len: usize) -> Self {
        let mut result = Self::empty(group_len);
        for i in 0..group_len {
            result.insert(i);
        }
        return result;
    }

    ///
    /// Creates the subgroup consisting of the given elements, and checks that it is
    /// indeed a subgroup.
    ///
    pub fn from_elements<I>(group: &GaloisGroup, elements: I) -> Result<Self>
        where I: IntoIterator<Item = usize>
    {
        let mut result = Self::empty(group.len());
        for i in elements {
            if i >= group.len() {
                return Err(NumberFieldError::InvalidSubgroup(format!("index {} out of range", i)));
            }
            result.insert(i);
        }
        if !result.is_closed(group) {
            return Err(NumberFieldError::InvalidSubgroup(format!("{:?} is not closed under composition", result.elements())));
        }
        return Ok(result);
    }

    fn insert(&mut self, i: usize) {
        self.words[i / 64] |= 1 << (i % 64);
    }

    pub fn contains(&self, i: usize) -> bool {
        i < self.group_len && (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_trivial(&self) -> bool {
        self.len() == 1 && self.contains(0)
    }

    pub fn elements(&self) -> Vec<usize> {
        (0..self.group_len).filter(|i| self.contains(*i)).collect()
    }

    ///
    /// Checks whether this set contains the identity and is closed under composition,
    /// which for finite groups implies that it is a subgroup.
    ///
    pub fn is_closed(&self, group: &GaloisGroup) -> bool {
        let elements = self.elements();
        self.contains(0) && elements.iter().all(|a| elements.iter().all(|b| self.contains(group.compose(*a, *b))))
    }
}

///
/// The decomposition group and the ramification filtration `G_0 ⊇ G_1 ⊇ ...` of a prime,
/// where `G_0` is the inertia group.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamificationGroups {
    /// The stabilizer of the prime
    pub decomposition: Subgroup,
    /// The groups `G_0, G_1, ...`, ending with the first trivial group
    pub levels: Vec<Subgroup>
}

impl RamificationGroups {

    pub fn inertia(&self) -> &Subgroup {
        &self.levels[0]
    }
}

///
/// Returns the stabilizer of `P = (p, alpha)`; note that `sigma(P) = P` if and only if
/// `sigma(alpha)` is in `P`.
///
fn decomposition_group(group: &GaloisGroup, prime: &Prime) -> Subgroup {
    let mut result = Subgroup::empty(group.len());
    for g in 0..group.len() {
        if prime.contains(&group.apply_integral(g, prime.generator())) {
            result.insert(g);
        }
    }
    return result;
}

///
/// Returns the elements of the decomposition group that act trivially on `O/P`.
///
fn inertia_group(field: &NumberField, group: &GaloisGroup, prime: &Prime, decomposition: &Subgroup) -> Subgroup {
    let n = field.degree();
    let mut result = Subgroup::empty(group.len());
    for g in decomposition.elements() {
        let matrix = group.substitution_matrix(g);
        let trivial = (0..n).all(|i| {
            let mut difference = matrix.col(i);
            difference[i] -= BigInt::one();
            prime.contains(&difference)
        });
        if trivial {
            result.insert(g);
        }
    }
    return result;
}

fn check_galois(group: &GaloisGroup) -> Result<()> {
    if !group.is_galois() {
        return Err(NumberFieldError::NotGalois);
    }
    return Ok(());
}

///
/// Computes the Frobenius automorphism of an unramified prime `P`, i.e. the unique element
/// of the decomposition group that acts as `x -> x^p` on `O/P`. Returns its index in `group`.
///
/// # Algorithm
///
/// The decomposition group is cyclic of order `f`, and we find a generator `g` of it. For
/// `f <= 2`, the generator is unique, so we are done. Otherwise, the Frobenius is one of the
/// generators `g^k` with `gcd(k, f) = 1`, and we check `g^k(w_i) = w_i^p mod P` for the
/// integral basis elements `w_i`.
///
pub fn frobenius(field: &NumberField, group: &GaloisGroup, prime: &Prime) -> Result<usize> {
    check_galois(group)?;
    if prime.e() > 1 {
        return Err(NumberFieldError::RamifiedPrime(prime.p().clone()));
    }
    span!(Level::INFO, "frobenius", p = %prime.p(), f = prime.f()).in_scope(|| {
        let n = field.degree();
        let f = prime.f();
        let decomposition = decomposition_group(group, prime);
        if decomposition.len() != f {
            return Err(NumberFieldError::Bug(format!("decomposition group has order {} instead of {}", decomposition.len(), f)));
        }
        let generator = decomposition.elements().into_iter().find(|g| group.order(*g) == f)
            .ok_or_else(|| NumberFieldError::Bug("decomposition group of an unramified prime is not cyclic".to_owned()))?;
        if f <= 2 {
            return Ok(generator);
        }
        let p = prime.p();
        let powers = (0..n).map(|i| {
            let mut w = vec![BigInt::zero(); n];
            w[i] = BigInt::one();
            field.order().pow_mod_p(&w, p, p)
        }).collect::<Vec<_>>();
        let mut candidate = generator;
        for k in 1..f {
            if k.gcd(&f) == 1 {
                let matrix = group.substitution_matrix(candidate);
                let is_frobenius = (0..n).all(|i| {
                    let difference = matrix.col(i).iter().zip(powers[i].iter()).map(|(a, b)| a - b).collect::<Vec<_>>();
                    prime.contains(&difference)
                });
                if is_frobenius {
                    event!(Level::DEBUG, k = k, "found frobenius");
                    return Ok(candidate);
                }
            }
            candidate = group.compose(generator, candidate);
        }
        return Err(NumberFieldError::Bug(format!("no element of the decomposition group acts as x -> x^{}", p)));
    })
}

///
/// Computes the decomposition group of the given prime, and its ramification groups
/// `G_k = { sigma in G_0 | v_P(sigma(x) - x) >= k + 1 for all x in O }`.
///
/// # Algorithm
///
/// If `p` does not divide `e`, the ramification is tame, and `G_1` is trivial. Otherwise,
/// we compute `i(sigma) = v_P(sigma(pi) - pi)` for a uniformizer `pi` and all non-identity
/// `sigma` in the inertia group, and take `G_k = {1} ∪ { sigma | i(sigma) >= k + 1 }`. Each
/// of these sets is checked to be a subgroup.
///
pub fn ramification_groups(field: &NumberField, group: &GaloisGroup, prime: &Prime) -> Result<RamificationGroups> {
    check_galois(group)?;
    span!(Level::INFO, "ramification_groups", p = %prime.p(), e = prime.e(), f = prime.f()).in_scope(|| {
        let e = prime.e();
        let decomposition = decomposition_group(group, prime);
        let inertia = inertia_group(field, group, prime, &decomposition);
        if decomposition.len() != e * prime.f() || inertia.len() != e {
            return Err(NumberFieldError::Bug(format!("decomposition and inertia group have orders {} and {}, expected e = {} and f = {}", decomposition.len(), inertia.len(), e, prime.f())));
        }
        let mut levels = vec![inertia.clone()];
        if inertia.is_trivial() {
            return Ok(RamificationGroups { decomposition, levels });
        }
        if !(prime.p() % BigInt::from(e)).is_zero() {
            if !inertia.elements().into_iter().any(|g| group.order(g) == e) {
                return Err(NumberFieldError::Bug("tame inertia group is not cyclic".to_owned()));
            }
            event!(Level::DEBUG, "tamely ramified");
            levels.push(Subgroup::trivial(group.len()));
            return Ok(RamificationGroups { decomposition, levels });
        }
        let uniformizer = prime.uniformizer();
        let mut indices = Vec::new();
        for sigma in inertia.elements().into_iter().filter(|g| *g != 0) {
            let difference = group.apply_integral(sigma, uniformizer).iter().zip(uniformizer.iter()).map(|(a, b)| a - b).collect::<Vec<_>>();
            let i = valuation_integral(field, prime, &difference)
                .ok_or_else(|| NumberFieldError::Bug("nontrivial inertia element fixes a uniformizer".to_owned()))?;
            indices.push((sigma, i));
        }
        event!(Level::DEBUG, "ramification indices {:?}", indices);
        let mut k = 1;
        loop {
            let mut level = Subgroup::trivial(group.len());
            for (sigma, i) in &indices {
                if *i >= k + 1 {
                    level.insert(*sigma);
                }
            }
            if !level.is_closed(group) {
                return Err(NumberFieldError::Bug(format!("ramification group G_{} is not a subgroup", k)));
            }
            let trivial = level.is_trivial();
            levels.push(level);
            if trivial {
                return Ok(RamificationGroups { decomposition, levels });
            }
            k += 1;
        }
    })
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::algorithms::galois::{galois_group, ints, test_field};
#[cfg(test)]
use crate::rings::extension::ideal::prime_decomposition;

#[cfg(test)]
fn frobenius_image(field: &NumberField, group: &GaloisGroup, p: i64) -> Vec<Vec<BigInt>> {
    prime_decomposition(field, &BigInt::from(p)).unwrap().iter()
        .map(|P| group.algebraic(frobenius(field, group, P).unwrap()).to_vec())
        .collect()
}

#[cfg(test)]
fn level_sizes(field: &NumberField, group: &GaloisGroup, p: i64) -> Vec<usize> {
    let primes = prime_decomposition(field, &BigInt::from(p)).unwrap();
    let groups = ramification_groups(field, group, &primes[0]).unwrap();
    groups.levels.iter().map(|G| G.len()).collect()
}

#[test]
fn test_subgroup() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    let involution = (0..4).find(|g| G.order(*g) == 2).unwrap();
    let H = Subgroup::from_elements(&G, [0, involution]).unwrap();
    assert_eq!(2, H.len());
    assert!(H.contains(involution));
    assert!(!H.is_trivial());
    assert!(Subgroup::trivial(4).is_trivial());
    assert_eq!(4, Subgroup::full(4).len());
    let generator = (0..4).find(|g| G.order(*g) == 4).unwrap();
    assert!(matches!(Subgroup::from_elements(&G, [0, generator]), Err(NumberFieldError::InvalidSubgroup(_))));
    assert!(matches!(Subgroup::from_elements(&G, [0, 7]), Err(NumberFieldError::InvalidSubgroup(_))));
}

#[test]
fn test_frobenius_gaussian() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(vec![ints(&[0, 1]), ints(&[0, 1])], frobenius_image(&K, &G, 5));
    assert_eq!(vec![ints(&[0, -1])], frobenius_image(&K, &G, 3));
    let ramified = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    assert_eq!(Err(NumberFieldError::RamifiedPrime(BigInt::from(2))), frobenius(&K, &G, &ramified[0]));
}

#[test]
fn test_frobenius_cyclotomic() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    // zeta -> zeta^p
    assert_eq!(vec![ints(&[0, 0, 1, 0])], frobenius_image(&K, &G, 2));
    assert_eq!(vec![ints(&[0, 0, 0, 1])], frobenius_image(&K, &G, 3));
    assert_eq!(vec![ints(&[-1, -1, -1, -1]); 2], frobenius_image(&K, &G, 19));
    assert_eq!(vec![ints(&[0, 1, 0, 0]); 4], frobenius_image(&K, &G, 11));
}

#[test]
fn test_frobenius_not_galois() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[-2, 0, 0, 1]);
    let G = galois_group(&K).unwrap();
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(Err(NumberFieldError::NotGalois), frobenius(&K, &G, &primes[0]));
    assert_eq!(Err(NumberFieldError::NotGalois), ramification_groups(&K, &G, &primes[0]));
}

#[test]
fn test_ramification_groups_wild() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(vec![2, 2, 1], level_sizes(&K, &G, 2));

    let K = test_field(&[-2, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(vec![2, 2, 2, 1], level_sizes(&K, &G, 2));
}

#[test]
fn test_ramification_groups_tame() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(1, primes.len());
    let groups = ramification_groups(&K, &G, &primes[0]).unwrap();
    assert_eq!(4, groups.decomposition.len());
    assert_eq!(vec![4, 1], groups.levels.iter().map(|G| G.len()).collect::<Vec<_>>());

    let K = test_field(&[-5, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(vec![2, 1], level_sizes(&K, &G, 5));
}

#[test]
fn test_ramification_groups_unramified() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let G = galois_group(&K).unwrap();
    let primes = prime_decomposition(&K, &BigInt::from(3)).unwrap();
    let groups = ramification_groups(&K, &G, &primes[0]).unwrap();
    assert_eq!(2, groups.decomposition.len());
    assert!(groups.inertia().is_trivial());
    assert_eq!(1, groups.levels.len());
}

#[test]
fn test_frobenius_order() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    for p in [2, 3, 11, 19, 29, 31] {
        for P in prime_decomposition(&K, &BigInt::from(p)).unwrap() {
            let frob = frobenius(&K, &G, &P).unwrap();
            assert_eq!(P.f(), G.order(frob));
            let mut power = G.identity();
            for _ in 0..P.f() {
                power = G.compose(power, frob);
            }
            assert_eq!(G.identity(), power);
        }
    }
}

#[test]
fn test_common_index_divisor() {
    LogAlgorithmSubscriber::init_test();
    // Q(sqrt(-7), sqrt(17)), 2 splits completely
    let K = test_field(&[576, 0, -20, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert!(G.is_galois());
    let primes = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    assert_eq!(4, primes.len());
    for P in &primes {
        assert_eq!(G.identity(), frobenius(&K, &G, P).unwrap());
        let groups = ramification_groups(&K, &G, P).unwrap();
        assert_eq!(1, groups.decomposition.len());
        assert_eq!(1, groups.levels.len());
    }
}
