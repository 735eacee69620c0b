use num_bigint::BigInt;
use num_rational::BigRational;

use feanor_number_field::algorithms::galois::apply::{apply, GaloisTarget};
use feanor_number_field::algorithms::galois::ramification::{frobenius, ramification_groups};
use feanor_number_field::algorithms::galois::{galois_group, Automorphism};
use feanor_number_field::algorithms::lll::{reduce_basis, LllOptions};
use feanor_number_field::algorithms::polred::{polredabs, polredbest, PolredOptions};
use feanor_number_field::error::NumberFieldError;
use feanor_number_field::rings::extension::ideal::{prime_decomposition, valuation, Ideal};
use feanor_number_field::rings::extension::number_field::{NumberField, OrderOptions, OrderSource};
use feanor_number_field::rings::poly::dense_poly::QPoly;
use feanor_number_field::tracing::LogAlgorithmSubscriber;

fn field(coeffs: &[i64]) -> NumberField {
    NumberField::build(OrderSource::Polynomial(QPoly::from_ints(coeffs)), &OrderOptions::default()).unwrap()
}

#[test]
fn test_real_quadratic_scenario() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-5, 0, 1]);
    assert_eq!(&BigInt::from(5), K.discriminant());
    assert_eq!(&BigInt::from(2), K.index());
    assert_eq!((2, 0), K.signature());

    let best = polredabs(&K, &PolredOptions::default()).unwrap();
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), best.poly);

    let G = galois_group(&K).unwrap();
    assert!(G.is_galois());
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(1, primes.len());
    assert_eq!((2, 1), (primes[0].e(), primes[0].f()));
    let groups = ramification_groups(&K, &G, &primes[0]).unwrap();
    assert_eq!(vec![2, 1], groups.levels.iter().map(|H| H.len()).collect::<Vec<_>>());
}

#[test]
fn test_polredabs_is_canonical() {
    LogAlgorithmSubscriber::init_test();
    // x^3 - 3x - 1 and its shift by 2 define the same field
    let K = field(&[-1, -3, 0, 1]);
    let L = field(&[1, 9, 6, 1]);
    let options = PolredOptions::default();
    let reduced_K = polredabs(&K, &options).unwrap();
    let reduced_L = polredabs(&L, &options).unwrap();
    assert_eq!(reduced_K.poly, reduced_L.poly);

    let M = field(&reduced_L.poly.integer_coeffs().unwrap().iter().map(|c| i64::try_from(c).unwrap()).collect::<Vec<_>>());
    assert_eq!(K.discriminant(), M.discriminant());
    assert_eq!(&BigInt::from(81), M.discriminant());

    // polredbest returns a defining polynomial of the same field
    let best = polredbest(&L, &options).unwrap();
    let N = field(&best.poly.integer_coeffs().unwrap().iter().map(|c| i64::try_from(c).unwrap()).collect::<Vec<_>>());
    assert_eq!(L.discriminant(), N.discriminant());
}

#[test]
fn test_reduced_basis_is_unimodular() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[7, 0, 0, 1]);
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    assert_eq!(3, reduced.len());
    let one = K.to_integral(&K.one()).unwrap();
    assert_eq!(one, reduced.vector(0));
}

#[test]
fn test_cyclotomic_automorphisms() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(4, G.len());
    for i in 0..G.len() {
        let permutation = G.automorphism(i).to_permutation(&K).unwrap();
        let algebraic = Automorphism::Permutation(permutation).to_algebraic(&K).unwrap();
        assert_eq!(G.algebraic(i), &algebraic[..]);
    }

    // Frobenius acts as x -> x^p on the residue field
    let p = BigInt::from(2);
    let primes = prime_decomposition(&K, &p).unwrap();
    assert_eq!(1, primes.len());
    assert_eq!(4, primes[0].f());
    let frob = frobenius(&K, &G, &primes[0]).unwrap();
    for i in 0..4 {
        let w = K.to_integral(&K.basis_vector(i)).unwrap();
        let image = G.apply_integral(frob, &w);
        let power = K.order().pow_mod_p(&w, &p, &p);
        let difference = image.iter().zip(power.iter()).map(|(a, b)| a - b).collect::<Vec<_>>();
        assert!(primes[0].contains(&difference));
    }

    // 5 is totally and tamely ramified
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(4, primes[0].e());
    let groups = ramification_groups(&K, &G, &primes[0]).unwrap();
    assert_eq!(vec![4, 1], groups.levels.iter().map(|H| H.len()).collect::<Vec<_>>());
    assert_eq!(Err(NumberFieldError::RamifiedPrime(BigInt::from(5))), frobenius(&K, &G, &primes[0]));
}

#[test]
fn test_galois_action_on_primes() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    let primes = prime_decomposition(&K, &BigInt::from(11)).unwrap();
    assert_eq!(4, primes.len());
    // the group acts transitively on the primes over 11
    for g in 0..G.len() {
        let image = match apply(&K, &G.automorphism(g), GaloisTarget::Prime(primes[0].clone())).unwrap() {
            GaloisTarget::Prime(P) => P,
            _ => unreachable!()
        };
        assert!(primes.iter().any(|P| P.ideal() == image.ideal()));
    }
    let images = (0..G.len()).map(|g| match apply(&K, &G.automorphism(g), GaloisTarget::Ideal(primes[0].ideal().clone())).unwrap() {
        GaloisTarget::Ideal(I) => I,
        _ => unreachable!()
    }).collect::<Vec<Ideal>>();
    for P in &primes {
        assert!(images.contains(P.ideal()));
    }
}

#[test]
fn test_valuations() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 0, 1]);
    let primes = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    let two = K.from_int(&BigInt::from(2));
    assert_eq!(Some(2), valuation(&K, &primes[0], &two));
    let half = K.scale(&K.one(), &BigRational::new(BigInt::from(1), BigInt::from(2)));
    assert_eq!(Some(-2), valuation(&K, &primes[0], &half));
    assert_eq!(None, valuation(&K, &primes[0], &K.zero()));
}

#[test]
fn test_invalid_inputs() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 0, 1]);
    assert_eq!(Err(NumberFieldError::NotPrime(BigInt::from(15))), prime_decomposition(&K, &BigInt::from(15)));
    assert!(NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-4, 0, 1])), &OrderOptions::default()).unwrap_err().is_domain_error());
}
