use afl::fuzz;
use au_healthcare_ids::{
    DvaNumber, HealthcareIdentifier, IdentifierGenerator, IdentifierKind, MedicareCardNumber,
    MedicareProviderNumber, Validator,
};
use rand::{rngs::StdRng, SeedableRng};
use strum::IntoEnumIterator;

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(i) = input.iter().position(|b| *b == b',') {
        Some((&input[0..i], &input[i + 1..]))
    } else {
        None
    }
}

fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    let (input, rand_seed) = split_bytes_once(bytes).unwrap_or((bytes, &[]));
    let input_str = std::str::from_utf8(input).ok()?;

    let mut rng_seed: u64 = 0;
    for byte in rand_seed.iter().take(8) {
        rng_seed <<= 8;
        rng_seed += *byte as u64;
    }

    run_fuzz(input_str, StdRng::seed_from_u64(rng_seed));
    Some(())
}

fn run_fuzz(input: &str, mut rng: StdRng) {
    #[cfg(feature = "manual_test")]
    {
        println!("Input: {:?}", input);
        println!("Input len: {:?}", input.len());
    }

    for kind in IdentifierKind::iter() {
        let _is_valid = kind.is_valid(input);
        #[cfg(feature = "manual_test")]
        println!("{:?}: {}", kind, _is_valid);

        if let Some(generator) = kind.generator() {
            let generated = generator.generate_with_rng(&mut rng);
            assert!(kind.is_valid(&generated), "{kind:?} generated {generated}");
        }
    }

    let identifier = HealthcareIdentifier::new(input);
    assert_eq!(identifier.is_valid(), identifier.validation_error().is_none());
    let reparsed = HealthcareIdentifier::new(identifier.value());
    assert_eq!(reparsed, identifier);

    let provider_number = MedicareProviderNumber::new(input);
    if provider_number.is_valid() {
        assert!(IdentifierKind::MedicareProviderNumber.is_valid(&provider_number.to_string()));
    }

    if let Ok(card) = MedicareCardNumber::parse(input) {
        assert_eq!(card.to_string(), input);
        assert_eq!(MedicareCardNumber::parse(&card.to_string()), Ok(card));
    }

    if let Ok(dva_number) = DvaNumber::parse(input) {
        assert_eq!(DvaNumber::parse(&dva_number.value()), Ok(dva_number.clone()));
        assert_eq!(DvaNumber::parse(&dva_number.to_string()), Ok(dva_number));
    }
}
