//! Procedural naming for countries
//!
//! Composes names from small word banks; all draws come from the generation
//! pass's rng so names reproduce with the seed.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Word banks for country name generation.
pub struct NameGenerator;

impl NameGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a country name, e.g. "Kingdom of Thornvale" or "Vessmark Dominion".
    pub fn country_name(&self, rng: &mut ChaCha8Rng) -> String {
        let place = self.place_name(rng);
        let govt = pick(
            rng,
            &[
                "Kingdom",
                "Empire",
                "Duchy",
                "Republic",
                "Dominion",
                "League",
                "Principality",
                "Marches",
            ],
        );
        if rng.gen_bool(0.5) {
            format!("{} of {}", govt, place)
        } else {
            format!("{} {}", place, govt)
        }
    }

    fn place_name(&self, rng: &mut ChaCha8Rng) -> String {
        let root = pick(
            rng,
            &[
                "Thorn", "Vess", "Ald", "Mor", "Kara", "Eld", "Bren", "Osk", "Tyr", "Vael",
                "Dun", "Har", "Ilm", "Ruv", "Sten", "Gal",
            ],
        );
        let suffix = pick(
            rng,
            &[
                "vale", "mark", "heim", "gard", "fell", "wick", "moor", "holm", "stead", "ford",
            ],
        );
        format!("{}{}", root, suffix)
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to pick a random element.
fn pick<'a>(rng: &mut ChaCha8Rng, items: &'a [&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_names_deterministic() {
        let names = NameGenerator::new();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(names.country_name(&mut a), names.country_name(&mut b));
        }
    }

    #[test]
    fn test_names_nonempty() {
        let names = NameGenerator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            let name = names.country_name(&mut rng);
            assert!(name.len() > 3);
        }
    }
}
