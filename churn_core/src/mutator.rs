use rand::Rng;
use thiserror::Error;

/// Inclusive bounds of the printable ASCII range that `InsertChar` draws from.
const PRINTABLE_ASCII_MIN: u8 = 32;
const PRINTABLE_ASCII_MAX: u8 = 126;

/// Errors that can occur while generating a mutation chain.
#[derive(Error, Debug)]
pub enum MutationError {
    /// The operator registry passed to [`generate_chain`] was empty, so no
    /// mutation can ever be selected.
    #[error("Operator set is empty, cannot generate a mutation chain")]
    EmptyOperatorSet,
}

/// A single randomized character-level transformation of a candidate string.
///
/// Every operator is total: inputs it cannot meaningfully act on (an empty
/// string, or a string without the character class the operator targets) are
/// returned unchanged instead of producing an error. The set is closed;
/// adding an operator means adding a variant here and handling it in
/// [`MutationOp::apply`], which the exhaustive match enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    /// Remove one uniformly random character.
    DeleteChar,
    /// Insert one random printable ASCII character (32..=126) at a uniformly
    /// random position, including the end.
    InsertChar,
    /// XOR one of the low 7 bits into the code point of one uniformly random
    /// character.
    FlipBit,
    /// Duplicate one uniformly random character so it appears twice
    /// adjacently.
    DuplicateChar,
    /// Toggle the case of one uniformly random ASCII-alphabetic character.
    /// Only ASCII letters count as alphabetic here: Unicode case mapping can
    /// change the character count (e.g. 'ß' uppercases to "SS"), which would
    /// break the operator's length-preserving invariant. An input whose
    /// letters are all non-ASCII is returned unchanged.
    SwitchCase,
}

impl MutationOp {
    /// The default operator registry, in declaration order.
    pub const ALL: [MutationOp; 5] = [
        MutationOp::DeleteChar,
        MutationOp::InsertChar,
        MutationOp::FlipBit,
        MutationOp::DuplicateChar,
        MutationOp::SwitchCase,
    ];

    /// Applies this operator to `input`, drawing randomness from `rng`.
    pub fn apply<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> String {
        match self {
            MutationOp::DeleteChar => delete_char(input, rng),
            MutationOp::InsertChar => insert_char(input, rng),
            MutationOp::FlipBit => flip_bit(input, rng),
            MutationOp::DuplicateChar => duplicate_char(input, rng),
            MutationOp::SwitchCase => switch_case(input, rng),
        }
    }
}

fn delete_char<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return input.to_string();
    }
    let pos = rng.random_range(0..chars.len());
    chars.remove(pos);
    chars.into_iter().collect()
}

fn insert_char<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    // `..=len` so the new character may be appended at the end.
    let pos = rng.random_range(0..=chars.len());
    let new_char = rng.random_range(PRINTABLE_ASCII_MIN..=PRINTABLE_ASCII_MAX) as char;
    chars.insert(pos, new_char);
    chars.into_iter().collect()
}

fn flip_bit<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return input.to_string();
    }
    let pos = rng.random_range(0..chars.len());
    let bit = 1u32 << rng.random_range(0..7u32);
    match char::from_u32(chars[pos] as u32 ^ bit) {
        Some(flipped) => {
            chars[pos] = flipped;
            chars.into_iter().collect()
        }
        // The flip landed outside the valid scalar values (surrogate range);
        // degrade to identity to keep the operator total.
        None => input.to_string(),
    }
}

fn duplicate_char<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return input.to_string();
    }
    let pos = rng.random_range(0..chars.len());
    chars.insert(pos, chars[pos]);
    chars.into_iter().collect()
}

fn switch_case<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if !chars.iter().any(|c| c.is_ascii_alphabetic()) {
        return input.to_string();
    }
    // At least one alphabetic character exists, so resampling terminates.
    let pos = loop {
        let candidate = rng.random_range(0..chars.len());
        if chars[candidate].is_ascii_alphabetic() {
            break candidate;
        }
    };
    chars[pos] = if chars[pos].is_ascii_lowercase() {
        chars[pos].to_ascii_uppercase()
    } else {
        chars[pos].to_ascii_lowercase()
    };
    chars.into_iter().collect()
}

/// Generates a chain of `length` progressively mutated variants of `seed`.
///
/// Mutations are cumulative: each step picks one uniformly random operator
/// from `ops` and applies it to the previous chain element (element 0 is
/// derived from `seed` itself). Drift therefore grows with chain position,
/// which is deliberate and distinct from mutating the seed independently
/// each step. Selection is with replacement, so operator diversity across a
/// chain is not guaranteed.
///
/// # Arguments
/// * `seed`: The unmutated root input of the chain.
/// * `ops`: The operator registry to draw from, usually [`MutationOp::ALL`].
/// * `length`: Number of chain elements to produce; `0` yields an empty chain.
/// * `rng`: Randomness source; a fixed-seed RNG makes the chain reproducible.
///
/// # Returns
/// The chain of exactly `length` strings, or
/// [`MutationError::EmptyOperatorSet`] if `ops` is empty.
pub fn generate_chain<R: Rng + ?Sized>(
    seed: &str,
    ops: &[MutationOp],
    length: usize,
    rng: &mut R,
) -> Result<Vec<String>, MutationError> {
    if ops.is_empty() {
        return Err(MutationError::EmptyOperatorSet);
    }

    let mut chain = Vec::with_capacity(length);
    let mut current = seed.to_string();
    for _ in 0..length {
        let op = ops[rng.random_range(0..ops.len())];
        current = op.apply(&current, rng);
        chain.push(current.clone());
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    const SAMPLE_SEED: &str = "<html a=\"value\">...</html>";

    fn char_count(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn delete_char_removes_exactly_one_character() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        for _ in 0..100 {
            let mutated = MutationOp::DeleteChar.apply(SAMPLE_SEED, &mut rng);
            assert_eq!(
                char_count(&mutated),
                char_count(SAMPLE_SEED) - 1,
                "DeleteChar should shorten the input by exactly one character"
            );
        }
    }

    #[test]
    fn delete_char_on_empty_input_is_identity() {
        let mut rng = ChaCha8Rng::from_seed([1u8; 32]);
        assert_eq!(MutationOp::DeleteChar.apply("", &mut rng), "");
    }

    #[test]
    fn insert_char_adds_one_printable_ascii_character() {
        let mut rng = ChaCha8Rng::from_seed([2u8; 32]);
        for _ in 0..100 {
            let mutated = MutationOp::InsertChar.apply(SAMPLE_SEED, &mut rng);
            assert_eq!(
                char_count(&mutated),
                char_count(SAMPLE_SEED) + 1,
                "InsertChar should lengthen the input by exactly one character"
            );

            // Locate the inserted character by walking past the common prefix.
            let original: Vec<char> = SAMPLE_SEED.chars().collect();
            let result: Vec<char> = mutated.chars().collect();
            let mut diff_pos = 0;
            while diff_pos < original.len() && original[diff_pos] == result[diff_pos] {
                diff_pos += 1;
            }
            let inserted = result[diff_pos];
            assert!(
                (PRINTABLE_ASCII_MIN..=PRINTABLE_ASCII_MAX).contains(&(inserted as u8)),
                "Inserted character {inserted:?} is outside printable ASCII"
            );
        }
    }

    #[test]
    fn insert_char_on_empty_input_produces_single_character() {
        let mut rng = ChaCha8Rng::from_seed([3u8; 32]);
        let mutated = MutationOp::InsertChar.apply("", &mut rng);
        assert_eq!(char_count(&mutated), 1);
    }

    #[test]
    fn flip_bit_changes_one_character_by_one_low_bit() {
        let mut rng = ChaCha8Rng::from_seed([4u8; 32]);
        for _ in 0..100 {
            let mutated = MutationOp::FlipBit.apply(SAMPLE_SEED, &mut rng);
            assert_eq!(
                char_count(&mutated),
                char_count(SAMPLE_SEED),
                "FlipBit must preserve length"
            );

            let diffs: Vec<(char, char)> = SAMPLE_SEED
                .chars()
                .zip(mutated.chars())
                .filter(|(a, b)| a != b)
                .collect();
            assert_eq!(diffs.len(), 1, "FlipBit should alter exactly one position");
            let (before, after) = diffs[0];
            let xor = before as u32 ^ after as u32;
            assert!(
                xor.is_power_of_two() && xor < 128,
                "Changed character must differ by exactly one of the low 7 bits, got xor {xor:#x}"
            );
        }
    }

    #[test]
    fn flip_bit_on_empty_input_is_identity() {
        let mut rng = ChaCha8Rng::from_seed([5u8; 32]);
        assert_eq!(MutationOp::FlipBit.apply("", &mut rng), "");
    }

    #[test]
    fn duplicate_char_doubles_one_character_in_place() {
        let mut rng = ChaCha8Rng::from_seed([6u8; 32]);
        for _ in 0..100 {
            let mutated = MutationOp::DuplicateChar.apply(SAMPLE_SEED, &mut rng);
            let original: Vec<char> = SAMPLE_SEED.chars().collect();
            let result: Vec<char> = mutated.chars().collect();
            assert_eq!(result.len(), original.len() + 1);

            // Some index must hold an adjacent pair whose removal restores
            // the original string.
            let restores_original = (0..result.len() - 1).any(|i| {
                if result[i] != result[i + 1] {
                    return false;
                }
                let mut without: Vec<char> = result.clone();
                without.remove(i);
                without == original
            });
            assert!(
                restores_original,
                "DuplicateChar output {mutated:?} does not contain an adjacent duplicate of {SAMPLE_SEED:?}"
            );
        }
    }

    #[test]
    fn duplicate_char_on_empty_input_is_identity() {
        let mut rng = ChaCha8Rng::from_seed([7u8; 32]);
        assert_eq!(MutationOp::DuplicateChar.apply("", &mut rng), "");
    }

    #[test]
    fn switch_case_toggles_exactly_one_alphabetic_character() {
        let mut rng = ChaCha8Rng::from_seed([8u8; 32]);
        for _ in 0..100 {
            let mutated = MutationOp::SwitchCase.apply(SAMPLE_SEED, &mut rng);
            assert_eq!(char_count(&mutated), char_count(SAMPLE_SEED));

            let diffs: Vec<(char, char)> = SAMPLE_SEED
                .chars()
                .zip(mutated.chars())
                .filter(|(a, b)| a != b)
                .collect();
            assert_eq!(
                diffs.len(),
                1,
                "SwitchCase should alter exactly one position"
            );
            let (before, after) = diffs[0];
            assert!(
                before.eq_ignore_ascii_case(&after),
                "Changed character must only differ in case: {before:?} vs {after:?}"
            );
        }
    }

    #[test]
    fn switch_case_without_alphabetic_characters_is_identity() {
        let mut rng = ChaCha8Rng::from_seed([9u8; 32]);
        let digits_and_symbols = "12345 !@#$% <>/=";
        assert_eq!(
            MutationOp::SwitchCase.apply(digits_and_symbols, &mut rng),
            digits_and_symbols
        );
        assert_eq!(MutationOp::SwitchCase.apply("", &mut rng), "");

        // Non-ASCII letters are not case-switched either; the operator is
        // restricted to ASCII to stay length-preserving.
        let non_ascii_letters = "éàü ß 123";
        assert_eq!(
            MutationOp::SwitchCase.apply(non_ascii_letters, &mut rng),
            non_ascii_letters
        );
    }

    #[test]
    fn generate_chain_of_length_zero_is_empty() {
        let mut rng = ChaCha8Rng::from_seed([10u8; 32]);
        let chain = generate_chain(SAMPLE_SEED, &MutationOp::ALL, 0, &mut rng).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn generate_chain_produces_requested_length() {
        let mut rng = ChaCha8Rng::from_seed([11u8; 32]);
        let chain = generate_chain(SAMPLE_SEED, &MutationOp::ALL, 10, &mut rng).unwrap();
        assert_eq!(chain.len(), 10);
    }

    #[test]
    fn generate_chain_with_empty_operator_set_fails() {
        let mut rng = ChaCha8Rng::from_seed([12u8; 32]);
        let result = generate_chain(SAMPLE_SEED, &[], 10, &mut rng);
        assert!(matches!(result, Err(MutationError::EmptyOperatorSet)));
    }

    #[test]
    fn generate_chain_is_reproducible_for_a_fixed_rng_seed() {
        let mut rng_a = ChaCha8Rng::from_seed([13u8; 32]);
        let mut rng_b = ChaCha8Rng::from_seed([13u8; 32]);
        let chain_a = generate_chain(SAMPLE_SEED, &MutationOp::ALL, 25, &mut rng_a).unwrap();
        let chain_b = generate_chain(SAMPLE_SEED, &MutationOp::ALL, 25, &mut rng_b).unwrap();
        assert_eq!(
            chain_a, chain_b,
            "Identical RNG seeds must yield identical chains"
        );
    }

    #[test]
    fn generate_chain_mutates_cumulatively_one_step_at_a_time() {
        let mut rng = ChaCha8Rng::from_seed([14u8; 32]);
        let chain = generate_chain(SAMPLE_SEED, &MutationOp::ALL, 50, &mut rng).unwrap();

        // Element 0 comes from one operator applied to the seed, and each
        // later element from one operator applied to its predecessor, so
        // adjacent lengths can differ by at most one character.
        let mut previous_len = char_count(SAMPLE_SEED);
        for (i, element) in chain.iter().enumerate() {
            let len = char_count(element);
            assert!(
                len.abs_diff(previous_len) <= 1,
                "Chain element {i} jumped from length {previous_len} to {len}"
            );
            previous_len = len;
        }
    }

    #[test]
    fn generate_chain_with_single_operator_always_applies_it() {
        let mut rng = ChaCha8Rng::from_seed([15u8; 32]);
        let chain = generate_chain("abcdef", &[MutationOp::DeleteChar], 6, &mut rng).unwrap();
        for (i, element) in chain.iter().enumerate() {
            assert_eq!(
                char_count(element),
                6 - (i + 1),
                "Each DeleteChar step should shorten the previous element by one"
            );
        }
        assert_eq!(chain[5], "", "Six deletions of a six-character seed");
    }
}
