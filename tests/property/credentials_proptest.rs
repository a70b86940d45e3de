//! Property-based tests for password hashing
//!
//! bcrypt is slow even at the minimum cost, so case counts are kept low.

use proptest::prelude::*;

use careercompass::backend::auth::CredentialStore;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn test_hash_verifies_only_original(
        password in "[ -~]{1,64}",
        other in "[ -~]{1,64}",
    ) {
        let credentials = CredentialStore::with_cost(4);
        let hash = credentials.hash(&password).unwrap();

        prop_assert!(hash.starts_with("$2"));
        prop_assert!(credentials.verify(&password, &hash));
        if other != password {
            prop_assert!(!credentials.verify(&other, &hash));
        }
    }

    #[test]
    fn test_verify_never_panics_on_bad_hash(password in ".{0,32}", hash in ".{0,80}") {
        let credentials = CredentialStore::with_cost(4);
        // A malformed stored hash is simply a mismatch
        let _ = credentials.verify(&password, &hash);
    }
}
