//! Property-based tests for request validation

use proptest::prelude::*;

use careercompass::backend::auth::handlers::types::normalize_email;
use careercompass::backend::chat::handlers::validate_session_id;

proptest! {
    #[test]
    fn test_normalized_email_is_idempotent(
        local in "[A-Za-z0-9._]{1,20}",
        domain in "[A-Za-z0-9]{1,12}\\.[A-Za-z]{2,4}",
        pad in " {0,3}",
    ) {
        let raw = format!("{pad}{local}@{domain}{pad}");
        let once = normalize_email(&raw).unwrap();

        prop_assert_eq!(once.clone(), once.to_lowercase());
        prop_assert_eq!(once.trim(), once.as_str());
        prop_assert_eq!(normalize_email(&once).unwrap(), once);
    }

    #[test]
    fn test_session_ids_without_whitespace_accepted(id in "[A-Za-z0-9_-]{1,128}") {
        prop_assert_eq!(validate_session_id(&id).unwrap(), id);
    }

    #[test]
    fn test_session_ids_with_whitespace_rejected(
        head in "[a-z]{0,10}",
        tail in "[a-z]{0,10}",
        ws in "[ \t\n]",
    ) {
        let id = format!("{head}{ws}{tail}");
        prop_assert!(validate_session_id(&id).is_err());
    }
}
