//! Response assertion macros
//!
//! Print the response body when a status check fails, and check the
//! `{"error", "status"}` shape every failed request returns.

/// Assert a response status, printing the body on mismatch
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "unexpected status, body: {}",
            $response.body
        );
    };
}

/// Assert that an error body carries the given status and a message
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {
        $crate::assert_status!($response, $status);
        assert_eq!($response.body["status"], $status.as_u16());
        assert!(
            $response.body["error"].as_str().is_some_and(|m| !m.is_empty()),
            "missing error message: {}",
            $response.body
        );
    };
}
