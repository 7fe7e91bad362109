//! Status-code rules.
//!
//! Responses carry their status as a raw `u16`; anything that converts into
//! one is accepted, including [`StatusCode`] constants:
//!
//! ```rust
//! use tsu_length::{Response, StatusCode};
//!
//! Response::status(StatusCode::NO_CONTENT);
//! Response::status(299u16);
//! ```

pub use http::StatusCode;

/// Returns `true` for statuses whose responses never carry a body:
/// every 1xx, `204 No Content`, `205 Reset Content` and `304 Not Modified`.
pub fn is_bodiless(code: u16) -> bool {
    (100..200).contains(&code) || matches!(code, 204 | 205 | 304)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn informational_range_is_bodiless() {
        assert!(is_bodiless(100));
        assert!(is_bodiless(StatusCode::SWITCHING_PROTOCOLS.as_u16()));
        assert!(is_bodiless(199));
        assert!(!is_bodiless(99));
    }

    #[test]
    fn no_content_reset_and_not_modified_are_bodiless() {
        for status in [StatusCode::NO_CONTENT, StatusCode::RESET_CONTENT, StatusCode::NOT_MODIFIED] {
            assert!(is_bodiless(status.as_u16()), "{status}");
        }
    }

    #[test]
    fn other_statuses_carry_bodies() {
        for code in [200, 201, 206, 301, 303, 400, 404, 500, 503] {
            assert!(!is_bodiless(code), "{code}");
        }
    }
}
