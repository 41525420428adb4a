//! Rotating browser-identity pool.
//!
//! A fixed, read-only table of real browser fingerprints spanning desktop,
//! mobile, and tablet signatures. Selection is a pure random choice with no
//! shared mutable state; callers draw a fresh identity per request attempt
//! so consecutive attempts present different fingerprints.

use rand::prelude::IndexedRandom;

/// One browser fingerprint: the headers that make a request look organic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

macro_rules! identity {
    ($ua:expr) => {
        Identity {
            user_agent: $ua,
            accept: ACCEPT_HTML,
            accept_language: ACCEPT_LANGUAGE,
        }
    };
}

/// Desktop browser signatures (Chrome, Safari, Firefox, Edge).
pub const DESKTOP_IDENTITIES: &[Identity] = &[
    identity!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"),
    identity!("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Safari/605.1.15"),
    identity!("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0"),
    identity!("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36"),
    identity!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.106 Safari/537.36"),
    identity!("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36"),
    identity!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59"),
];

/// Mobile and tablet signatures, also used by the mobile search variant.
pub const MOBILE_IDENTITIES: &[Identity] = &[
    identity!("Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1"),
    identity!("Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1"),
    identity!("Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36"),
];

/// Uniform random identity from the full desktop + mobile pool.
#[must_use]
pub fn random_identity() -> Identity {
    let mut rng = rand::rng();
    let pool: Vec<Identity> = DESKTOP_IDENTITIES
        .iter()
        .chain(MOBILE_IDENTITIES.iter())
        .copied()
        .collect();
    *pool.choose(&mut rng).expect("identity pool is non-empty")
}

/// Uniform random identity restricted to mobile/tablet signatures.
#[must_use]
pub fn random_mobile_identity() -> Identity {
    let mut rng = rand::rng();
    *MOBILE_IDENTITIES
        .choose(&mut rng)
        .expect("mobile identity pool is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_identity_is_drawn_from_the_pool() {
        for _ in 0..50 {
            let id = random_identity();
            assert!(
                DESKTOP_IDENTITIES.contains(&id) || MOBILE_IDENTITIES.contains(&id),
                "identity not in pool: {}",
                id.user_agent
            );
        }
    }

    #[test]
    fn mobile_identity_is_drawn_from_mobile_pool() {
        for _ in 0..50 {
            let id = random_mobile_identity();
            assert!(MOBILE_IDENTITIES.contains(&id));
            assert!(id.user_agent.contains("Mobile") || id.user_agent.contains("iPad"));
        }
    }

    #[test]
    fn all_identities_carry_accept_headers() {
        for id in DESKTOP_IDENTITIES.iter().chain(MOBILE_IDENTITIES) {
            assert_eq!(id.accept, ACCEPT_HTML);
            assert_eq!(id.accept_language, ACCEPT_LANGUAGE);
            assert!(id.user_agent.starts_with("Mozilla/5.0"));
        }
    }
}
