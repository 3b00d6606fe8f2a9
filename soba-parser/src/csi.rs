//! CSI parameter parsing and classification.
//!
//! CSI parameters are separated by semicolons. A blank or non-numeric
//! field parses as 0; an empty parameter list is a single 0. Each command
//! is tagged with the line aspects it touches, which downstream emission
//! heuristics use to tell volatile lines from stable ones.

use serde::{Deserialize, Serialize};

use crate::token::CsiToken;

/// Line aspects a CSI command affects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affects {
    pub cursor: bool,
    pub erasure: bool,
    pub style: bool,
}

/// A classified CSI sequence: parsed parameters plus affect tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiAction {
    pub cmd: char,
    pub params: Vec<i32>,
    pub affects: Affects,
}

impl CsiToken {
    pub fn classify(&self) -> CsiAction {
        CsiAction {
            cmd: self.cmd,
            params: parse_params(&self.params),
            affects: affects_of(self.cmd),
        }
    }
}

fn parse_params(raw: &str) -> Vec<i32> {
    if raw.is_empty() {
        return vec![0];
    }
    raw.split(';')
        .map(|field| field.parse().unwrap_or(0))
        .collect()
}

fn affects_of(cmd: char) -> Affects {
    let mut affects = Affects::default();
    match cmd {
        'm' => affects.style = true,
        'G' | 'C' | 'D' | '`' | 's' | 'u' => affects.cursor = true,
        'K' | 'X' | 'P' | '@' => affects.erasure = true,
        // A/B/H/f/J/S/T/L/M are vertical or full-screen commands a
        // single-line model ignores; anything else is unknown.
        _ => {}
    }
    affects
}

impl CsiAction {
    /// Parameter at `index`, or `default` when missing.
    pub fn param_or(&self, index: usize, default: i32) -> i32 {
        self.params.get(index).copied().unwrap_or(default)
    }

    /// Parameter at `index`, treating 0 or missing as `default`.
    pub fn param_nonzero_or(&self, index: usize, default: i32) -> i32 {
        match self.params.get(index).copied() {
            Some(0) | None => default,
            Some(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(params: &str, cmd: char) -> CsiAction {
        CsiToken {
            params: params.to_string(),
            cmd,
        }
        .classify()
    }

    #[test]
    fn test_params_basic() {
        assert_eq!(classify("1;31", 'm').params, vec![1, 31]);
        assert_eq!(classify("42", 'G').params, vec![42]);
    }

    #[test]
    fn test_params_empty_is_zero() {
        assert_eq!(classify("", 'K').params, vec![0]);
    }

    #[test]
    fn test_params_blank_fields_are_zero() {
        assert_eq!(classify(";5;", 'm').params, vec![0, 5, 0]);
    }

    #[test]
    fn test_affects_style() {
        assert!(classify("0", 'm').affects.style);
        assert!(!classify("0", 'm').affects.cursor);
    }

    #[test]
    fn test_affects_cursor() {
        for cmd in ['G', 'C', 'D', '`', 's', 'u'] {
            let affects = classify("1", cmd).affects;
            assert!(affects.cursor, "{} should affect the cursor", cmd);
            assert!(!affects.erasure);
            assert!(!affects.style);
        }
    }

    #[test]
    fn test_affects_erasure() {
        for cmd in ['K', 'X', 'P', '@'] {
            assert!(classify("1", cmd).affects.erasure);
        }
    }

    #[test]
    fn test_affects_none_for_vertical_and_unknown() {
        for cmd in ['A', 'B', 'H', 'f', 'J', 'S', 'T', 'L', 'M', 'q'] {
            assert_eq!(classify("1", cmd).affects, Affects::default());
        }
    }

    #[test]
    fn test_param_helpers() {
        let action = classify("0;3", 'G');
        assert_eq!(action.param_or(0, 7), 0);
        assert_eq!(action.param_nonzero_or(0, 7), 7);
        assert_eq!(action.param_nonzero_or(1, 7), 3);
        assert_eq!(action.param_or(2, 7), 7);
        assert_eq!(action.param_nonzero_or(2, 7), 7);
    }
}
