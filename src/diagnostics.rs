//! Operator-facing message formatting.
//!
//! Every failure that reaches the operator goes through `error_message` so the
//! wording stays uniform across the loaders and the CLI. Warnings are routed to
//! `tracing` and never abort a run.

use std::fmt::Display;

pub fn error_message(msg: impl Display) -> String {
    format!("error: {}", msg)
}

pub fn warn(msg: impl Display) {
    tracing::warn!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_prefixed() {
        assert_eq!(error_message("bad input"), "error: bad input");
    }
}
