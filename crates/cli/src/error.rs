//! Exit-code mapping for `motes` failures.
//!
//! `render` fails in three places: building the run description from flags
//! or a scene file (input), loading the source image or writing PNGs (I/O),
//! and driving the animator (simulation). Each class gets its own code so
//! scripts that batch-render scenes can tell a typo from a full disk:
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | clap rejected the arguments before `run` was reached |
//! | 10   | `SimError` other than I/O: unknown effect, not ready, lifecycle misuse, bad size |
//! | 11   | reading an image or scene, writing a PNG or frames directory |
//! | 12   | bad `--device`, `--params`, scene JSON, or an `--image` mismatch |
//! | 13   | `--json` output could not be serialized |

use motes_core::SimError;
use std::fmt;

/// A failed `motes` invocation.
///
/// `SimError::Io` never lands in `Sim`: the `From` impl reroutes it so that
/// decode and write failures from the engines crate share exit code 11 with
/// the CLI's own filesystem errors.
#[derive(Debug)]
pub enum CliError {
    Sim(SimError),
    /// Message already names the offending path where one is known.
    Io(String),
    /// Something the user typed or pointed at; fix the flags and rerun.
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Process exit code passed to `std::process::exit` by `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sim(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Sim(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::Io(msg) => CliError::Io(msg),
            other => CliError::Sim(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_class_has_a_distinct_exit_code() {
        let cases = [
            (CliError::Sim(SimError::UnknownEffect("foo".into())), 10),
            (CliError::Io("write failed".into()), 11),
            (CliError::Input("bad device".into()), 12),
            (CliError::Serialization("json fail".into()), 13),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = CliError::Input("unknown device class: watch".into());
        assert_eq!(err.to_string(), "unknown device class: watch");
    }

    #[test]
    fn from_sim_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(SimError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_sim_error_non_io_routes_to_cli_sim() {
        let cli_err = CliError::from(SimError::UnknownEffect("xyz".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("xyz"));
    }

    #[test]
    fn from_lifecycle_error_keeps_message() {
        let cli_err = CliError::from(SimError::NotReady("no image".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("no image"));
    }

    #[test]
    fn from_std_io_error_routes_to_cli_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CliError::from(io).exit_code(), 11);
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
