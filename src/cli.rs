use core::convert::Infallible;
use std::{ffi::OsString, path::PathBuf};
use clap::{Args, CommandFactory, Parser, ArgAction};
use tracing_subscriber::EnvFilter;
use crate::error::{self, describe};

// Flags shared by every program: device selection, listing, help and kernel source location
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct DeviceArgs {
    /// Select platform
    #[arg(short = 'p', value_name = "N", default_value = "0", value_parser = parse_index, allow_negative_numbers = true)]
    pub platform: usize,

    /// Select device
    #[arg(short = 'd', value_name = "N", default_value = "0", value_parser = parse_index, allow_negative_numbers = true)]
    pub device: usize,

    /// List all platforms and devices
    #[arg(short = 'l')]
    pub list: bool,

    /// Print this message
    #[arg(short = 'h', action = ArgAction::SetTrue)]
    pub show_help: bool,

    /// OpenCL C source holding the kernels
    #[arg(short = 'k', value_name = "PATH", env = "CL_TUTORIAL_KERNELS", default_value = "kernels/kernels.cl")]
    pub kernels: PathBuf
}

/// Elementwise multiply-add of two integer vectors on an OpenCL device
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "multadd", disable_help_flag = true, args_override_self = true)]
pub struct MultAddArgs {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Vector size
    #[arg(short = 's', value_name = "N", default_value = "128", value_parser = parse_index, allow_negative_numbers = true)]
    pub size: usize
}

/// 2D outer sum of two small integer vectors on an OpenCL device
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "outer_sum", disable_help_flag = true, args_override_self = true)]
pub struct OuterSumArgs {
    #[command(flatten)]
    pub device: DeviceArgs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Help,
    ListDevices,
    Run
}

impl DeviceArgs {
    /// Steps to perform, in order. Help short-circuits everything else.
    pub fn plan (&self) -> Vec<Step> {
        if self.show_help {
            return vec![Step::Help];
        }

        match self.list {
            true => vec![Step::ListDevices, Step::Run],
            false => vec![Step::Run]
        }
    }
}

/// Drops what the command line of `C` doesn't understand: unknown arguments are skipped and a
/// value flag with nothing after it is ignored. The token following a value flag is always
/// taken as its value and attached with `=`, so `-p -h` reads platform `-h`.
pub fn lenient_args<C: CommandFactory> (args: impl IntoIterator<Item = impl Into<OsString>>) -> Vec<String> {
    let cmd = C::command();
    let mut args = args.into_iter().map(|x| x.into().to_string_lossy().into_owned());
    let mut result = args.next().into_iter().collect::<Vec<_>>();

    while let Some(arg) = args.next() {
        let flag = cmd.get_arguments().find(|a| match (a.get_short(), arg.strip_prefix('-')) {
            (Some(short), Some(rest)) => rest.len() == short.len_utf8() && rest.starts_with(short),
            _ => false
        });

        match flag {
            Some(flag) if flag.get_action().takes_values() => match args.next() {
                Some(value) if !value.is_empty() => result.push(format!("{arg}={value}")),
                _ => {}
            },
            Some(_) => result.push(arg),
            None => {}
        }
    }

    result
}

/// Parses the process arguments of `C` leniently, see [`lenient_args`].
pub fn parse_args<C: Parser> () -> C {
    C::parse_from(lenient_args::<C>(std::env::args_os()))
}

/// Walks `plan`. A failing step prints its one-line summary to stderr, with the full report
/// at debug level, and the following steps still run.
pub fn execute<C: CommandFactory> (plan: &[Step], mut list: impl FnMut() -> error::Result<String>, mut run: impl FnMut() -> error::Result<()>) {
    for step in plan {
        let result = match step {
            Step::Help => {
                print_help::<C>();
                return;
            },
            Step::ListDevices => list().map(|listing| println!("{listing}")),
            Step::Run => run()
        };

        if let Err(report) = result {
            eprintln!("{}", describe(&report));
            tracing::debug!("{report:?}");
        }
    }
}

/// Parses like C's `atoi`: leading whitespace, an optional sign and as many digits as follow.
/// Anything unparsable reads as zero and out-of-range values saturate.
pub fn atoi (s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s)
    };

    let magnitude = digits.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    match negative {
        true => -magnitude,
        false => magnitude
    }
}

/// Index or size flag value. Negative numbers clamp to zero.
pub fn parse_index (s: &str) -> Result<usize, Infallible> {
    Ok(usize::try_from(atoi(s).max(0)).unwrap_or(usize::MAX))
}

/// Writes the usage of `C` to stderr.
pub fn print_help<C: CommandFactory> () {
    let mut cmd = C::command();
    eprintln!("{}", cmd.render_help());
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging () {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoi_like_c () {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi("  7"), 7);
        assert_eq!(atoi("+3"), 3);
        assert_eq!(atoi("-12"), -12);
        assert_eq!(atoi("12abc"), 12);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
        assert_eq!(atoi("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn negative_indices_clamp () {
        assert_eq!(parse_index("-1"), Ok(0));
        assert_eq!(parse_index("3"), Ok(3));
        assert_eq!(parse_index("x"), Ok(0));
    }

    #[test]
    fn defaults () {
        let args = MultAddArgs::try_parse_from(["multadd"]).unwrap();
        assert_eq!(args.size, 128);
        assert_eq!(args.device.platform, 0);
        assert_eq!(args.device.device, 0);
        assert!(!args.device.list);
        assert_eq!(args.device.plan(), [Step::Run]);
    }

    #[test]
    fn flags_are_read () {
        let args = MultAddArgs::try_parse_from(["multadd", "-p", "1", "-d", "2", "-s", "1024"]).unwrap();
        assert_eq!((args.device.platform, args.device.device, args.size), (1, 2, 1024));

        let args = MultAddArgs::try_parse_from(["multadd", "-s", "-5"]).unwrap();
        assert_eq!(args.size, 0);
    }

    #[test]
    fn help_wins () {
        let args = OuterSumArgs::try_parse_from(["outer_sum", "-l", "-h"]).unwrap();
        assert_eq!(args.device.plan(), [Step::Help]);

        let args = MultAddArgs::try_parse_from(["multadd", "-h", "-p", "7"]).unwrap();
        assert_eq!(args.device.plan(), [Step::Help]);
    }

    #[test]
    fn listing_continues_to_run () {
        let args = OuterSumArgs::try_parse_from(["outer_sum", "-l"]).unwrap();
        assert_eq!(args.device.plan(), [Step::ListDevices, Step::Run]);
    }

    fn multadd (args: &[&str]) -> MultAddArgs {
        MultAddArgs::try_parse_from(lenient_args::<MultAddArgs>(args.iter().copied())).unwrap()
    }

    fn outer_sum (args: &[&str]) -> OuterSumArgs {
        OuterSumArgs::try_parse_from(lenient_args::<OuterSumArgs>(args.iter().copied())).unwrap()
    }

    #[test]
    fn unknown_arguments_are_skipped () {
        let args = multadd(&["multadd", "-x", "-s", "4", "stray", "--long"]);
        assert_eq!(args.size, 4);
        assert_eq!(args.device.plan(), [Step::Run]);
    }

    #[test]
    fn trailing_value_flag_is_ignored () {
        let args = multadd(&["multadd", "-p"]);
        assert_eq!((args.device.platform, args.size), (0, 128));

        let args = outer_sum(&["outer_sum", "-l", "-d"]);
        assert_eq!(args.device.device, 0);
        assert_eq!(args.device.plan(), [Step::ListDevices, Step::Run]);
    }

    #[test]
    fn help_ignores_garbage () {
        assert_eq!(outer_sum(&["outer_sum", "-h", "-z"]).device.plan(), [Step::Help]);
        assert_eq!(multadd(&["multadd", "-z", "-h", "junk"]).device.plan(), [Step::Help]);
    }

    #[test]
    fn flag_values_are_consumed () {
        let args = multadd(&["multadd", "-p", "-h", "-d", "2x", "-s", "-3"]);
        assert_eq!((args.device.platform, args.device.device, args.size), (0, 2, 0));
        assert_eq!(args.device.plan(), [Step::Run]);

        let args = outer_sum(&["outer_sum", "-k", "my.cl"]);
        assert_eq!(args.device.kernels, PathBuf::from("my.cl"));
    }

    #[test]
    fn last_repeated_flag_wins () {
        let args = multadd(&["multadd", "-p", "1", "-p", "2", "-l", "-l"]);
        assert_eq!(args.device.platform, 2);
        assert!(args.device.list);
    }

    #[test]
    fn failed_listing_still_runs () {
        use crate::prelude::ErrorCL;
        use error_stack::Report;

        let mut ran = false;
        execute::<OuterSumArgs>(
            &[Step::ListDevices, Step::Run],
            || Err(Report::new(ErrorCL::PlatformNotFoundKhr)),
            || { ran = true; Ok(()) }
        );
        assert!(ran);
    }

    #[test]
    fn help_skips_everything_else () {
        let (mut listed, mut ran) = (false, false);
        execute::<OuterSumArgs>(
            &[Step::Help, Step::ListDevices, Step::Run],
            || { listed = true; Ok(String::new()) },
            || { ran = true; Ok(()) }
        );
        assert!(!listed && !ran);
    }

    #[test]
    fn help_mentions_every_flag () {
        let help = MultAddArgs::command().render_help().to_string();
        for flag in ["-p", "-d", "-l", "-h", "-s", "-k"] {
            assert!(help.contains(flag), "missing {flag} in {help}");
        }
    }
}
