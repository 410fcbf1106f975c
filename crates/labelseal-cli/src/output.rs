use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use labelseal_core::SealError;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MALFORMED: u8 = 2;
pub const EXIT_INVALID: u8 = 3;

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Colored one-line status on stderr (human mode only).
pub fn status(ok: bool, msg: &str) {
    if is_json() {
        return;
    }
    let mut err = StandardStream::stderr(ColorChoice::Auto);
    let (color, tag) = if ok { (Color::Green, "OK") } else { (Color::Red, "FAIL") };
    let _ = err.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(err, "{tag}");
    let _ = err.reset();
    let _ = writeln!(err, " {msg}");
}

#[derive(Debug, Serialize)]
struct ErrorOut<'a> {
    ok: bool,
    error: &'a str,
    message: String,
}

fn seal_error(e: &anyhow::Error) -> Option<&SealError> {
    e.downcast_ref::<SealError>()
}

/// Exit status: "could not parse" and "signature invalid" get their own codes.
pub fn exit_code(e: &anyhow::Error) -> u8 {
    match seal_error(e) {
        Some(SealError::MalformedEnvelope(_)) => EXIT_MALFORMED,
        Some(SealError::VerificationFailed(_)) => EXIT_INVALID,
        _ => EXIT_FAILURE,
    }
}

pub fn report_error(e: &anyhow::Error) {
    if is_json() {
        let out = ErrorOut {
            ok: false,
            error: seal_error(e).map(SealError::kind).unwrap_or("error"),
            message: format!("{e:#}"),
        };
        if print(&out).is_ok() {
            return;
        }
    }
    if matches!(
        seal_error(e),
        Some(SealError::MalformedEnvelope(_) | SealError::VerificationFailed(_))
    ) {
        status(false, &format!("{e:#}"));
    } else {
        eprintln!("error: {e:#}");
    }
}
