//! `cadence register`: make this client the OS handler for deep links.

use anyhow::Result;
use cadence_config::Config;
use cadence_deeplink::{HandlerRegistration, RegistrationOutcome, SchemeRegistrar, XdgRegistrar};

use crate::theme::{self, Tone};

/// Register the deep-link scheme with the OS, once. Failures are reported,
/// not returned.
pub(crate) fn run_register(cfg: &Config, desktop_file: &str, force: bool) -> Result<()> {
    if !cfg.deep_link.register_default_handler && !force {
        println!(
            "{}",
            theme::line(Tone::Quiet, "deep_link.register_default_handler is off; pass --force to register anyway.")
        );
        return Ok(());
    }

    let registrar = XdgRegistrar::new(desktop_file);
    report(register_with(&registrar, &cfg.deep_link.scheme), &cfg.deep_link.scheme);
    Ok(())
}

fn register_with(registrar: &dyn SchemeRegistrar, scheme: &str) -> RegistrationOutcome {
    HandlerRegistration::new().ensure(registrar, scheme)
}

fn report(outcome: RegistrationOutcome, scheme: &str) {
    let line = match outcome {
        RegistrationOutcome::AlreadyRegistered => {
            theme::line(Tone::Note, &format!("Already handling {scheme}://"))
        },
        RegistrationOutcome::Registered => theme::line(Tone::Good, &format!("Now handling {scheme}://")),
        RegistrationOutcome::Failed => {
            theme::line(Tone::Caution, &format!("Could not register {scheme}://; see the log for details"))
        },
        RegistrationOutcome::Skipped => theme::line(Tone::Quiet, "Registration already attempted"),
    };
    println!("{line}");
}
