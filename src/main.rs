use std::process::ExitCode;

use datename::DatenameError;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = datename::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<DatenameError>().map(DatenameError::root_cause) {
            // Already reported by the app with its code and partial progress.
            Some(DatenameError::Interrupted) => ExitCode::from(130),
            Some(_) => ExitCode::FAILURE,
            None => {
                datename::output::print_error(&format!("{e:#}"));
                ExitCode::FAILURE
            }
        },
    }
}
