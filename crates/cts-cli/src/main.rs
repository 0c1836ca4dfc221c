use std::process::ExitCode;

use cts_cli::{cli, init_tracing, run, Options, Outcome};

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let options = Options::from_matches(&matches);
    init_tracing(options.verbose);

    let mut stdout = std::io::stdout().lock();
    match run(&options, &mut stdout) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            tracing::error!("{:#}", e);
            Outcome::Failure.into()
        }
    }
}
