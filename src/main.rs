use clap::Parser;
use clap::error::ErrorKind;
use extsort::cli::{CliArgs, run_cli};
use extsort::output::OutputFormatter;
use std::process;

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // clap's message already ends with the usage line.
            OutputFormatter::error_list(&[e.to_string().trim_end()]);
            process::exit(1);
        }
    };

    if let Err(e) = run_cli(&args) {
        e.report();
        process::exit(e.exit_code());
    }
}
