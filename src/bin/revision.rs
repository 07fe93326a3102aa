use buildstamp::{print_startup_error, BuildStamp, RevisionCli};
use clap::Parser;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = RevisionCli::parse();

    if cli.common.generate_config {
        return BuildStamp::handle_generate_config(&cli.common);
    }

    let stamp = match BuildStamp::from_revision_cli(&cli) {
        Ok(stamp) => stamp,
        Err(e) => return print_startup_error(&e),
    };

    // clap enforces the path unless --generate-config was given
    let Some(ref path) = cli.path else {
        eprintln!("error: a working copy path is required");
        return 2;
    };

    match stamp.extract_revision(path) {
        Ok(revision) => {
            stamp
                .output_formatter()
                .print_result("revision", &revision.value);
            revision.exit_code
        }
        Err(e) => stamp.handle_error(&e),
    }
}
