use buildstamp::{print_startup_error, BuildStamp, VersionCli};
use clap::Parser;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = VersionCli::parse();

    if cli.common.generate_config {
        return BuildStamp::handle_generate_config(&cli.common);
    }

    let stamp = match BuildStamp::from_version_cli(&cli) {
        Ok(stamp) => stamp,
        Err(e) => return print_startup_error(&e),
    };

    let Some(ref name) = cli.macro_name else {
        eprintln!("error: a macro name is required");
        return 2;
    };

    match stamp.extract_version(name) {
        Ok(value) => {
            stamp.output_formatter().print_result(name, &value);
            0
        }
        Err(e) => stamp.handle_error(&e),
    }
}
