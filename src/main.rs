use std::process::ExitCode;

fn main() -> ExitCode {
    leadimport_lib::run()
}
