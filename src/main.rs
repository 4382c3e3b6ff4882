use std::process::ExitCode;

fn main() -> ExitCode {
    match pathfinder_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
