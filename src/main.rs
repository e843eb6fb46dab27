use std::process::ExitCode;

fn main() -> ExitCode {
    match tickburst::entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
