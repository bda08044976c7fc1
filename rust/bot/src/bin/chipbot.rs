use std::io;

fn main() {
    chipbot::logging::init_logging();
    let mut input = io::stdin().lock();
    let code = chipbot::run(
        std::env::args(),
        &mut input,
        &mut io::stdout(),
        &mut io::stderr(),
    );
    std::process::exit(code);
}
