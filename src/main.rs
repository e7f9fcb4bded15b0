fn main() {
    if let Err(err) = hemiciclo::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
