fn main() {
    if let Err(error) = petfit_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
