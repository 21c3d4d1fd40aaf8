fn main() {
    if let Err(err) = evotree::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
