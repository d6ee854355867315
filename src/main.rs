use habits::cli::Cli;

fn main() {
    std::process::exit(Cli::handle());
}
