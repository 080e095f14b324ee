fn main() {
    har_tidy::cli::run();
}
