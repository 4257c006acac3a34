fn main() -> std::process::ExitCode {
    rxscribe_lib::run()
}
