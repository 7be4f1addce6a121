/// Skip a test if bash is not available for provider scripts.
#[macro_export]
macro_rules! skip_without_bash {
    () => {
        if which::which("bash").is_err() {
            eprintln!("SKIPPED: bash not found on PATH");
            return;
        }
    };
}
