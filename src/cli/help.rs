/// `EnvFilter` directive for the number of `-v` flags.
///
/// Job progress is logged at info, each subprocess's redacted output at debug.
/// From `-vvv` on the HTTP client's own logs are included too.
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        2 => "gitsync=trace,info",
        _ => "trace,hyper=debug,reqwest=debug",
    }
}
