// Colored string for log
pub const INFO: &str = "\x1b[1;32m[INFO]\x1b[0m";
pub const FAIL: &str = "\x1b[1;31m[FAIL]\x1b[0m";
pub const WARN: &str = "\x1b[1;33m[WARN]\x1b[0m";
pub const DONE: &str = "\x1b[1;34m[DONE]\x1b[0m";

pub fn log_msg(prefix: &str, msg: &str) -> String { format!("{} {}", prefix, msg) }
pub fn print_log_msg(prefix: &str, msg: &str) { eprintln!("{}", log_msg(prefix, msg)); }

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_log_prefixes() {
        assert_eq!(log_msg(INFO, "aligned"), "\x1b[1;32m[INFO]\x1b[0m aligned");
        assert_eq!(log_msg(WARN, "near-degenerate"), "\x1b[1;33m[WARN]\x1b[0m near-degenerate");
        print_log_msg(FAIL, "failed");
        print_log_msg(DONE, "done");
    }
}
