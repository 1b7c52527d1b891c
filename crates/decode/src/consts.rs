use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// The inline script that derives the session key ends with a call to
// `CryptoJS.SHA256(chko)`; everything between the tag and that call is needed.
regex!(DECRYPTION_KEY_REGEX, r">\s*(.+CryptoJS.SHA256\(chko\))");

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
pub(crate) const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;
pub(crate) const DEFAULT_MAX_STACK_SIZE: usize = 1024 * 1024;
