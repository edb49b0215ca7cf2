//! Formatting front-ends over [`prepend`](crate::local::prepend).

/// Prepend a formatted message to this thread's error context.
///
/// Takes `format!`-style arguments and returns the new message length.
///
/// ```rust
/// errstr::clear();
/// errstr::errstr!("{}", "file not found");
/// let len = errstr::errstr!("open {:?} failed: ", "/etc/app.toml");
/// assert_eq!(errstr::contents(), "open \"/etc/app.toml\" failed: file not found");
/// assert_eq!(len, errstr::length());
/// ```
#[macro_export]
macro_rules! errstr {
    ($($arg:tt)+) => {
        $crate::local::prepend(::core::format_args!($($arg)+))
    };
}

/// Prepend a formatted message, then `return` `value` from the enclosing
/// function.
///
/// ```rust
/// fn parse_port(text: &str) -> Option<u16> {
///     match text.parse() {
///         Ok(port) => Some(port),
///         Err(err) => errstr::errstr_return!(None, "bad port {text:?}: {err}"),
///     }
/// }
///
/// errstr::clear();
/// assert_eq!(parse_port("x"), None);
/// assert!(errstr::contents().starts_with("bad port \"x\": "));
/// ```
#[macro_export]
macro_rules! errstr_return {
    ($value:expr, $($arg:tt)+) => {{
        $crate::local::prepend(::core::format_args!($($arg)+));
        return $value;
    }};
}

/// Prepend a formatted message, then terminate the process with `status`.
///
/// The message stays in the exiting thread's buffer; nothing is printed.
///
/// ```rust,no_run
/// errstr::errstr_exit!(2, "fatal: {}", "no config");
/// ```
#[macro_export]
macro_rules! errstr_exit {
    ($status:expr, $($arg:tt)+) => {{
        $crate::local::prepend(::core::format_args!($($arg)+));
        ::std::process::exit($status)
    }};
}
