macro_rules! print_cmd_error {
    ($title:expr) => {{
        eprintln!("\x1b[1;31m[ERROR] {}\x1b[0m", $title);
    }};
    ($title:expr, $($tts:tt)+) => {{
        eprintln!("\x1b[1;31m[ERROR] {}\x1b[0m", $title);
        eprintln!("{}", core::format_args!($($tts)*));
    }};
}

/// Print the error header and return the error text for the caller to propagate.
macro_rules! handle_cmd_error {
    ($err:expr, $title:expr) => {{
        $crate::pretty::print_cmd_error!($title);
        format!("{}", $err)
    }};
}

macro_rules! print_cmd_info {
    ($title:expr, $($tts:tt)*) => {{
        println!("\x1b[1;33m[INFO] {}\x1b[0m", $title);
        println!("{}", core::format_args!($($tts)*));
    }};
}

macro_rules! print_cmd_warn {
    ($title:expr, $($tts:tt)*) => {{
        println!("\x1b[1;35m[WARN] {}\x1b[0m", $title);
        println!("{}", core::format_args!($($tts)*));
    }};
}

pub(crate) use handle_cmd_error;
pub(crate) use print_cmd_error;
pub(crate) use print_cmd_info;
pub(crate) use print_cmd_warn;

#[cfg(test)]
mod tests {
    use super::handle_cmd_error;

    #[test]
    fn handle_cmd_error_returns_the_error_text() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no config");
        let message: String = handle_cmd_error!(err, "Failed to load config.");
        assert_eq!(message, "no config");
    }

    #[test]
    fn handle_cmd_error_converts_into_boxed_error() {
        let result: Result<(), Box<dyn std::error::Error>> =
            Err("bad url").map_err(|e| handle_cmd_error!(e, "Invalid API URL.").into());
        assert_eq!(result.unwrap_err().to_string(), "bad url");
    }
}
