// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

// Level macros for the activities. With `tracing` they become tracing events;
// without it they print a tagged line, and debug output is discarded.

#[cfg(feature = "tracing")]
#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    (error, $($arg:tt)+) => { eprintln!("ERROR {}", format_args!($($arg)+)) };
    (warn, $($arg:tt)+) => { eprintln!("WARN  {}", format_args!($($arg)+)) };
    (info, $($arg:tt)+) => { println!("INFO  {}", format_args!($($arg)+)) };
    (debug, $($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {{
        $crate::__emit!(error, $($arg)+);
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {{
        $crate::__emit!(warn, $($arg)+);
    }};
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {{
        $crate::__emit!(info, $($arg)+);
    }};
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {{
        $crate::__emit!(debug, $($arg)+);
    }};
}
