//! Logging macros
//!
//! Forward to `defmt` on embedded builds. Host builds have no global logger,
//! so the macros only borrow their arguments to keep them "used".

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( & $x, )*);
    }};
}
