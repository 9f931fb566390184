//! Fixed items written ahead of the generated wrappers: the bindings alias, the
//! status error type and the conversion helpers the registry refers to.

use quote::format_ident;

/// Alias under which generated code reaches the native bindings module
pub const NATIVE_ALIAS: &str = "_lib";

/// First lines of every generated file
pub const BANNER: &str = "// @generated by meosgen from the MEOS function prototypes. Do not edit.\n\n";

pub fn native_alias() -> syn::Ident {
    format_ident!("{}", NATIVE_ALIAS)
}

/// Preamble items; `module` is the path of the bindgen-style `extern "C"` module
pub fn preamble_items(module: &syn::Path) -> Vec<syn::Item> {
    let native = native_alias();
    let file: syn::File = syn::parse_quote! {
        pub(crate) use #module as #native;

        /// A native call reported failure through its boolean status
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct StatusError {
            pub function: &'static str,
            pub status: bool,
        }

        impl StatusError {
            pub fn new(function: &'static str, status: bool) -> Self {
                Self { function, status }
            }
        }

        impl ::std::fmt::Display for StatusError {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "native call `{}` returned status {}", self.function, self.status)
            }
        }

        impl ::std::error::Error for StatusError {}

        /// Microseconds between the Unix epoch and 2000-01-01 00:00:00 UTC
        #[allow(dead_code)]
        const POSTGRES_EPOCH_MICROS: i64 = 946_684_800_000_000;

        #[allow(dead_code)]
        const MICROS_PER_DAY: i64 = 86_400_000_000;

        /// Text up to the first NUL byte as a C string
        #[allow(dead_code)]
        fn to_cstring(text: &str) -> ::std::ffi::CString {
            let bytes = text.bytes().take_while(|b| *b != 0).collect::<Vec<u8>>();
            ::std::ffi::CString::new(bytes).unwrap_or_default()
        }

        /// Writable NUL-terminated copy of the text up to its first NUL byte
        #[allow(dead_code)]
        fn to_cbuffer(text: &str) -> Vec<::std::os::raw::c_char> {
            text.bytes()
                .take_while(|b| *b != 0)
                .chain(::std::iter::once(0))
                .map(|b| b as ::std::os::raw::c_char)
                .collect()
        }

        /// Owned copy of a native string; a null pointer reads as the empty string
        #[allow(dead_code)]
        unsafe fn from_cstring(ptr: *const ::std::os::raw::c_char) -> String {
            if ptr.is_null() {
                return String::new();
            }
            unsafe { ::std::ffi::CStr::from_ptr(ptr) }
                .to_string_lossy()
                .into_owned()
        }

        /// The chrono bounds stand for PostgreSQL's `-infinity` and `infinity`
        pub fn datetime_to_timestamptz(dt: ::chrono::DateTime<::chrono::Utc>) -> #native::TimestampTz {
            if dt == ::chrono::DateTime::<::chrono::Utc>::MAX_UTC {
                i64::MAX
            } else if dt == ::chrono::DateTime::<::chrono::Utc>::MIN_UTC {
                i64::MIN
            } else {
                dt.timestamp_micros().saturating_sub(POSTGRES_EPOCH_MICROS)
            }
        }

        /// Timestamps outside the chrono range, `-infinity` and `infinity` included,
        /// clamp to `DateTime::<Utc>::MIN_UTC` and `DateTime::<Utc>::MAX_UTC`
        pub fn timestamptz_to_datetime(ts: #native::TimestampTz) -> ::chrono::DateTime<::chrono::Utc> {
            ::chrono::DateTime::from_timestamp_micros(ts.saturating_add(POSTGRES_EPOCH_MICROS))
                .unwrap_or(if ts < 0 {
                    ::chrono::DateTime::<::chrono::Utc>::MIN_UTC
                } else {
                    ::chrono::DateTime::<::chrono::Utc>::MAX_UTC
                })
        }

        pub fn timedelta_to_interval(td: ::chrono::TimeDelta) -> #native::Interval {
            let micros = td.num_microseconds().unwrap_or(i64::MAX);
            #native::Interval {
                time: micros.rem_euclid(MICROS_PER_DAY),
                day: micros.div_euclid(MICROS_PER_DAY) as i32,
                month: 0,
            }
        }

        /// Months are counted as 30 days; a null interval reads as zero
        pub unsafe fn interval_to_timedelta(interval: *const #native::Interval) -> ::chrono::TimeDelta {
            let Some(interval) = (unsafe { interval.as_ref() }) else {
                return ::chrono::TimeDelta::zero();
            };
            ::chrono::TimeDelta::days(i64::from(interval.month) * 30 + i64::from(interval.day))
                + ::chrono::TimeDelta::microseconds(interval.time)
        }
    };
    file.items
}
