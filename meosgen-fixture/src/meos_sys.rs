//! Stand-in for the bindgen output of `meos.h`: the same item names and signatures,
//! backed by small Rust bodies so the generated wrappers run without libmeos.

#![allow(non_camel_case_types, clippy::missing_safety_doc)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

pub type TimestampTz = i64;
pub type TimeOffset = i64;
pub type Datum = usize;
pub type int32 = i32;
pub type uint8 = u8;

const USECS_PER_DAY: i64 = 86_400_000_000;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub time: TimeOffset,
    pub day: int32,
    pub month: int32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub lower: TimestampTz,
    pub upper: TimestampTz,
    pub lower_inc: bool,
    pub upper_inc: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Span {
    pub lower: f64,
    pub upper: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TBox {
    pub span: Span,
    pub period: Period,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct STBox {
    pub srid: int32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodSet {
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntSet {
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampSet {
    pub values: Vec<TimestampTz>,
}

unsafe fn read_text<'a>(input: *const c_char) -> &'a str {
    if input.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(input) }.to_str().unwrap_or("")
}

fn into_text(text: String) -> *mut c_char {
    CString::new(text).map_or(ptr::null_mut(), CString::into_raw)
}

fn interval_micros(interval: &Interval) -> i64 {
    interval.time + (i64::from(interval.day) + i64::from(interval.month) * 30) * USECS_PER_DAY
}

pub unsafe fn meos_initialize(_tz_str: *const c_char) {}

pub unsafe fn meos_finish() {}

pub unsafe fn pg_timestamptz_in(input: *const c_char, _typmod: int32) -> TimestampTz {
    match unsafe { read_text(input) }.trim() {
        "infinity" => i64::MAX,
        "-infinity" => i64::MIN,
        text => text.parse().unwrap_or(0),
    }
}

pub unsafe fn pg_timestamptz_out(dt: TimestampTz) -> *mut c_char {
    into_text(match dt {
        i64::MAX => "infinity".to_string(),
        i64::MIN => "-infinity".to_string(),
        dt => dt.to_string(),
    })
}

pub unsafe fn period_in(input: *const c_char) -> *mut Period {
    let Some((lower, upper)) = unsafe { read_text(input) }.split_once(',') else {
        return ptr::null_mut();
    };
    match (lower.trim().parse(), upper.trim().parse()) {
        (Ok(lower), Ok(upper)) => Box::into_raw(Box::new(Period {
            lower,
            upper,
            lower_inc: true,
            upper_inc: true,
        })),
        _ => ptr::null_mut(),
    }
}

pub unsafe fn period_out(p: *const Period) -> *mut c_char {
    let Some(p) = (unsafe { p.as_ref() }) else {
        return ptr::null_mut();
    };
    into_text(format!(
        "{}{}, {}{}",
        if p.lower_inc { '[' } else { '(' },
        p.lower,
        p.upper,
        if p.upper_inc { ']' } else { ')' },
    ))
}

pub unsafe fn intset_in(input: *const c_char) -> *mut IntSet {
    let values = unsafe { read_text(input) }
        .trim_matches(|c: char| c == '{' || c == '}')
        .split(',')
        .map(|value| value.trim().parse())
        .collect::<Result<Vec<i64>, _>>();
    match values {
        Ok(values) => Box::into_raw(Box::new(IntSet { values })),
        Err(_) => ptr::null_mut(),
    }
}

pub unsafe fn intset_out(set: *const IntSet) -> *mut c_char {
    let Some(set) = (unsafe { set.as_ref() }) else {
        return ptr::null_mut();
    };
    let values = set.values.iter().map(i64::to_string).collect::<Vec<_>>();
    into_text(format!("{{{}}}", values.join(", ")))
}

pub unsafe fn period_make(
    lower: TimestampTz,
    upper: TimestampTz,
    lower_inc: bool,
    upper_inc: bool,
) -> *mut Period {
    Box::into_raw(Box::new(Period {
        lower,
        upper,
        lower_inc,
        upper_inc,
    }))
}

pub unsafe fn periodset_make(
    periods: *mut *const Period,
    count: c_int,
    normalize: bool,
) -> *mut PeriodSet {
    let handles = unsafe { std::slice::from_raw_parts(periods, count as usize) };
    let mut periods = handles.iter().map(|p| unsafe { **p }).collect::<Vec<_>>();
    if normalize {
        periods.sort_by_key(|p| p.lower);
    }
    Box::into_raw(Box::new(PeriodSet { periods }))
}

pub unsafe fn tbox_make(s: *const Span, p: *const Period, result: *mut TBox) -> bool {
    let (Some(span), Some(period)) = (unsafe { s.as_ref() }, unsafe { p.as_ref() }) else {
        return false;
    };
    unsafe {
        *result = TBox {
            span: *span,
            period: *period,
        };
    }
    true
}

pub unsafe fn period_duration(p: *const Period) -> *mut Interval {
    let Some(p) = (unsafe { p.as_ref() }) else {
        return ptr::null_mut();
    };
    let micros = p.upper - p.lower;
    Box::into_raw(Box::new(Interval {
        time: micros % USECS_PER_DAY,
        day: (micros / USECS_PER_DAY) as int32,
        month: 0,
    }))
}

pub unsafe fn periodset_timestamps(ps: *const PeriodSet, count: *mut c_int) -> *mut TimestampTz {
    let ps = unsafe { &*ps };
    let mut times = ps
        .periods
        .iter()
        .flat_map(|p| [p.lower, p.upper])
        .collect::<Vec<_>>();
    times.sort_unstable();
    times.dedup();
    unsafe { *count = times.len() as c_int };
    Box::into_raw(times.into_boxed_slice()) as *mut TimestampTz
}

pub unsafe fn timestampset_num_timestamps(ts: *const TimestampSet) -> c_int {
    unsafe { &*ts }.values.len() as c_int
}

/// `n` counts from 1
pub unsafe fn timestampset_timestamp_n(
    ts: *const TimestampSet,
    n: c_int,
    result: *mut TimestampTz,
) -> bool {
    let values = &unsafe { &*ts }.values;
    let Some(value) = usize::try_from(n - 1).ok().and_then(|i| values.get(i)) else {
        return false;
    };
    unsafe { *result = *value };
    true
}

pub unsafe fn floatspan_width(s: *const Span) -> f64 {
    let s = unsafe { &*s };
    s.upper - s.lower
}

pub unsafe fn period_shift_tscale(
    p: *mut Period,
    start: *mut Interval,
    duration: *mut Interval,
) -> bool {
    let Some(period) = (unsafe { p.as_mut() }) else {
        return false;
    };
    if let Some(start) = unsafe { start.as_ref() } {
        let shift = interval_micros(start);
        period.lower += shift;
        period.upper += shift;
    }
    if let Some(duration) = unsafe { duration.as_ref() } {
        period.upper = period.lower + interval_micros(duration);
    }
    true
}

pub unsafe fn set_srid(bbox: *mut STBox, srid: c_int) {
    if let Some(bbox) = unsafe { bbox.as_mut() } {
        bbox.srid = srid;
    }
}

pub unsafe fn datum_copy(value: Datum, _basetype: uint8) -> Datum {
    value
}
