//! Textual rendering in a WKT-like notation.
//!
//! `Display` prints full precision; [`FormatRounded`] rounds every ordinate
//! to a fixed number of decimals, which keeps log output and test failure
//! messages readable.

use std::fmt::{self, Display, Write};

use crate::math::Point3;

use super::envelope::Envelope;
use super::linestring::Linestring;
use super::multi_linestring::MultiLinestring;
use super::ring_group::RingGroup;
use super::segment::Segment;

/// Rendering with a configurable number of decimals.
pub trait FormatRounded {
    fn format_rounded(&self, decimals: usize) -> String;
}

fn write_point(out: &mut String, p: &Point3, decimals: Option<usize>) {
    // writing to a String cannot fail
    let _ = match decimals {
        Some(d) => write!(out, "{:.d$} {:.d$} {:.d$}", p.x, p.y, p.z),
        None => write!(out, "{} {} {}", p.x, p.y, p.z),
    };
}

fn write_coords<'a>(
    out: &mut String,
    points: impl IntoIterator<Item = &'a Point3>,
    decimals: Option<usize>,
) {
    out.push('(');
    for (i, p) in points.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_point(out, p, decimals);
    }
    out.push(')');
}

fn write_parts<'a>(
    out: &mut String,
    parts: impl IntoIterator<Item = &'a Linestring>,
    decimals: Option<usize>,
) {
    out.push('(');
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coords(out, part.points(), decimals);
    }
    out.push(')');
}

fn render_point(p: &Point3, decimals: Option<usize>) -> String {
    let mut out = String::from("POINT (");
    write_point(&mut out, p, decimals);
    out.push(')');
    out
}

fn render_envelope(env: &Envelope, decimals: Option<usize>) -> String {
    if env.is_empty() {
        return "ENVELOPE EMPTY".to_string();
    }
    let mut out = String::from("ENVELOPE ");
    write_coords(&mut out, [&env.min, &env.max], decimals);
    out
}

fn render_segment(segment: &Segment, decimals: Option<usize>) -> String {
    let mut out = String::from("LINESTRING ");
    write_coords(&mut out, [&segment.start, &segment.end], decimals);
    out
}

fn render_linestring(linestring: &Linestring, decimals: Option<usize>) -> String {
    if linestring.is_empty() {
        return "LINESTRING EMPTY".to_string();
    }
    let mut out = String::from("LINESTRING ");
    write_coords(&mut out, linestring.points(), decimals);
    out
}

fn render_multi(multi: &MultiLinestring, decimals: Option<usize>) -> String {
    if multi.part_count() == 0 {
        return "MULTILINESTRING EMPTY".to_string();
    }
    let mut out = String::from("MULTILINESTRING ");
    write_parts(&mut out, multi.parts(), decimals);
    out
}

fn render_ring_group(group: &RingGroup, decimals: Option<usize>) -> String {
    let mut out = String::from("POLYGON ");
    write_parts(&mut out, group.rings().parts(), decimals);
    out
}

impl FormatRounded for Point3 {
    fn format_rounded(&self, decimals: usize) -> String {
        render_point(self, Some(decimals))
    }
}

macro_rules! impl_rendering {
    ($ty:ty, $render:ident) => {
        impl FormatRounded for $ty {
            fn format_rounded(&self, decimals: usize) -> String {
                $render(self, Some(decimals))
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&$render(self, None))
            }
        }
    };
}

impl_rendering!(Envelope, render_envelope);
impl_rendering!(Segment, render_segment);
impl_rendering!(Linestring, render_linestring);
impl_rendering!(MultiLinestring, render_multi);
impl_rendering!(RingGroup, render_ring_group);
