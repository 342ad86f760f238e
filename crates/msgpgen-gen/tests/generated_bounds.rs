// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Compiles the checked-in output for `fixtures/bounds.yaml` and runs it
// against real encodings of seeded random values.

use std::collections::HashMap;
use std::path::Path;

use msgpgen_gen::{generate_schema, GenOptions, Schema};
use msgpgen_wire::*;

#[derive(Debug, Clone, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Pair {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct Home(pub Point);

#[derive(Debug, Clone, Copy, Default)]
pub struct Celsius(pub f64);

impl AsRef<f64> for Celsius {
    fn as_ref(&self) -> &f64 {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv4(pub [u8; 4]);

pub fn ipv4_to_string(ip: &Ipv4) -> String {
    if ip.0 == [0; 4] {
        return String::new();
    }
    let [a, b, c, d] = ip.0;
    format!("{a}.{b}.{c}.{d}")
}

pub fn string_to_ipv4(s: &str) -> Ipv4 {
    let mut out = [0u8; 4];
    for (slot, part) in out.iter_mut().zip(s.split('.')) {
        *slot = part.parse().unwrap_or(0);
    }
    Ipv4(out)
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    pub name: String,
    pub data: Vec<u8>,
    pub points: Vec<Option<Box<Point>>>,
    pub head: Option<Box<Point>>,
    pub counters: HashMap<String, u64>,
    pub groups: HashMap<String, Vec<String>>,
    pub temp: Celsius,
    pub addr: Ipv4,
    pub any: Value,
    pub pair: Pair,
    pub grid: [[String; 3]; 2],
    pub note: String,
}

include!("fixtures/bounds_generated.rs");

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("read fixture")
}

#[test]
fn checked_in_output_matches_generator() {
    let schema = Schema::from_yaml(&fixture("bounds.yaml")).expect("schema parses");
    let out = generate_schema(&schema, &GenOptions::default()).expect("generation");
    assert!(out.report.is_clean(), "{:?}", out.report.errors);
    assert_eq!(out.types, vec!["Point", "Pair", "Home", "Track"]);
    assert_eq!(out.code, fixture("bounds_generated.rs"));
}

fn encode_point(b: &mut Vec<u8>, p: &Point) {
    append_map_header(b, 2);
    append_string(b, "x");
    append_float64(b, p.x);
    append_string(b, "y");
    append_float64(b, p.y);
}

fn encode_pair(b: &mut Vec<u8>, p: &Pair) {
    append_array_header(b, 2);
    append_uint32(b, p.id);
    append_string(b, &p.label);
}

fn encode_track(b: &mut Vec<u8>, t: &Track) {
    append_map_header(b, 11);
    append_string(b, "name");
    append_string(b, &t.name);
    append_string(b, "data");
    append_bytes(b, &t.data);
    append_string(b, "points");
    append_array_header(b, t.points.len() as u32);
    for p in &t.points {
        match p {
            Some(p) => encode_point(b, p),
            None => append_nil(b),
        }
    }
    append_string(b, "head");
    match &t.head {
        Some(p) => encode_point(b, p),
        None => append_nil(b),
    }
    append_string(b, "counters");
    append_map_header(b, t.counters.len() as u32);
    for (k, v) in &t.counters {
        append_string(b, k);
        append_uint64(b, *v);
    }
    append_string(b, "groups");
    append_map_header(b, t.groups.len() as u32);
    for (k, vs) in &t.groups {
        append_string(b, k);
        append_array_header(b, vs.len() as u32);
        for v in vs {
            append_string(b, v);
        }
    }
    append_string(b, "temp");
    append_float64(b, t.temp.0);
    append_string(b, "addr");
    append_string(b, &ipv4_to_string(&t.addr));
    append_string(b, "any");
    append_intf(b, &t.any).expect("encode any");
    append_string(b, "pair");
    encode_pair(b, &t.pair);
    append_string(b, "grid");
    append_array_header(b, 2);
    for row in &t.grid {
        append_array_header(b, 3);
        for cell in row {
            append_string(b, cell);
        }
    }
}

fn text(rng: &mut fastrand::Rng) -> String {
    let len = match rng.u8(..10) {
        0 => rng.usize(256..300),
        1..=3 => rng.usize(28..40),
        _ => rng.usize(..8),
    };
    (0..len).map(|_| rng.alphanumeric()).collect()
}

fn point(rng: &mut fastrand::Rng) -> Point {
    Point {
        x: rng.f64() * 1e6,
        y: -rng.f64(),
    }
}

fn value(rng: &mut fastrand::Rng) -> Value {
    match rng.u8(..5) {
        0 => Value::Nil,
        1 => Value::Int(rng.i64(..)),
        2 => Value::Str(text(rng)),
        3 => Value::Array((0..rng.usize(..20)).map(|_| Value::Uint(rng.u64(..))).collect()),
        _ => Value::Map(vec![
            (text(rng), Value::Bool(rng.bool())),
            (text(rng), Value::Float64(rng.f64())),
        ]),
    }
}

fn track(rng: &mut fastrand::Rng) -> Track {
    Track {
        name: text(rng),
        data: (0..rng.usize(..40)).map(|_| rng.u8(..)).collect(),
        points: (0..rng.usize(..20))
            .map(|_| rng.bool().then(|| Box::new(point(rng))))
            .collect(),
        head: rng.bool().then(|| Box::new(point(rng))),
        counters: (0..rng.usize(..20))
            .map(|_| (text(rng), rng.u64(..)))
            .collect(),
        groups: (0..rng.usize(..4))
            .map(|_| (text(rng), (0..rng.usize(..18)).map(|_| text(rng)).collect()))
            .collect(),
        temp: Celsius(rng.f64() * 100.0 - 50.0),
        addr: Ipv4([rng.u8(..), rng.u8(..), rng.u8(..), rng.u8(..)]),
        any: value(rng),
        pair: Pair {
            id: rng.u32(..),
            label: text(rng),
        },
        grid: [
            [text(rng), text(rng), text(rng)],
            [text(rng), text(rng), text(rng)],
        ],
        note: text(rng),
    }
}

#[test]
fn generated_msgsize_bounds_every_encoding() {
    let mut rng = fastrand::Rng::with_seed(0x7472_6163);
    let mut b = Vec::new();
    for _ in 0..500 {
        let t = track(&mut rng);
        b.clear();
        encode_track(&mut b, &t);
        assert!(t.msgsize() >= b.len(), "{} < {}", t.msgsize(), b.len());

        b.clear();
        encode_pair(&mut b, &t.pair);
        assert!(t.pair.msgsize() >= b.len());
    }

    let empty = Track::default();
    b.clear();
    encode_track(&mut b, &empty);
    assert!(empty.msgsize() >= b.len());
}

#[test]
fn fixed_sizes_are_exact_for_points() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut b = Vec::new();
    for _ in 0..100 {
        let home = Home(point(&mut rng));
        b.clear();
        encode_point(&mut b, &home.0);
        assert_eq!(Point::FIXED_MSGSIZE, b.len());
        assert_eq!(Home::FIXED_MSGSIZE, b.len());
        assert_eq!(home.msgsize(), home.0.msgsize());
    }
}

#[test]
fn generated_zero_checks() {
    assert!(Track::default().msg_is_zero());
    assert!(Home::default().msg_is_zero());

    let mut rng = fastrand::Rng::with_seed(99);
    let non_zero = [
        Track {
            pair: Pair {
                id: 12345,
                label: String::new(),
            },
            ..Track::default()
        },
        Track {
            any: Value::Int(1),
            ..Track::default()
        },
        Track {
            grid: [
                [String::new(), "x".into(), String::new()],
                Default::default(),
            ],
            ..Track::default()
        },
        Track {
            addr: string_to_ipv4("10.0.0.1"),
            ..Track::default()
        },
        Track {
            temp: Celsius(-1.5),
            ..Track::default()
        },
        track(&mut rng),
    ];
    for t in &non_zero {
        assert!(!t.msg_is_zero(), "{t:?}");
    }

    let private_only = Track {
        note: "scratch".into(),
        ..Track::default()
    };
    assert!(private_only.msg_is_zero());
}
