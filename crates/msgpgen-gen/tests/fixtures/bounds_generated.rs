// Code generated by msgpgen. DO NOT EDIT.

#[allow(unused_imports)]
use msgpgen_wire::{Extension as _, MsgIsZero as _, Msgsize as _};

impl Point {
    pub const FIXED_MSGSIZE: usize = 5 + msgpgen_wire::FLOAT64_SIZE + msgpgen_wire::FLOAT64_SIZE;
}

// msgsize returns an upper bound on the encoded size of `Point`.
impl msgpgen_wire::Msgsize for Point {
    fn msgsize(&self) -> usize {
        5 + msgpgen_wire::FLOAT64_SIZE + msgpgen_wire::FLOAT64_SIZE
    }
}

// msg_is_zero reports whether `Point` is its zero value.
impl msgpgen_wire::MsgIsZero for Point {
    fn msg_is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

// msgsize returns an upper bound on the encoded size of `Pair`.
impl msgpgen_wire::Msgsize for Pair {
    fn msgsize(&self) -> usize {
        1 + msgpgen_wire::UINT32_SIZE + msgpgen_wire::STRING_PREFIX_SIZE + self.label.len()
    }
}

// msg_is_zero reports whether `Pair` is its zero value.
impl msgpgen_wire::MsgIsZero for Pair {
    fn msg_is_zero(&self) -> bool {
        self.id == 0 && self.label.is_empty()
    }
}

impl Home {
    pub const FIXED_MSGSIZE: usize = Point::FIXED_MSGSIZE;
}

// msgsize returns an upper bound on the encoded size of `Home`.
impl msgpgen_wire::Msgsize for Home {
    fn msgsize(&self) -> usize {
        // `Home` wraps `Point` and shares its wire representation.
        let base: &Point = &self.0;
        base.msgsize()
    }
}

// msg_is_zero reports whether `Home` is its zero value.
impl msgpgen_wire::MsgIsZero for Home {
    fn msg_is_zero(&self) -> bool {
        // `Home` wraps `Point` and shares its wire representation.
        let base: &Point = &self.0;
        base.msg_is_zero()
    }
}

// msgsize returns an upper bound on the encoded size of `Track`.
impl msgpgen_wire::Msgsize for Track {
    fn msgsize(&self) -> usize {
        let mut s = 1 + 5 + msgpgen_wire::STRING_PREFIX_SIZE + self.name.len() + 5 + msgpgen_wire::BYTES_PREFIX_SIZE + self.data.len() + 7 + msgpgen_wire::ARRAY_HEADER_SIZE;
        for za0001 in self.points.iter() {
            if let Some(_) = za0001.as_deref() {
                s += Point::FIXED_MSGSIZE;
            } else {
                s += msgpgen_wire::NIL_SIZE;
            }
        }
        s += 5;
        if let Some(_) = self.head.as_deref() {
            s += Point::FIXED_MSGSIZE;
        } else {
            s += msgpgen_wire::NIL_SIZE;
        }
        s += 9 + msgpgen_wire::MAP_HEADER_SIZE;
        if !self.counters.is_empty() {
            for (za0002, _) in self.counters.iter() {
                s += msgpgen_wire::STRING_PREFIX_SIZE + za0002.len() + msgpgen_wire::UINT64_SIZE;
            }
        }
        s += 7 + msgpgen_wire::MAP_HEADER_SIZE;
        if !self.groups.is_empty() {
            for (za0003, za0004) in self.groups.iter() {
                s += msgpgen_wire::STRING_PREFIX_SIZE + za0003.len() + msgpgen_wire::ARRAY_HEADER_SIZE;
                for za0005 in za0004.iter() {
                    s += msgpgen_wire::STRING_PREFIX_SIZE + za0005.len();
                }
            }
        }
        s += 5 + msgpgen_wire::FLOAT64_SIZE + 5;
        let zb0006: String = ipv4_to_string(&self.addr);
        s += msgpgen_wire::STRING_PREFIX_SIZE + zb0006.len() + 4 + msgpgen_wire::guess_size(&self.any) + 5 + self.pair.msgsize() + 5 + msgpgen_wire::ARRAY_HEADER_SIZE;
        for za0007 in self.grid.iter() {
            s += msgpgen_wire::ARRAY_HEADER_SIZE;
            for za0008 in za0007.iter() {
                s += msgpgen_wire::STRING_PREFIX_SIZE + za0008.len();
            }
        }
        s
    }
}

// msg_is_zero reports whether `Track` is its zero value.
impl msgpgen_wire::MsgIsZero for Track {
    fn msg_is_zero(&self) -> bool {
        self.name.is_empty() && self.data.is_empty() && self.points.is_empty() && self.head.is_none() && self.counters.is_empty() && self.groups.is_empty() && (*AsRef::<f64>::as_ref(&self.temp)) == 0.0 && ipv4_to_string(&self.addr).is_empty() && self.any.msg_is_zero() && self.pair.msg_is_zero() && self.grid.iter().all(|za0001| (*za0001).iter().all(|za0002| (*za0002).is_empty()))
    }
}

