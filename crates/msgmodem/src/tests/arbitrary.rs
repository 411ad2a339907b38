use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF32(pub(crate) f32);

impl Arbitrary for FiniteF32 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f32::arbitrary(g);
        while !value.is_finite() {
            value = f32::arbitrary(g);
        }
        Self(value)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF64(pub(crate) f64);

impl Arbitrary for FiniteF64 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let choices = if depth == 0 { 8 } else { 10 };
            match usize::arbitrary(g) % choices {
                0 => Value::Nil,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Uint(u64::arbitrary(g)),
                3 => Value::Int(i64::arbitrary(g)),
                4 => Value::F32(FiniteF32::arbitrary(g).0),
                5 => Value::F64(FiniteF64::arbitrary(g).0),
                6 => Value::Binary(Vec::<u8>::arbitrary(g)),
                7 => Value::String(String::arbitrary(g)),
                8 => {
                    let len = usize::arbitrary(g) % 4;
                    let mut items = Vec::with_capacity(len);
                    for _ in 0..len {
                        items.push(gen_val(g, depth - 1));
                    }
                    Value::Array(items)
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = Map::new();
                    for _ in 0..len {
                        let key = gen_val(g, depth - 1);
                        let val = gen_val(g, depth - 1);
                        map.insert(key, val);
                    }
                    Value::Map(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_val(g, depth)
    }
}
