use crate::bcs::Encode;

pub struct Serializer {
    // This is a vector of bytes that starts empty and bytes of BCS are
    // appended as values are serialized.
    output: Vec<u8>,
}

/// Serializes any encodable value into a fresh buffer.
pub fn to_bytes<T>(value: &T) -> Vec<u8>
where
    T: Encode + ?Sized,
{
    let mut serializer = Serializer::new();
    value.encode(&mut serializer);
    serializer.into_bytes()
}

impl Serializer {
    pub fn new() -> Self {
        Serializer { output: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    pub fn bool(&mut self, v: bool) {
        self.output.push(v as u8);
    }

    pub fn u8(&mut self, v: u8) {
        self.output.push(v);
    }

    pub fn u64(&mut self, v: u64) {
        self.output.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u128(&mut self, v: u128) {
        self.output.extend_from_slice(&v.to_le_bytes());
    }

    /// Base-128 little endian varint, seven bits per byte with the high bit
    /// set on every byte but the last.
    pub fn uleb128(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.output.push((v as u8 & 0x7f) | 0x80);
            v >>= 7;
        }
        self.output.push(v as u8);
    }

    /// Raw bytes with no length prefix, used for fixed width values.
    pub fn fixed_bytes(&mut self, v: &[u8]) {
        self.output.extend_from_slice(v);
    }

    pub fn bytes(&mut self, v: &[u8]) {
        self.uleb128(v.len() as u64);
        self.output.extend_from_slice(v);
    }

    pub fn str(&mut self, v: &str) {
        self.bytes(v.as_bytes());
    }

    pub fn sequence<T: Encode>(&mut self, items: &[T]) {
        self.uleb128(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn uleb128_boundaries() {
    let cases: [(u64, &[u8]); 6] = [
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (16384, &[0x80, 0x80, 0x01]),
        (u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]),
    ];
    for (value, expected) in cases {
        let mut ser = Serializer::new();
        ser.uleb128(value);
        assert_eq!(ser.into_bytes(), expected, "encoding {value}");
    }
}

#[test]
fn fixed_width_integers_are_little_endian() {
    let mut ser = Serializer::new();
    ser.u64(1);
    ser.u128(2);
    let out = ser.into_bytes();
    assert_eq!(out.len(), 24);
    assert_eq!(out[0], 1);
    assert_eq!(out[8], 2);
    assert!(out[1..8].iter().all(|b| *b == 0));
}

#[test]
fn strings_are_length_prefixed() {
    let mut ser = Serializer::new();
    ser.str("abc");
    assert_eq!(ser.into_bytes(), [3, b'a', b'b', b'c']);
}
