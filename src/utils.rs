use crate::Error;
use sha3::{Digest, Sha3_256};

/// A function that takes a hexadecimal representation of bytes
/// back into a stream of bytes.
///
/// An odd number of digits is treated as if it had a leading zero,
/// so `"f"` decodes to `[0x0f]`.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, Error> {
    let s = match s.strip_prefix("0x") {
        Some(s) => s,
        None => s,
    };
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex(s.to_owned()));
    }
    let padded;
    let s = if s.len() % 2 == 1 {
        padded = format!("0{s}");
        padded.as_str()
    } else {
        s
    };
    s.as_bytes()
        .chunks(2)
        .map(|ch| {
            // the digits were validated above, this only fails on a bug
            let digits = std::str::from_utf8(ch)?;
            u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidHex(digits.to_owned()))
        })
        .collect()
}

pub fn bytes_to_hex_str(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:0>2x?}", b))
        .fold(String::new(), |acc, x| acc + &x)
}

/// Pad bytes with zeros at the start.
pub fn zpad(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut pad = vec![0u8; len - bytes.len()];
    pad.extend(bytes);
    pad
}

/// SHA3-256 over the concatenation of `parts`.
pub fn sha3_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

#[test]
fn decode_bytes() {
    assert_eq!(
        hex_str_to_bytes("deadbeef").expect("Unable to decode"),
        [222, 173, 190, 239]
    );
}

#[test]
fn decode_odd_amount_of_bytes() {
    assert_eq!(hex_str_to_bytes("f").unwrap(), vec![15]);
    assert_eq!(hex_str_to_bytes("0xabc").unwrap(), vec![0x0a, 0xbc]);
}

#[test]
fn bytes_raises_decode_error() {
    let e = hex_str_to_bytes("\u{012345}deadbeef").unwrap_err();

    match e {
        Error::InvalidHex(_) => {}
        _ => panic!(),
    };
}

#[test]
fn bytes_raises_parse_error() {
    for bad in ["Lorem ipsum", "+f", "0x0x12"] {
        match hex_str_to_bytes(bad).unwrap_err() {
            Error::InvalidHex(_) => {}
            e => panic!("unexpected error {e}"),
        }
    }
}

#[test]
fn parse_prefixed_empty() {
    assert_eq!(hex_str_to_bytes("0x").unwrap(), Vec::<u8>::new());
}

#[test]
fn parse_prefixed_non_empty() {
    assert_eq!(
        hex_str_to_bytes("0xdeadbeef").unwrap(),
        vec![0xde, 0xad, 0xbe, 0xef]
    );
}

#[test]
fn encode_bytes() {
    assert_eq!(bytes_to_hex_str(&[0xf]), "0f".to_owned());
    assert_eq!(bytes_to_hex_str(&[0xff]), "ff".to_owned());
    assert_eq!(
        bytes_to_hex_str(&[0xde, 0xad, 0xbe, 0xef]),
        "deadbeef".to_owned()
    );
}

#[test]
fn verify_zpad() {
    assert_eq!(zpad(&[1, 2, 3, 4], 8), [0, 0, 0, 0, 1, 2, 3, 4]);
}

#[test]
fn verify_zpad_exact() {
    assert_eq!(zpad(&[1, 2, 3, 4], 4), [1, 2, 3, 4]);
}

#[test]
fn verify_zpad_less_than_size() {
    assert_eq!(zpad(&[1, 2, 3, 4], 2), [1, 2, 3, 4]);
}

#[test]
fn sha3_of_parts_matches_whole() {
    assert_eq!(sha3_256(&[b"ab", b"c"]), sha3_256(&[b"abc"]));
    assert_eq!(
        bytes_to_hex_str(&sha3_256(&[b""])),
        "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
    );
}
