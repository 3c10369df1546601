use rand::seq::SliceRandom;
use rand::Rng;

pub const PREFIXES: [&str; 4] = ["PF", "MP", "R9", "MJ"];
pub const INFIXES: [char; 3] = ['0', '1', '2'];
pub const SERIAL_LEN: usize = 8;

const LETTERS: usize = 4;

/// Build one candidate serial: prefix, infix digit, four uppercase letters and
/// a trailing digit, each drawn uniformly.
pub fn generate_serial<R: Rng>(rng: &mut R) -> String {
    let mut serial = String::with_capacity(SERIAL_LEN);
    serial.push_str(PREFIXES.choose(rng).copied().unwrap_or(PREFIXES[0]));
    serial.push(INFIXES.choose(rng).copied().unwrap_or(INFIXES[0]));
    for _ in 0..LETTERS {
        serial.push(rng.gen_range(b'A'..=b'Z') as char);
    }
    serial.push(char::from(b'0' + rng.gen_range(0..10u8)));
    debug_assert!(is_candidate_serial(&serial));
    serial
}

/// Generate `amount` serials from the thread-local RNG. Duplicates are kept.
pub fn generate_serials(amount: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..amount).map(|_| generate_serial(&mut rng)).collect()
}

pub fn is_candidate_serial(serial: &str) -> bool {
    let bytes = serial.as_bytes();
    if bytes.len() != SERIAL_LEN {
        return false;
    }
    PREFIXES.iter().any(|p| serial.starts_with(p))
        && INFIXES.contains(&(bytes[2] as char))
        && bytes[3..7].iter().all(u8::is_ascii_uppercase)
        && bytes[7].is_ascii_digit()
}
