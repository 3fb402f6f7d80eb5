//! Time-based one-time passwords (RFC 6238) and backup codes
//!
//! HMAC-SHA1, 30 second step, 6 digits. Secrets travel as unpadded
//! RFC 4648 base32, which is what authenticator apps expect.

use hmac::{Hmac, Mac};
use rand::{Rng, RngCore};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

pub const STEP_SECS: u64 = 30;
pub const DIGITS: u32 = 6;
/// Accepted clock drift, in steps, on each side
pub const SKEW_STEPS: u64 = 1;
pub const SECRET_LEN: usize = 20;
pub const BACKUP_CODE_COUNT: usize = 8;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotpError {
    #[error("Secret is not valid base32")]
    InvalidSecret,
    #[error("Invalid HMAC key")]
    InvalidKey,
}

pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            let idx = (buffer >> (bits - 5)) & 0x1f;
            out.push(BASE32_ALPHABET[idx as usize] as char);
            bits -= 5;
        }
    }
    if bits > 0 {
        let idx = (buffer << (5 - bits)) & 0x1f;
        out.push(BASE32_ALPHABET[idx as usize] as char);
    }
    out
}

/// Case-insensitive; spaces, dashes and `=` padding are ignored.
pub fn base32_decode(input: &str) -> Result<Vec<u8>, TotpError> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for c in input.chars() {
        if c == '=' || c == ' ' || c == '-' {
            continue;
        }
        let upper = c.to_ascii_uppercase() as u8;
        let val = BASE32_ALPHABET
            .iter()
            .position(|&a| a == upper)
            .ok_or(TotpError::InvalidSecret)? as u32;
        buffer = (buffer << 5) | val;
        bits += 5;
        if bits >= 8 {
            out.push((buffer >> (bits - 8)) as u8);
            bits -= 8;
        }
        buffer &= (1 << bits) - 1;
    }
    if out.is_empty() {
        return Err(TotpError::InvalidSecret);
    }
    Ok(out)
}

/// Fresh random secret, base32 encoded
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    base32_encode(&bytes)
}

/// RFC 4226 HOTP value for `counter`
pub fn hotp(key: &[u8], counter: u64) -> Result<u32, TotpError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| TotpError::InvalidKey)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    Ok(binary % 10u32.pow(DIGITS))
}

/// Code for the step containing `unix_secs`, zero padded
pub fn totp_at(key: &[u8], unix_secs: u64) -> Result<String, TotpError> {
    let code = hotp(key, unix_secs / STEP_SECS)?;
    Ok(format!("{:0width$}", code, width = DIGITS as usize))
}

/// Check `code` against the current step and its neighbours.
pub fn verify_totp(secret_b32: &str, code: &str, unix_secs: u64) -> Result<bool, TotpError> {
    let code = code.trim();
    if code.len() != DIGITS as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(false);
    }
    let key = base32_decode(secret_b32)?;
    let step = unix_secs / STEP_SECS;
    for s in step.saturating_sub(SKEW_STEPS)..=step + SKEW_STEPS {
        let expected = format!("{:0width$}", hotp(&key, s)?, width = DIGITS as usize);
        if constant_time_eq(expected.as_bytes(), code.as_bytes()) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// `otpauth://` provisioning URI understood by authenticator apps
pub fn otpauth_url(issuer: &str, account: &str, secret_b32: &str) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
        percent_encode(issuer),
        percent_encode(account),
        secret_b32,
        percent_encode(issuer),
        DIGITS,
        STEP_SECS
    )
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'@' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Plain backup codes (`XXXX-XXXX`, uppercase hex), shown to the user once
pub fn generate_backup_codes() -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..BACKUP_CODE_COUNT)
        .map(|_| {
            let n: u32 = rng.gen();
            let hex = format!("{:08X}", n);
            format!("{}-{}", &hex[..4], &hex[4..])
        })
        .collect()
}

/// Stored form of a backup code; input is normalised first.
pub fn hash_backup_code(code: &str) -> String {
    let normalized: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
