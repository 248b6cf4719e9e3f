//! Password encryption algorithms.
//!
//! Byte transforms the MySQL protocol mandates for the supported methods:
//! - `mysql_native_password` - SHA1-based challenge/response
//! - `mysql_clear_password` - password sent as-is (TLS or socket only)
//!
//! References:
//! - Native: <https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_authentication_methods_native_password_authentication.html>
//! - Clear: <https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_authentication_methods_clear_text_password.html>

use rand::Rng;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::{Result, ServerError};

/// Length of the server challenge for `mysql_native_password`.
pub const SCRAMBLE_LEN: usize = 20;

/// Generate a random 20-byte scramble for authentication
pub fn generate_scramble() -> [u8; SCRAMBLE_LEN] {
    let mut rng = rand::thread_rng();
    let mut scramble = [0u8; SCRAMBLE_LEN];

    for byte in scramble.iter_mut() {
        *byte = loop {
            let b: u8 = rng.gen();
            // 0x00 terminates the auth-plugin-data string, 0xFF is reserved
            if b != 0 && b != 0xFF {
                break b;
            }
        };
    }

    scramble
}

fn sha1(parts: &[&[u8]]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute the auth response for mysql_native_password
///
/// Algorithm:
/// ```text
/// SHA1( password ) XOR SHA1( scramble + SHA1( SHA1( password ) ) )
/// ```
///
/// # Errors
///
/// [`ServerError::InvalidArgument`] when the scramble is missing or is not
/// exactly 20 bytes long.
pub fn scramble_native_password(password: &[u8], scramble: Option<&[u8]>) -> Result<Vec<u8>> {
    let scramble = scramble.ok_or_else(|| {
        ServerError::InvalidArgument("mysql_native_password requires a scramble".into())
    })?;
    if scramble.len() != SCRAMBLE_LEN {
        return Err(ServerError::InvalidArgument(format!(
            "scramble must be {} bytes, got {}",
            SCRAMBLE_LEN,
            scramble.len()
        )));
    }

    let stage1 = sha1(&[password]);
    let stage2 = sha1(&[&stage1]);
    let stage3 = sha1(&[scramble, &stage2]);

    Ok(stage1
        .iter()
        .zip(stage3.iter())
        .map(|(a, b)| a ^ b)
        .collect())
}

/// `SHA1(SHA1(password))`, the form a server keeps for native passwords.
pub fn native_password_hash(password: &[u8]) -> [u8; 20] {
    sha1(&[&sha1(&[password])])
}

/// Verify an auth response against a stored `SHA1(SHA1(password))`.
///
/// Recovers `SHA1(password)` from the response and checks that hashing it
/// once more yields the stored value. The final comparison is constant-time.
pub fn verify_native_password(
    auth_response: &[u8],
    scramble: &[u8],
    stored_sha1_sha1_password: &[u8],
) -> bool {
    if auth_response.len() != SCRAMBLE_LEN
        || scramble.len() != SCRAMBLE_LEN
        || stored_sha1_sha1_password.len() != 20
    {
        return false;
    }

    let stage3 = sha1(&[scramble, stored_sha1_sha1_password]);
    let recovered_stage1: Vec<u8> = auth_response
        .iter()
        .zip(stage3.iter())
        .map(|(a, b)| a ^ b)
        .collect();

    let computed_stage2 = sha1(&[&recovered_stage1]);
    computed_stage2[..].ct_eq(stored_sha1_sha1_password).into()
}

/// Compute the auth response for mysql_clear_password.
///
/// Identity transform; the scramble is ignored.
pub fn clear_password(password: &[u8], _scramble: Option<&[u8]>) -> Result<Vec<u8>> {
    Ok(password.to_vec())
}
