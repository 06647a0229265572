// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{delete_setting, get_setting, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::Value;

const TOKEN_KEY: &str = "token";

/// Authentication state for one CLI invocation.
///
/// Loaded once from the state database, handed to [`crate::api::ApiClient`]
/// explicitly, and written back only on login or logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn load(conn: &Connection) -> Result<Self> {
        let token = get_setting(conn, TOKEN_KEY)?.filter(|t| !t.is_empty());
        Ok(Self { token })
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        match &self.token {
            Some(t) => set_setting(conn, TOKEN_KEY, t),
            None => delete_setting(conn, TOKEN_KEY),
        }
    }

    pub fn login(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The `user_id` claim of the token payload. The signature is not
    /// checked; the server does that.
    pub fn user_id(&self) -> Option<i64> {
        let payload = self.token.as_deref()?.split('.').nth(1)?;
        let claims: Value = serde_json::from_slice(&decode_base64url(payload)?).ok()?;
        match claims.get("user_id")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Unpadded (or padded) base64url, as used in token segments.
fn decode_base64url(s: &str) -> Option<Vec<u8>> {
    fn sextet(c: u8) -> Option<u32> {
        match c {
            b'A'..=b'Z' => Some((c - b'A') as u32),
            b'a'..=b'z' => Some((c - b'a' + 26) as u32),
            b'0'..=b'9' => Some((c - b'0' + 52) as u32),
            b'-' | b'+' => Some(62),
            b'_' | b'/' => Some(63),
            _ => None,
        }
    }
    let bytes = s.trim_end_matches('=').as_bytes();
    if bytes.len() % 4 == 1 {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() * 3 / 4);
    for chunk in bytes.chunks(4) {
        let mut acc = 0u32;
        for &c in chunk {
            acc = (acc << 6) | sextet(c)?;
        }
        acc <<= 6 * (4 - chunk.len() as u32);
        let decoded = [(acc >> 16) as u8, (acc >> 8) as u8, acc as u8];
        out.extend_from_slice(&decoded[..chunk.len() - 1]);
    }
    Some(out)
}
