// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use std::fs;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tollgate_core::token::RECOMMENDED_SECRET_LEN;
use tracing::warn;

use crate::cli::{Cli, GenSecretArgs, SecretFormat};
use crate::error::{BinError, BinResult};

/// Executes the `gen-secret` command to generate a token signing secret.
pub fn gen_secret(_cli: &Cli, args: &GenSecretArgs) -> BinResult<()> {
    if args.bytes == 0 {
        return Err(BinError::config("Secret length must be at least 1 byte"));
    }
    if args.bytes < RECOMMENDED_SECRET_LEN {
        warn!(
            bytes = args.bytes,
            recommended = RECOMMENDED_SECRET_LEN,
            "Generating a secret shorter than recommended"
        );
    }

    let output = encode_secret(&generate_secret(args.bytes), args.format);

    if let Some(path) = &args.output {
        fs::write(path, &output)
            .map_err(|e| BinError::io(format!("Failed to write secret file: {}", e)))?;
        eprintln!("Secret written to: {}", path.display());
    } else {
        println!("{}", output);
    }

    eprintln!();
    eprintln!("Store this secret securely. Every token signed with it becomes");
    eprintln!("forgeable if it leaks. Use it as:");
    eprintln!("  - Config file: token.secret");
    eprintln!("  - Environment: export TOLLGATE_TOKEN_SECRET=<secret>");

    Ok(())
}

/// Returns `len` bytes from the operating system RNG.
pub fn generate_secret(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encodes secret bytes for display.
pub fn encode_secret(bytes: &[u8], format: SecretFormat) -> String {
    match format {
        SecretFormat::Base64 => STANDARD.encode(bytes),
        SecretFormat::Hex => hex::encode(bytes),
    }
}
