// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Tollgate - users, roles and revocable session tokens");
    println!();
    println!("Version Information:");
    println!("  tollgate-bin:    {}", crate::VERSION);
    println!("  tollgate-core:   {}", tollgate_core::VERSION);
    println!("  tollgate-config: {}", tollgate_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:          {}", std::env::consts::ARCH);
    println!("  OS:              {}", std::env::consts::OS);
    println!();
    println!("Primitives:");
    println!("  Password hash:   Argon2id (PHC string)");
    println!("  Session token:   JWT, HMAC-SHA2 (HS256/HS384/HS512)");
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
