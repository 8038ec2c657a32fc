// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `procstat mem`: system memory accounting.

use super::{usage_bar, Context};
use procstat::read_memory;

pub fn execute(ctx: &Context) -> anyhow::Result<()> {
    let mem = read_memory(&ctx.fs)?;

    if ctx.json {
        return ctx.print_json(&mem);
    }

    println!("  Memory (kB)");
    println!("   Total:        {}", mem.total);
    println!("   Free:         {}  (free + cached + buffers)", mem.free);
    println!(
        "   Used:         {}  {:.1}%  {}",
        mem.used,
        mem.used_percent(),
        usage_bar(mem.used_percent())
    );
    println!("   Cached:       {}", mem.cached);
    println!("   Buffers:      {}", mem.buffers);
    println!("   Active:       {}", mem.active);
    println!("   Inactive:     {}", mem.inactive);
    println!();
    println!("  Swap (kB)");
    println!("   Total:        {}", mem.swap_total);
    println!(
        "   Used:         {}  {:.1}%",
        mem.swap_used,
        mem.swap_used_percent()
    );
    println!("   Cached:       {}", mem.swap_cached);
    Ok(())
}
