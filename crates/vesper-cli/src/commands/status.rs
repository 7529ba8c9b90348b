//! Status command - show identity, epoch and data

use anyhow::Result;
use console::style;
use num_bigint::BigUint;
use vesper_user::unix_now;

use super::open_user;
use crate::settings::Settings;

pub async fn show(settings: &Settings) -> Result<()> {
    let mut user = open_user(settings)?;
    let now = unix_now();
    let epoch = user.current_epoch(now)?;
    let remaining = user.remaining_time(now)?;

    println!("\n{}", style("Vesper Status").bold().cyan());
    println!();

    println!("{}", style("Identity").bold().underlined());
    println!("  Commitment:      {}", user.identity().commitment().to_hex());
    println!("  Store:           {}", settings.store_path.display());
    println!();

    println!("{}", style("Epoch").bold().underlined());
    println!("  Attester:        {}", style(user.attester_id()).cyan());
    println!("  Current epoch:   {}", epoch);
    println!("  Epoch length:    {}s", user.epoch_length());
    println!("  Next epoch in:   {}s", remaining);
    println!(
        "  Signed up:       {} {}",
        if user.has_signed_up() { "yes" } else { "no" },
        style("(session only)").dim()
    );
    println!(
        "  Last transition: epoch {} {}",
        user.latest_transitioned_epoch(),
        style("(session only)").dim()
    );
    println!();

    println!("{}", style("Prover").bold().underlined());
    println!(
        "  Backend:         {}",
        match settings.prover.backend.as_str() {
            "mock" => style("Mock (development)").yellow(),
            "snarkjs" => style("snarkjs Groth16").green(),
            other => style(other).dim(),
        }
    );
    println!();

    let sum_fields = user.sum_field_count();
    println!("{}", style("Data").bold().underlined());
    println!("  {:<6} {:<8} {:<24} {}", "Field", "Kind", "Pending", "Provable");
    for (index, (pending, provable)) in user
        .data()
        .iter()
        .zip(user.provable_data())
        .enumerate()
    {
        let kind = if index < sum_fields { "sum" } else { "replace" };
        println!(
            "  {:<6} {:<8} {:<24} {}",
            index,
            kind,
            short(pending),
            short(provable)
        );
    }
    println!();

    Ok(())
}

fn short(value: &BigUint) -> String {
    let text = value.to_string();
    if text.len() > 22 {
        format!("{}…", &text[..21])
    } else {
        text
    }
}
