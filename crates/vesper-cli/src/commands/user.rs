//! Signup, attestation, transition and epoch key commands

use anyhow::Result;
use console::style;
use vesper_core::AttestationRequest;
use vesper_user::unix_now;

use super::open_user;
use crate::action;
use crate::settings::Settings;

pub async fn signup(settings: &Settings) -> Result<()> {
    let mut user = open_user(settings)?;
    let now = unix_now();
    user.signup(now)?;

    println!(
        "{} Signed up with attester {} at epoch {}",
        style("✓").green().bold(),
        style(user.attester_id()).cyan(),
        user.latest_transitioned_epoch()
    );
    println!(
        "  Commitment: {}",
        user.identity().commitment().to_hex()
    );
    println!(
        "  {}",
        style("Signup status is not persisted; it lasts for this invocation only.").dim()
    );
    Ok(())
}

pub async fn attest(settings: &Settings, request: AttestationRequest) -> Result<()> {
    let mut user = open_user(settings)?;

    action::run("Applying attestation...", async {
        user.request_data(&request)?;
        Ok::<_, anyhow::Error>(())
    })
    .await?;

    println!("{} Attestation applied", style("✓").green().bold());
    for index in applied_indices(&request) {
        println!("  data[{}] = {}", index, style(&user.data()[index]).cyan());
    }
    Ok(())
}

/// Fields an attestation actually touches; empty entries are skipped
fn applied_indices(request: &AttestationRequest) -> Vec<usize> {
    request
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(&index, _)| index)
        .collect()
}

pub async fn transition(settings: &Settings) -> Result<()> {
    let mut user = open_user(settings)?;
    let now = unix_now();

    action::run("Transitioning state...", async {
        user.state_transition(now)?;
        Ok::<_, anyhow::Error>(())
    })
    .await?;

    println!(
        "{} Pending data committed at epoch {}",
        style("✓").green().bold(),
        user.latest_transitioned_epoch()
    );
    Ok(())
}

pub async fn epoch_keys(settings: &Settings, nonce: Option<u8>) -> Result<()> {
    let mut user = open_user(settings)?;
    let now = unix_now();
    let epoch = user.current_epoch(now)?;

    let nonces = match nonce {
        Some(nonce) => vec![nonce],
        None => (0..user.num_epoch_key_nonce_per_epoch()).collect(),
    };

    println!("{}", style(format!("Epoch keys for epoch {}", epoch)).bold());
    for nonce in nonces {
        let key = user.epoch_key(nonce, now)?;
        println!("  [{}] {}", nonce, key);
    }
    Ok(())
}
