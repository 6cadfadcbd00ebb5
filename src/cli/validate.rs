//! Config validation command implementation.

use super::CliError;
use super::output::format_stat_table;
use rampart::{Difficulty, MatchConfig};
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the config cannot be read, parsed, or is invalid.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(path: Option<PathBuf>, dump: bool) -> Result<(), CliError> {
    let config = match &path {
        Some(path) => {
            println!("Validating: {}", path.display());
            println!();
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::new(format!("Failed to read {}: {e}", path.display()))
            })?;
            let parsed = serde_json::from_str::<MatchConfig>(&text);
            print_check("JSON parses", parsed.is_ok());
            parsed.map_err(|e| CliError::new(format!("Invalid config JSON: {e}")))?
        }
        None => {
            println!("Validating: built-in defaults");
            println!();
            MatchConfig::default()
        }
    };

    let checked = config.validate();
    print_check("Config is consistent", checked.is_ok());
    checked?;

    println!();
    println!("Summary:");
    println!("  Match length:   {:.0}s", config.total_time);
    println!("  Field cap:      {} units per team", config.field_cap);
    println!(
        "  Castle:         {} hp, {} dmg every {:.1}s, range {:.0}",
        config.castle.max_hp,
        config.castle.attack_damage,
        config.castle.attack_period,
        config.castle.attack_range
    );
    println!(
        "  Projectile:     {:.0} px/s, {:?}",
        config.projectile.speed, config.projectile.arrival
    );
    for difficulty in Difficulty::ALL {
        let tier = config.difficulties.get(difficulty);
        let grades: Vec<&str> = tier.allowed_grades.iter().map(|g| g.name()).collect();
        println!(
            "  {:<15} every {:.1}s, max energy {:.0}, grades {}",
            format!("{difficulty}:"),
            tier.spawn_period,
            tier.max_energy,
            grades.join("/")
        );
    }

    println!();
    println!("Derived stats:");
    print!("{}", format_stat_table(&config.stats));

    if dump {
        println!();
        println!("{}", config.to_json()?);
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
