//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexcard_pipeline::DEFAULT_MODEL;
use std::path::Path;

/// Execute the profile command, saving changes to `config_path`.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Add {
            name,
            api_base,
            extract_model,
            card_model,
        } => {
            let profile = Profile {
                api_base,
                extract_model: extract_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                card_model: card_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            };
            add_profile(config, name, profile, formatter)?;
            config.save_to(config_path)
        }
        ProfileAction::Use { name } => {
            use_profile(config, name, formatter)?;
            config.save_to(config_path)
        }
        ProfileAction::Remove { name } => {
            if remove_profile(config, &name, formatter)? {
                config.save_to(config_path)?;
            }
            Ok(())
        }
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        let active = name == &config.active_profile;
        println!(
            "{}{}",
            if active { "* " } else { "  " },
            if active { formatter.success(name) } else { name.clone() }
        );
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}API base: {}", indent, profile.api_base);
    println!("{}Extract model: {}", indent, profile.extract_model);
    println!("{}Card model: {}", indent, profile.card_model);
}

/// Create or update a profile.
fn add_profile(
    config: &mut Config,
    name: String,
    profile: Profile,
    formatter: &Formatter,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidInput("Profile name cannot be empty".to_string()));
    }
    if profile.api_base.trim().is_empty() {
        return Err(CliError::InvalidInput("API base cannot be empty".to_string()));
    }

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Switch to a different profile.
fn use_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Delete a profile; returns whether anything changed.
fn remove_profile(config: &mut Config, name: &str, formatter: &Formatter) -> Result<bool> {
    let removed = config.remove_profile(name)?;
    if removed {
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }
    Ok(removed)
}
