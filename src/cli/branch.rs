//! Branch CLI command handler

use std::io::{self, BufRead, Write};

use crate::cli::commands::BranchArgs;
use crate::cli::ensure_repository;
use crate::core::config::{BranchConfig, Config};
use crate::core::git::GitRepository;
use crate::core::jira::{resolve_title, JiraCli};
use crate::error::{Result, WeaveError};
use crate::naming::{branch_type, generate_name, validate, IdentifierRequest};

/// Handle `weave branch`
pub fn handle_branch(args: BranchArgs, config: &Config) -> Result<()> {
    ensure_repository()?;

    let ticket_id = args.ticket.trim().to_uppercase();
    if ticket_id.is_empty() {
        return Err(WeaveError::TicketIdRequired);
    }

    let type_key = match args.branch_type {
        Some(key) => key,
        None => {
            let stdin = io::stdin();
            select_branch_type(&config.branch, &mut stdin.lock(), &mut io::stdout())?
        }
    };

    if args.title.is_none() {
        println!("Fetching ticket {} from Jira...", ticket_id);
    }
    let title = resolve_title(&JiraCli::new(), &ticket_id, args.title.as_deref())?;
    if args.title.is_none() {
        println!("Title: {}\n", title);
    }

    let name = build_branch_name(&ticket_id, &type_key, &title, &config.branch)?;

    println!("Generated branch name:");
    println!("{}\n", name);

    if args.create {
        let git = GitRepository::open_current_dir()?;
        git.create_branch(&name)?;
        println!("✓ Switched to new branch '{}'", name);
    } else {
        println!("Create branch with:");
        println!("  git checkout -b {}", name);
    }

    Ok(())
}

/// Map the type key, generate the name and check it is a legal ref
pub fn build_branch_name(
    ticket_id: &str,
    type_key: &str,
    title: &str,
    config: &BranchConfig,
) -> Result<String> {
    let request = IdentifierRequest::new(branch_type(type_key, config), ticket_id).with_title(title);
    let name = generate_name(&request, config);

    if name.is_empty() {
        return Err(WeaveError::InvalidInput(
            "Could not generate a branch name: branch type and ticket ID are required".to_string(),
        ));
    }

    validate(&name)?;
    Ok(name)
}

/// Ask for a branch type key.
///
/// Accepts a list number or a key; anything else selects the default.
pub fn select_branch_type<R: BufRead, W: Write>(
    config: &BranchConfig,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    let keys = config.type_keys();

    writeln!(output, "Select branch type:")?;
    for (i, key) in keys.iter().enumerate() {
        let marker = if *key == config.default_type {
            " (default)"
        } else {
            ""
        };
        writeln!(output, "  {}. {}{}", i + 1, key, marker)?;
    }
    write!(output, "\nEnter number or type name [{}]: ", config.default_type)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let choice = line.trim();

    if choice.is_empty() {
        return Ok(config.default_type.clone());
    }

    if let Ok(index) = choice.parse::<usize>() {
        if let Some(key) = index.checked_sub(1).and_then(|i| keys.get(i)) {
            return Ok(key.to_string());
        }
    }

    if config.types.contains_key(choice) {
        return Ok(choice.to_string());
    }

    writeln!(
        output,
        "Invalid selection, using default: {}",
        config.default_type
    )?;
    Ok(config.default_type.clone())
}
