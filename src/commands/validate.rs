use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use super::{error_chain, local_time, Console};
use crate::cli::ValidateArgs;
use crate::constants::display::DETAIL_TIME_FORMAT;
use crate::registry::{ConfigRecord, Registry, RegistryError};
use crate::validation::ValidationError;

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: &ValidateArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    match &args.identifier {
        Some(identifier) if !args.all => validate_one(registry, identifier, args.verbose, console),
        _ => validate_all(registry, args.verbose, console),
    }
}

fn validate_one<R: BufRead, W: Write>(
    registry: &Registry,
    identifier: &str,
    verbose: bool,
    console: &mut Console<R, W>,
) -> Result<()> {
    let record = registry.get(identifier)?;

    writeln!(console.out, "Validating configuration: {}", record.name)?;
    if verbose {
        writeln!(console.out, "   ID: {}", record.id)?;
        writeln!(console.out, "   File: {}", record.file_path.display())?;
        if !record.description.is_empty() {
            writeln!(console.out, "   Description: {}", record.description)?;
        }
        writeln!(console.out, "   Created: {}", local_time(&record.created_at, DETAIL_TIME_FORMAT))?;
    }

    if let Err(err) = registry.validate(&record.id) {
        writeln!(console.out, "Validation failed: {}", error_chain(&err))?;
        if let Some(ValidationError::InvalidJson(json)) = err.validation() {
            writeln!(console.out, "   at line {}, column {}", json.line(), json.column())?;
        }
        bail!("configuration validation failed");
    }

    writeln!(console.out, "Configuration is valid")?;
    Ok(())
}

fn validate_all<R: BufRead, W: Write>(
    registry: &Registry,
    verbose: bool,
    console: &mut Console<R, W>,
) -> Result<()> {
    let records = registry.list();
    if records.is_empty() {
        writeln!(console.out, "No configurations found to validate")?;
        return Ok(());
    }

    writeln!(console.out, "Validating {} configuration(s)...\n", records.len())?;
    let failures = registry.validate_all();

    for record in records {
        match failure_for(&failures, record) {
            Some(err) => writeln!(console.out, "FAIL {} - {}", record.name, error_chain(err))?,
            None => writeln!(console.out, "OK   {} - Valid", record.name)?,
        }
        if verbose {
            writeln!(console.out, "   ID: {}", record.id)?;
            writeln!(console.out, "   File: {}", record.file_path.display())?;
            writeln!(console.out)?;
        }
    }

    writeln!(console.out, "\nValidation Summary:")?;
    writeln!(console.out, "   Valid: {}", records.len() - failures.len())?;
    writeln!(console.out, "   Invalid: {}", failures.len())?;
    writeln!(console.out, "   Total: {}", records.len())?;

    if !failures.is_empty() {
        bail!("validation failed for {} configuration(s)", failures.len());
    }

    writeln!(console.out, "\nAll configurations are valid!")?;
    Ok(())
}

fn failure_for<'a>(
    failures: &'a [(ConfigRecord, RegistryError)],
    record: &ConfigRecord,
) -> Option<&'a RegistryError> {
    failures
        .iter()
        .find(|(failed, _)| failed.id == record.id)
        .map(|(_, err)| err)
}
